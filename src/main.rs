use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{middleware, Router};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use freight_matching::api;
use freight_matching::clients::marketplace_client::MarketplaceHttpClient;
use freight_matching::config::environment::EnvironmentConfig;
use freight_matching::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use freight_matching::middleware::rate_limit::{rate_limit_middleware, RateLimitState};
use freight_matching::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 Freight Matching Platform - API Gateway");
    info!("==========================================");

    let config = EnvironmentConfig::default();

    // Cliente del backend del marketplace (identidad + persistencia)
    let marketplace = Arc::new(MarketplaceHttpClient::from_config(&config));
    info!("🤝 Marketplace backend: {}", config.marketplace_base_url);
    info!("🗺️ Geocoder: {}", config.geocoding_base_url);
    info!("🧭 Router: {}", config.routing_base_url);

    // Rate limiting: global + estricto para sugerencias
    let global_limiter = RateLimitState::new(&config);
    let suggestion_limiter = RateLimitState::strict(&config);

    // CORS: orígenes explícitos en producción, permisivo en desarrollo
    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app_state = AppState::new(config.clone(), marketplace);

    let app = Router::new()
        .merge(api::create_api_router(suggestion_limiter))
        .layer(middleware::from_fn_with_state(
            global_limiter,
            rate_limit_middleware,
        ))
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📍 Lugares y rutas:");
    info!("   GET  /api/places/search?q= - Sugerencias de lugares");
    info!("   GET  /api/route/estimate - Estimación de ruta");
    info!("   POST /api/route/estimates - Estimación en lote");
    info!("🔐 Autenticación (OTP):");
    info!("   POST /api/auth/otp/send - Enviar OTP");
    info!("   POST /api/auth/otp/verify - Verificar OTP");
    info!("   POST /api/auth/register - Crear perfil");
    info!("📦 Cargas:");
    info!("   GET  /api/loads - Cargas disponibles");
    info!("   POST /api/loads - Publicar carga");
    info!("   GET  /api/loads/:id - Detalle con ruta");
    info!("   POST /api/loads/:id/feedback - Reporte post-llamada");
    info!("   POST /api/loads/:id/cancel - Devolver al mercado");
    info!("🚛 Conductores:");
    info!("   GET  /api/drivers/available - Conductores disponibles");
    info!("   PUT  /api/drivers/:id/vehicle - Guardar vehículo");
    info!("   GET  /api/drivers/:id/history - Historial del conductor");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
