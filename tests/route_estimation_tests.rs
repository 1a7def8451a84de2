//! Tests del servicio de estimación de rutas contra un router simulado,
//! incluyendo el contrato de orden (longitud,latitud) en la URL y el
//! comportamiento del cache acotado.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use freight_matching::clients::marketplace_client::MarketplaceApi;
use freight_matching::config::environment::EnvironmentConfig;
use freight_matching::models::load::{Load, NewLoad};
use freight_matching::models::user::{DriverSummary, NewProfile, UserProfile, VehicleDetails};
use freight_matching::services::route_estimation_service::RouteEstimationService;
use freight_matching::state::AppState;

async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn ok_route_body(distance: f64, duration: f64) -> serde_json::Value {
    json!({
        "code": "Ok",
        "routes": [
            {"distance": distance, "duration": duration}
        ]
    })
}

#[tokio::test]
async fn successful_route_formats_distance_and_duration() {
    let router = Router::new().route(
        "/route/v1/driving/:coords",
        get(|| async { Json(ok_route_body(152300.0, 9000.0)) }),
    );

    let base_url = spawn_upstream(router).await;
    let service = RouteEstimationService::new(base_url, 2);

    let estimate = service
        .calculate_route(24.7136, 46.6753, 21.4858, 39.1925)
        .await
        .expect("route expected");

    assert_eq!(estimate.distance_display, "152.3 كم");
    assert_eq!(estimate.duration_display, "2 ساعة 30 دقيقة");
    assert_eq!(estimate.distance_meters, 152300.0);
    assert_eq!(estimate.duration_seconds, 9000.0);
}

#[tokio::test]
async fn wire_order_is_longitude_then_latitude() {
    let captured: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let captured_handler = captured.clone();

    let router = Router::new().route(
        "/route/v1/driving/:coords",
        get(move |Path(coords): Path<String>| {
            let captured = captured_handler.clone();
            async move {
                *captured.lock().unwrap() = Some(coords);
                Json(ok_route_body(1000.0, 60.0))
            }
        }),
    );

    let base_url = spawn_upstream(router).await;
    let service = RouteEstimationService::new(base_url, 2);

    service
        .calculate_route(24.7136, 46.6753, 21.4858, 39.1925)
        .await
        .expect("route expected");

    // Internamente todo es (lat, lon); en la URL del router va invertido.
    let coords = captured.lock().unwrap().clone().unwrap();
    assert_eq!(coords, "46.6753,24.7136;39.1925,21.4858");
}

#[tokio::test]
async fn sub_minute_route_uses_sentinel_text() {
    let router = Router::new().route(
        "/route/v1/driving/:coords",
        get(|| async { Json(ok_route_body(500.0, 45.0)) }),
    );

    let base_url = spawn_upstream(router).await;
    let service = RouteEstimationService::new(base_url, 2);

    let estimate = service.calculate_route(24.7, 46.6, 24.8, 46.7).await.unwrap();
    assert_eq!(estimate.duration_display, "أقل من دقيقة");
}

#[tokio::test]
async fn non_ok_code_yields_none() {
    let router = Router::new().route(
        "/route/v1/driving/:coords",
        get(|| async { Json(json!({"code": "NoRoute", "routes": []})) }),
    );

    let base_url = spawn_upstream(router).await;
    let service = RouteEstimationService::new(base_url, 2);

    assert!(service.calculate_route(24.7, 46.6, 21.4, 39.2).await.is_none());
}

#[tokio::test]
async fn empty_routes_yield_none() {
    let router = Router::new().route(
        "/route/v1/driving/:coords",
        get(|| async { Json(json!({"code": "Ok", "routes": []})) }),
    );

    let base_url = spawn_upstream(router).await;
    let service = RouteEstimationService::new(base_url, 2);

    assert!(service.calculate_route(24.7, 46.6, 21.4, 39.2).await.is_none());
}

#[tokio::test]
async fn upstream_error_yields_none() {
    let router = Router::new().route(
        "/route/v1/driving/:coords",
        get(|| async { (StatusCode::BAD_GATEWAY, "boom") }),
    );

    let base_url = spawn_upstream(router).await;
    let service = RouteEstimationService::new(base_url, 2);

    assert!(service.calculate_route(24.7, 46.6, 21.4, 39.2).await.is_none());
}

// --- cache ---

/// Marketplace sin uso: estos tests solo ejercitan la ruta de mapas.
struct UnusedMarketplace;

#[async_trait]
impl MarketplaceApi for UnusedMarketplace {
    async fn send_otp(&self, _: &str, _: &str) -> Result<()> {
        unreachable!("not used in this test")
    }
    async fn verify_otp(&self, _: &str, _: &str, _: &str) -> Result<Option<UserProfile>> {
        unreachable!("not used in this test")
    }
    async fn create_profile(&self, _: NewProfile) -> Result<UserProfile> {
        unreachable!("not used in this test")
    }
    async fn save_vehicle_details(&self, _: Uuid, _: VehicleDetails) -> Result<()> {
        unreachable!("not used in this test")
    }
    async fn list_available_loads(&self) -> Result<Vec<Load>> {
        unreachable!("not used in this test")
    }
    async fn get_load(&self, _: Uuid) -> Result<Option<Load>> {
        unreachable!("not used in this test")
    }
    async fn post_load(&self, _: Uuid, _: NewLoad) -> Result<Load> {
        unreachable!("not used in this test")
    }
    async fn list_driver_history(&self, _: Uuid) -> Result<Vec<Load>> {
        unreachable!("not used in this test")
    }
    async fn accept_load(&self, _: Uuid, _: Uuid) -> Result<()> {
        unreachable!("not used in this test")
    }
    async fn cancel_load(&self, _: Uuid) -> Result<()> {
        unreachable!("not used in this test")
    }
    async fn list_available_drivers(&self) -> Result<Vec<DriverSummary>> {
        unreachable!("not used in this test")
    }
}

fn test_config(routing_base_url: &str) -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        cors_origins: Vec::new(),
        rate_limit_requests: 1000,
        rate_limit_window: 60,
        geocoding_base_url: "http://127.0.0.1:1".to_string(),
        routing_base_url: routing_base_url.to_string(),
        geocoding_language: "ar".to_string(),
        upstream_timeout_secs: 2,
        marketplace_base_url: "http://127.0.0.1:1".to_string(),
        marketplace_api_key: None,
    }
}

#[tokio::test]
async fn repeated_estimate_is_served_from_cache() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_handler = hits.clone();

    let router = Router::new().route(
        "/route/v1/driving/:coords",
        get(move || {
            let hits = hits_handler.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(ok_route_body(152300.0, 9000.0))
            }
        }),
    );

    let base_url = spawn_upstream(router).await;
    let state = AppState::new(test_config(&base_url), Arc::new(UnusedMarketplace));

    let first = state
        .estimate_route_cached(24.7136, 46.6753, 21.4858, 39.1925)
        .await
        .expect("route expected");
    let second = state
        .estimate_route_cached(24.7136, 46.6753, 21.4858, 39.1925)
        .await
        .expect("route expected");

    // El acierto es idéntico al cálculo fresco y no vuelve a tocar la red.
    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // Otro par de coordenadas sí va al upstream.
    state
        .estimate_route_cached(26.4207, 50.0888, 24.7136, 46.6753)
        .await
        .expect("route expected");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failures_are_never_cached() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_handler = hits.clone();

    // Primera llamada falla, la segunda responde bien.
    let router = Router::new().route(
        "/route/v1/driving/:coords",
        get(move || {
            let hits = hits_handler.clone();
            async move {
                let attempt = hits.fetch_add(1, Ordering::SeqCst);
                if attempt == 0 {
                    Err(StatusCode::SERVICE_UNAVAILABLE)
                } else {
                    Ok(Json(ok_route_body(1000.0, 120.0)))
                }
            }
        }),
    );

    let base_url = spawn_upstream(router).await;
    let state = AppState::new(test_config(&base_url), Arc::new(UnusedMarketplace));

    assert!(state.estimate_route_cached(24.7, 46.6, 21.4, 39.2).await.is_none());

    let retry = state
        .estimate_route_cached(24.7, 46.6, 21.4, 39.2)
        .await
        .expect("retry should reach upstream again");
    assert_eq!(retry.duration_display, "2 دقيقة");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
