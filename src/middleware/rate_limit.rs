//! Middleware de Rate Limiting
//! 
//! Este módulo maneja la limitación de velocidad de requests.
//! Además del límite global, el endpoint de sugerencias lleva un límite
//! más estricto: cada sugerencia termina en el geocoder público y su
//! política de uso es la razón de ser del gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::config::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Estructura para almacenar información de rate limiting por IP
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Estado del rate limiting (un mapa por limitador)
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimitState {
    /// Crear el limitador global a partir de la configuración
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self::with_limits(config.rate_limit_requests, config.rate_limit_window)
    }

    /// Limitador estricto para el endpoint de sugerencias (mitad de budget)
    pub fn strict(config: &EnvironmentConfig) -> Self {
        Self::with_limits(
            (config.rate_limit_requests / 2).max(1),
            config.rate_limit_window,
        )
    }

    pub fn with_limits(max_requests: u32, window_secs: u64) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration: Duration::from_secs(window_secs),
        }
    }

    /// Verificar si una IP ha excedido el límite
    pub async fn check_rate_limit(&self, ip: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if now.duration_since(info.window_start) >= self.window_duration {
            info.requests = 1;
            info.window_start = now;
            return Ok(());
        }

        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

fn client_ip(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .split(',')
        .next()
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

/// Middleware de rate limiting
pub async fn rate_limit_middleware(
    State(rate_limit_state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);
    rate_limit_state.check_rate_limit(&ip).await?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn limit_resets_after_window() {
        let state = RateLimitState::with_limits(2, 1);

        assert!(state.check_rate_limit("1.2.3.4").await.is_ok());
        assert!(state.check_rate_limit("1.2.3.4").await.is_ok());
        assert!(state.check_rate_limit("1.2.3.4").await.is_err());

        // Otra IP tiene su propio budget
        assert!(state.check_rate_limit("5.6.7.8").await.is_ok());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(state.check_rate_limit("1.2.3.4").await.is_ok());
    }
}
