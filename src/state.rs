//! Shared application state
//! 
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::clients::marketplace_client::MarketplaceApi;
use crate::config::environment::EnvironmentConfig;
use crate::models::route::RouteEstimate;
use crate::services::place_search_service::PlaceSearchService;
use crate::services::route_cache_service::RouteCacheService;
use crate::services::route_estimation_service::RouteEstimationService;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub place_search: PlaceSearchService,
    pub route_estimation: RouteEstimationService,
    pub route_cache: RouteCacheService,
    pub marketplace: Arc<dyn MarketplaceApi>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, marketplace: Arc<dyn MarketplaceApi>) -> Self {
        Self {
            place_search: PlaceSearchService::from_config(&config),
            route_estimation: RouteEstimationService::from_config(&config),
            route_cache: RouteCacheService::new(),
            config,
            marketplace,
        }
    }

    /// Estimar una ruta pasando por el cache acotado.
    ///
    /// Un acierto de cache es indistinguible de un cálculo fresco. Los
    /// fallos (None) no se cachean: la siguiente petición reintenta contra
    /// el upstream.
    pub async fn estimate_route_cached(
        &self,
        origin_lat: f64,
        origin_lon: f64,
        dest_lat: f64,
        dest_lon: f64,
    ) -> Option<RouteEstimate> {
        if let Some(hit) = self
            .route_cache
            .get(origin_lat, origin_lon, dest_lat, dest_lon)
            .await
        {
            return Some(hit);
        }

        let estimate = self
            .route_estimation
            .calculate_route(origin_lat, origin_lon, dest_lat, dest_lon)
            .await?;

        self.route_cache
            .insert(origin_lat, origin_lon, dest_lat, dest_lon, estimate.clone())
            .await;

        Some(estimate)
    }
}
