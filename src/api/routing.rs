use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::models::place::Coordinates;
use crate::models::route::RouteEstimate;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Máximo de tramos por petición de lote
const MAX_BATCH_LEGS: usize = 25;

/// Tamaño de los sub-lotes concurrentes contra el router público
const BATCH_CHUNK_SIZE: usize = 10;

#[derive(Debug, Deserialize)]
pub struct RouteEstimateQuery {
    pub origin_lat: Option<f64>,
    pub origin_lon: Option<f64>,
    pub dest_lat: Option<f64>,
    pub dest_lon: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RouteEstimateResponse {
    pub found: bool,
    pub distance: Option<String>,
    pub duration: Option<String>,
    pub distance_meters: Option<f64>,
    pub duration_seconds: Option<f64>,
}

impl RouteEstimateResponse {
    /// Placeholder: el cliente pinta guiones y sigue funcionando.
    pub fn placeholder() -> Self {
        Self {
            found: false,
            distance: None,
            duration: None,
            distance_meters: None,
            duration_seconds: None,
        }
    }

    pub fn from_estimate(estimate: RouteEstimate) -> Self {
        Self {
            found: true,
            distance: Some(estimate.distance_display),
            duration: Some(estimate.duration_display),
            distance_meters: Some(estimate.distance_meters),
            duration_seconds: Some(estimate.duration_seconds),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RouteLeg {
    pub origin: Coordinates,
    pub destination: Coordinates,
}

#[derive(Debug, Deserialize)]
pub struct BatchRouteEstimateRequest {
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Serialize)]
pub struct BatchRouteEstimateResponse {
    pub results: Vec<RouteEstimateResponse>,
}

pub fn create_routing_router() -> Router<AppState> {
    Router::new()
        .route("/estimate", get(estimate_route))
        .route("/estimates", post(batch_estimate_routes))
}

/// Endpoint de estimación de ruta.
///
/// Sin ambas coordenadas (o con el centinela (0,0) del cliente) no hay
/// estimación: se responde el placeholder sin tocar el upstream. Un fallo
/// upstream también responde placeholder; nunca un error.
pub async fn estimate_route(
    State(state): State<AppState>,
    Query(params): Query<RouteEstimateQuery>,
) -> Json<RouteEstimateResponse> {
    let (origin, destination) = match leg_from_query(&params) {
        Some(leg) => leg,
        None => return Json(RouteEstimateResponse::placeholder()),
    };

    log::info!(
        "🗺️ Estimación de ruta ({}, {}) -> ({}, {})",
        origin.latitude,
        origin.longitude,
        destination.latitude,
        destination.longitude
    );

    Json(estimate_leg(&state, origin, destination).await)
}

/// Estimación en lote para listados de cargas.
///
/// Cada tramo degrada individualmente: un fallo en uno no afecta al resto.
pub async fn batch_estimate_routes(
    State(state): State<AppState>,
    Json(request): Json<BatchRouteEstimateRequest>,
) -> Result<Json<BatchRouteEstimateResponse>, AppError> {
    if request.legs.len() > MAX_BATCH_LEGS {
        return Err(AppError::BadRequest(format!(
            "Maximum {} legs allowed per batch",
            MAX_BATCH_LEGS
        )));
    }

    log::info!("🗺️ Estimación en lote: {} tramos", request.legs.len());

    let mut results = Vec::with_capacity(request.legs.len());

    // Procesar en sub-lotes para no sobrecargar el router público.
    for chunk in request.legs.chunks(BATCH_CHUNK_SIZE) {
        let futures = chunk
            .iter()
            .map(|leg| estimate_leg(&state, leg.origin, leg.destination));

        let chunk_results = futures::future::join_all(futures).await;
        results.extend(chunk_results);
    }

    Ok(Json(BatchRouteEstimateResponse { results }))
}

async fn estimate_leg(
    state: &AppState,
    origin: Coordinates,
    destination: Coordinates,
) -> RouteEstimateResponse {
    if origin.is_zero_sentinel() || destination.is_zero_sentinel() {
        return RouteEstimateResponse::placeholder();
    }

    match state
        .estimate_route_cached(
            origin.latitude,
            origin.longitude,
            destination.latitude,
            destination.longitude,
        )
        .await
    {
        Some(estimate) => RouteEstimateResponse::from_estimate(estimate),
        None => RouteEstimateResponse::placeholder(),
    }
}

fn leg_from_query(params: &RouteEstimateQuery) -> Option<(Coordinates, Coordinates)> {
    let origin = Coordinates::new(params.origin_lat?, params.origin_lon?);
    let destination = Coordinates::new(params.dest_lat?, params.dest_lon?);
    Some((origin, destination))
}
