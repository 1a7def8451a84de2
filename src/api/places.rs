use axum::{
    extract::{Query, State},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::middleware::rate_limit::{rate_limit_middleware, RateLimitState};
use crate::models::place::PlaceCandidate;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlaceSearchQuery {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct PlaceSearchResponse {
    pub query: String,
    pub results: Vec<PlaceCandidate>,
}

/// Router de sugerencias. Lleva su propio rate limit, más estricto que el
/// global, porque cada petición termina en el geocoder público.
pub fn create_places_router(suggestion_limiter: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/search", get(search_places))
        .route_layer(middleware::from_fn_with_state(
            suggestion_limiter,
            rate_limit_middleware,
        ))
}

/// Endpoint de sugerencias de lugares.
///
/// Siempre responde 200: consultas cortas y fallos del geocoder devuelven
/// una lista vacía. El cliente no puede distinguir "sin resultados" de
/// "geocoder caído", y ese es el contrato.
pub async fn search_places(
    State(state): State<AppState>,
    Query(params): Query<PlaceSearchQuery>,
) -> Json<PlaceSearchResponse> {
    log::info!("🔍 Búsqueda de lugares: '{}'", params.q);

    let results = state.place_search.search_places(&params.q).await;

    Json(PlaceSearchResponse {
        query: params.q,
        results,
    })
}
