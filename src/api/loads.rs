use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::routing::RouteEstimateResponse;
use crate::models::load::{FeedbackOutcome, Load, LoadStatus, NewLoad, TruckType};
use crate::models::place::Coordinates;
use crate::state::AppState;
use crate::utils::errors::{marketplace_error, not_found_error, AppError};

#[derive(Debug, Deserialize, Validate)]
pub struct PostLoadRequest {
    // TODO: Extraer owner_id del token de sesión cuando el marketplace
    // exponga verificación de sesiones a esta API
    pub owner_id: Uuid,

    #[validate(length(min = 2, max = 200))]
    pub origin: String,

    pub origin_coords: Option<Coordinates>,

    #[validate(length(min = 2, max = 200))]
    pub destination: String,

    pub destination_coords: Option<Coordinates>,

    #[validate(range(min = 0.0))]
    pub weight_kg: Option<f64>,

    pub price: Decimal,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub truck_type_required: Option<TruckType>,
}

#[derive(Debug, Serialize)]
pub struct LoadDetailsResponse {
    pub load: Load,
    pub route: RouteEstimateResponse,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub driver_id: Uuid,
    pub outcome: FeedbackOutcome,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub status: LoadStatus,
}

pub fn create_loads_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_loads))
        .route("/", post(post_load))
        .route("/:id", get(get_load))
        .route("/:id/feedback", post(submit_feedback))
        .route("/:id/cancel", post(cancel_load))
}

/// Cargas disponibles (las que nadie tomó), más recientes primero
pub async fn list_loads(State(state): State<AppState>) -> Result<Json<Vec<Load>>, AppError> {
    let loads = state
        .marketplace
        .list_available_loads()
        .await
        .map_err(|e| marketplace_error("list_available_loads", e))?;

    log::info!("📦 Listado de cargas disponibles: {}", loads.len());
    Ok(Json(loads))
}

/// Detalle de carga con la estimación de ruta adjunta.
///
/// Si la carga no tiene coordenadas, o el router falla, la estimación baja
/// como placeholder; el detalle nunca falla por culpa del router.
pub async fn get_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoadDetailsResponse>, AppError> {
    let load = state
        .marketplace
        .get_load(id)
        .await
        .map_err(|e| marketplace_error("get_load", e))?
        .ok_or_else(|| not_found_error("Load", &id.to_string()))?;

    let route = match (load.origin_coords, load.destination_coords) {
        (Some(origin), Some(destination))
            if !origin.is_zero_sentinel() && !destination.is_zero_sentinel() =>
        {
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
        _ => RouteEstimateResponse::placeholder(),
    };

    Ok(Json(LoadDetailsResponse { load, route }))
}

/// Publicar una carga.
///
/// Si ambos extremos traen coordenadas se calcula la ruta y se persisten
/// la distancia numérica (km, un decimal) y la duración formateada, igual
/// que hace la pantalla de publicación. Un fallo de estimación no bloquea
/// la publicación: la carga sale sin distancia.
pub async fn post_load(
    State(state): State<AppState>,
    Json(request): Json<PostLoadRequest>,
) -> Result<Json<Load>, AppError> {
    request.validate()?;

    let (distance_km, estimated_time) = match (request.origin_coords, request.destination_coords) {
        (Some(origin), Some(destination))
            if !origin.is_zero_sentinel() && !destination.is_zero_sentinel() =>
        {
            match state
                .estimate_route_cached(
                    origin.latitude,
                    origin.longitude,
                    destination.latitude,
                    destination.longitude,
                )
                .await
            {
                Some(estimate) => (Some(estimate.distance_km()), Some(estimate.duration_display)),
                None => (None, None),
            }
        }
        _ => (None, None),
    };

    let load = state
        .marketplace
        .post_load(
            request.owner_id,
            NewLoad {
                origin: request.origin,
                origin_coords: request.origin_coords,
                destination: request.destination,
                destination_coords: request.destination_coords,
                distance_km,
                estimated_time,
                weight_kg: request.weight_kg,
                description: request.description,
                price: request.price,
                truck_type_required: request.truck_type_required,
            },
        )
        .await
        .map_err(|e| marketplace_error("post_load", e))?;

    log::info!("✅ Carga publicada: {} ({} -> {})", load.id, load.origin, load.destination);
    Ok(Json(load))
}

/// Reporte post-llamada del conductor.
///
/// "Hubo acuerdo" asigna la carga al conductor; cualquier otro resultado
/// se registra y la carga sigue disponible en el mercado.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    log::info!(
        "📞 Feedback para carga {}: {:?} (conductor {})",
        id,
        request.outcome,
        request.driver_id
    );

    if let Some(notes) = &request.notes {
        log::info!("📝 Notas del reporte: {}", notes);
    }

    if request.outcome.is_agreed() {
        state
            .marketplace
            .accept_load(id, request.driver_id)
            .await
            .map_err(|e| marketplace_error("accept_load", e))?;

        return Ok(Json(FeedbackResponse {
            success: true,
            status: LoadStatus::Completed,
        }));
    }

    Ok(Json(FeedbackResponse {
        success: true,
        status: LoadStatus::Available,
    }))
}

/// Devolver una carga al mercado (desasignar al conductor)
pub async fn cancel_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .marketplace
        .cancel_load(id)
        .await
        .map_err(|e| marketplace_error("cancel_load", e))?;

    Ok(Json(json!({
        "success": true,
        "status": "available"
    })))
}
