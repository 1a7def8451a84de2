use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::models::load::{Load, TrailerType, TruckDimensions, TruckType};
use crate::models::user::{DriverSummary, VehicleDetails};
use crate::state::AppState;
use crate::utils::errors::{marketplace_error, AppError};

#[derive(Debug, Deserialize)]
pub struct SaveVehicleRequest {
    pub truck_type: TruckType,
    pub trailer_type: TrailerType,
    pub dimensions: TruckDimensions,
}

pub fn create_drivers_router() -> Router<AppState> {
    Router::new()
        .route("/available", get(list_available_drivers))
        .route("/:id/vehicle", put(save_vehicle_details))
        .route("/:id/history", get(driver_history))
}

/// Conductores disponibles, para el listado que ven los shippers
pub async fn list_available_drivers(
    State(state): State<AppState>,
) -> Result<Json<Vec<DriverSummary>>, AppError> {
    let drivers = state
        .marketplace
        .list_available_drivers()
        .await
        .map_err(|e| marketplace_error("list_available_drivers", e))?;

    Ok(Json(drivers))
}

/// Guardar los detalles de vehículo del registro del conductor
pub async fn save_vehicle_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveVehicleRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .marketplace
        .save_vehicle_details(
            id,
            VehicleDetails {
                truck_type: request.truck_type,
                trailer_type: request.trailer_type,
                dimensions: request.dimensions,
            },
        )
        .await
        .map_err(|e| marketplace_error("save_vehicle_details", e))?;

    log::info!("🚛 Vehículo guardado para conductor {}", id);

    Ok(Json(json!({
        "success": true,
        "message": "Vehicle details saved"
    })))
}

/// Historial de cargas del conductor (completadas y en curso)
pub async fn driver_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Load>>, AppError> {
    let loads = state
        .marketplace
        .list_driver_history(id)
        .await
        .map_err(|e| marketplace_error("list_driver_history", e))?;

    Ok(Json(loads))
}
