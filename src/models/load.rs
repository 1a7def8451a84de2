//! Modelo de Load (carga)
//!
//! Este módulo contiene el struct Load y los catálogos de camión/remolque
//! que usa el marketplace. La persistencia vive en el backend externo;
//! aquí solo se modela la forma de los registros que viajan por la API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::place::Coordinates;

/// Estado de la carga dentro del marketplace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Available,
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// Tipo de camión requerido/ofrecido
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TruckType {
    Trella,
    Lorry,
    Dyna,
    Pickup,
    Refrigerated,
    Tanker,
    Flatbed,
    Container,
}

/// Tipo de remolque del camión
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TrailerType {
    Flatbed,
    Curtain,
    Box,
    Refrigerated,
    Lowboy,
    Tank,
}

/// Dimensiones del camión
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TruckDimensions {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

/// Load principal - registro de carga tal como lo sirve el marketplace,
/// con el nombre/teléfono del dueño ya resueltos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Load {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub owner_phone: String,
    pub origin: String,
    pub origin_coords: Option<Coordinates>,
    pub destination: String,
    pub destination_coords: Option<Coordinates>,
    /// Distancia estimada en km (un decimal), calculada al publicar.
    pub distance_km: Option<f64>,
    /// Duración estimada ya formateada ("2 ساعة 30 دقيقة").
    pub estimated_time: Option<String>,
    pub weight_kg: Option<f64>,
    pub description: Option<String>,
    pub price: Decimal,
    pub truck_type_required: Option<TruckType>,
    pub status: LoadStatus,
    pub driver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Datos para publicar una carga nueva
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoad {
    pub origin: String,
    pub origin_coords: Option<Coordinates>,
    pub destination: String,
    pub destination_coords: Option<Coordinates>,
    pub distance_km: Option<f64>,
    pub estimated_time: Option<String>,
    pub weight_kg: Option<f64>,
    pub description: Option<String>,
    pub price: Decimal,
    pub truck_type_required: Option<TruckType>,
}

/// Resultado del reporte post-llamada entre conductor y dueño de la carga
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackOutcome {
    /// Hubo acuerdo: la carga se asigna al conductor.
    Agreed,
    /// Llamada perdida.
    Missed,
    /// No contestó.
    NoAnswer,
    /// Otro motivo.
    Other,
}

impl FeedbackOutcome {
    pub fn is_agreed(&self) -> bool {
        matches!(self, FeedbackOutcome::Agreed)
    }
}
