//! Modelo de User
//!
//! Perfiles de usuario tal como los entrega el backend de identidad.
//! El onboarding es por rol: conductor, transportista (shipper) o admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::load::{TrailerType, TruckDimensions, TruckType};

/// Rol del usuario dentro de la plataforma
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Driver,
    Shipper,
    Admin,
}

/// Perfil de usuario devuelto por el backend de identidad
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub country_code: String,
    pub role: UserRole,
    pub created_at: Option<DateTime<Utc>>,
}

/// Datos de alta de un perfil (tras verificar el OTP)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    pub full_name: String,
    pub phone: String,
    pub country_code: String,
    pub role: UserRole,
}

/// Detalles del vehículo elegidos durante el registro del conductor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDetails {
    pub truck_type: TruckType,
    pub trailer_type: TrailerType,
    pub dimensions: TruckDimensions,
}

/// Resumen de conductor disponible, para el listado que ven los shippers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSummary {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub truck_type: Option<TruckType>,
    pub trailer_type: Option<TrailerType>,
    pub dimensions: Option<TruckDimensions>,
    pub current_city: Option<String>,
    pub rating: Option<f64>,
    pub completed_trips: i64,
    pub is_available: bool,
}
