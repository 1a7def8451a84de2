//! Freight Matching Platform - API Gateway
//!
//! Gateway HTTP para el cliente web móvil del marketplace de cargas:
//! búsqueda de lugares y estimación de rutas contra los servicios públicos
//! de mapas (con gating, cache y degradación a placeholder), y delegación
//! de identidad/persistencia al backend del marketplace.

pub mod api;
pub mod clients;
pub mod config;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
