//! Services module
//! 
//! Este módulo contiene la lógica de negocio y servicios de la aplicación.
//! Los servicios encapsulan las integraciones con los servicios públicos
//! de mapas y el comportamiento de debounce/cache delante de ellos.

pub mod place_search_service;
pub mod route_cache_service;
pub mod route_estimation_service;
pub mod suggestion_debouncer;

pub use place_search_service::*;
pub use route_cache_service::*;
pub use route_estimation_service::*;
pub use suggestion_debouncer::*;
