use serde::{Deserialize, Serialize};

/// Estimación de ruta entre dos puntos.
///
/// Contiene tanto los textos listos para mostrar (km con un decimal,
/// duración en horas/minutos en árabe) como los valores crudos en
/// metros/segundos para quien necesite persistir números.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_display: String,
    pub duration_display: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RouteEstimate {
    /// Distancia en kilómetros con un decimal, tal como la muestra el
    /// cliente y como se persiste en el campo numérico de la carga.
    pub fn distance_km(&self) -> f64 {
        (self.distance_meters / 100.0).round() / 10.0
    }
}
