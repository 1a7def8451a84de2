use serde::{Deserialize, Serialize};

/// Candidato de lugar devuelto por el servicio de geocoding.
/// Vive solo durante una búsqueda; no se persiste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Par de coordenadas en el orden interno del sistema: (latitud, longitud).
/// El orden invertido que exige el servicio de rutas se aplica únicamente
/// al construir la URL de la petición.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// El cliente móvil usa (0, 0) como centinela de "sin selección".
    pub fn is_zero_sentinel(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}
