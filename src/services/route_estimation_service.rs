use serde::Deserialize;
use thiserror::Error;

use crate::config::EnvironmentConfig;
use crate::models::route::RouteEstimate;

const USER_AGENT: &str = "FreightMatching/1.0";

/// Respuesta del servicio de rutas tipo OSRM
#[derive(Debug, Deserialize)]
struct RouterResponse {
    code: String,
    #[serde(default)]
    routes: Vec<RouterRoute>,
}

#[derive(Debug, Deserialize)]
struct RouterRoute {
    /// Distancia en metros
    distance: f64,
    /// Duración en segundos
    duration: f64,
}

/// Fallos internos del cálculo de ruta. Igual que en la búsqueda de
/// lugares, no cruzan la frontera pública: se registran y colapsan a None.
#[derive(Debug, Error)]
pub enum RouteEstimationError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no route found (code: {code})")]
    NoRoute { code: String },
}

/// Servicio de estimación de rutas (distancia y tiempo de conducción)
#[derive(Clone)]
pub struct RouteEstimationService {
    client: reqwest::Client,
    base_url: String,
}

impl RouteEstimationService {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(config.routing_base_url.clone(), config.upstream_timeout_secs)
    }

    /// Calcular distancia y duración de conducción entre dos puntos.
    ///
    /// Devuelve None ante cualquier fallo (red, estado no-Ok, sin rutas);
    /// el caller debe tratarlo como "desconocido" y pintar un placeholder,
    /// nunca reintentar en bucle ni bloquear el formulario.
    pub async fn calculate_route(
        &self,
        origin_lat: f64,
        origin_lon: f64,
        dest_lat: f64,
        dest_lon: f64,
    ) -> Option<RouteEstimate> {
        match self
            .request_route(origin_lat, origin_lon, dest_lat, dest_lon)
            .await
        {
            Ok(estimate) => {
                log::info!(
                    "✅ Ruta calculada: {} / {}",
                    estimate.distance_display,
                    estimate.duration_display
                );
                Some(estimate)
            }
            Err(e) => {
                log::error!(
                    "❌ Error calculando ruta ({}, {}) -> ({}, {}): {}",
                    origin_lat,
                    origin_lon,
                    dest_lat,
                    dest_lon,
                    e
                );
                None
            }
        }
    }

    async fn request_route(
        &self,
        origin_lat: f64,
        origin_lon: f64,
        dest_lat: f64,
        dest_lon: f64,
    ) -> Result<RouteEstimate, RouteEstimationError> {
        // Contrato del router: las coordenadas van en orden longitud,latitud
        // en la URL. Solo aquí se invierte; el resto del sistema es (lat, lon).
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=false",
            self.base_url, origin_lon, origin_lat, dest_lon, dest_lat
        );

        log::info!("🌐 Consultando router: {}", url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteEstimationError::Status(status));
        }

        let body: RouterResponse = response
            .json()
            .await
            .map_err(|e| RouteEstimationError::Malformed(e.to_string()))?;

        if body.code != "Ok" {
            return Err(RouteEstimationError::NoRoute { code: body.code });
        }

        // La primera ruta es la mejor según el upstream.
        let route = body
            .routes
            .first()
            .ok_or(RouteEstimationError::NoRoute {
                code: "Ok/empty".to_string(),
            })?;

        Ok(RouteEstimate {
            distance_display: format_distance(route.distance),
            duration_display: format_duration(route.duration),
            distance_meters: route.distance,
            duration_seconds: route.duration,
        })
    }
}

/// Metros -> "N.N كم" (kilómetros con un decimal)
pub fn format_distance(meters: f64) -> String {
    format!("{:.1} كم", meters / 1000.0)
}

/// Segundos -> "H ساعة M دقيقة", omitiendo los componentes en cero.
/// Si horas y minutos son ambos cero, se usa el texto "أقل من دقيقة".
pub fn format_duration(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{} ساعة", hours));
    }
    if minutes > 0 {
        parts.push(format!("{} دقيقة", minutes));
    }

    if parts.is_empty() {
        "أقل من دقيقة".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_km_with_one_decimal() {
        assert_eq!(format_distance(152300.0), "152.3 كم");
        assert_eq!(format_distance(1000.0), "1.0 كم");
        assert_eq!(format_distance(950.0), "0.9 كم");
        assert_eq!(format_distance(0.0), "0.0 كم");
    }

    #[test]
    fn duration_composes_hours_then_minutes() {
        // 9000 s = 2 h 30 min
        assert_eq!(format_duration(9000.0), "2 ساعة 30 دقيقة");
        // 3600 s exactos: solo la parte de horas
        assert_eq!(format_duration(3600.0), "1 ساعة");
        // 300 s: solo minutos
        assert_eq!(format_duration(300.0), "5 دقيقة");
    }

    #[test]
    fn sub_minute_duration_uses_sentinel() {
        assert_eq!(format_duration(45.0), "أقل من دقيقة");
        assert_eq!(format_duration(0.0), "أقل من دقيقة");
        assert_eq!(format_duration(59.9), "أقل من دقيقة");
    }

    #[test]
    fn truncation_not_rounding_for_minutes() {
        // 5999 s = 1 h 39.98 min -> 1 h 39 min (floor, no redondeo)
        assert_eq!(format_duration(5999.0), "1 ساعة 39 دقيقة");
    }
}
