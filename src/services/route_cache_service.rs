//! Cache acotado de estimaciones de ruta
//!
//! Cache en memoria con TTL corto y desalojo LRU, delante del servicio de
//! rutas. La clave son las coordenadas redondeadas a 4 decimales (~11 m),
//! suficiente para colapsar pares de puntos idénticos elegidos en el
//! cliente. Los fallos (None) no se cachean nunca.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::models::route::RouteEstimate;

/// Entradas máximas: del orden de los campos de formulario concurrentes,
/// no de todo el tráfico.
pub const DEFAULT_CAPACITY: usize = 32;

/// Vida de una entrada. El tráfico real cambia de coordenadas enseguida;
/// esto solo corta las ráfagas repetidas contra el router público.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RouteKey {
    origin_lat: i64,
    origin_lon: i64,
    dest_lat: i64,
    dest_lon: i64,
}

impl RouteKey {
    fn new(origin_lat: f64, origin_lon: f64, dest_lat: f64, dest_lon: f64) -> Self {
        Self {
            origin_lat: round4(origin_lat),
            origin_lon: round4(origin_lon),
            dest_lat: round4(dest_lat),
            dest_lon: round4(dest_lon),
        }
    }
}

fn round4(value: f64) -> i64 {
    (value * 10_000.0).round() as i64
}

#[derive(Debug, Clone)]
struct CachedRoute {
    estimate: RouteEstimate,
    inserted_at: Instant,
    last_used: Instant,
}

/// Cache de estimaciones de ruta
#[derive(Clone)]
pub struct RouteCacheService {
    entries: Arc<RwLock<HashMap<RouteKey, CachedRoute>>>,
    capacity: usize,
    ttl: Duration,
}

impl RouteCacheService {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    pub fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            capacity,
            ttl,
        }
    }

    /// Obtener una estimación cacheada para el par de coordenadas
    pub async fn get(
        &self,
        origin_lat: f64,
        origin_lon: f64,
        dest_lat: f64,
        dest_lon: f64,
    ) -> Option<RouteEstimate> {
        let key = RouteKey::new(origin_lat, origin_lon, dest_lat, dest_lon);
        let now = Instant::now();

        let mut entries = self.entries.write().await;

        match entries.get_mut(&key) {
            Some(cached) if now.duration_since(cached.inserted_at) < self.ttl => {
                cached.last_used = now;
                debug!("🧭 Route cache HIT para {:?}", key);
                Some(cached.estimate.clone())
            }
            Some(_) => {
                // Expirada: se elimina y se deja que el caller recalcule.
                entries.remove(&key);
                debug!("🧭 Route cache EXPIRED para {:?}", key);
                None
            }
            None => None,
        }
    }

    /// Guardar una estimación exitosa
    pub async fn insert(
        &self,
        origin_lat: f64,
        origin_lon: f64,
        dest_lat: f64,
        dest_lon: f64,
        estimate: RouteEstimate,
    ) {
        let key = RouteKey::new(origin_lat, origin_lon, dest_lat, dest_lon);
        let now = Instant::now();

        let mut entries = self.entries.write().await;

        // Limpiar entradas expiradas antes de medir la capacidad.
        let ttl = self.ttl;
        entries.retain(|_, cached| now.duration_since(cached.inserted_at) < ttl);

        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            // Desalojo LRU: fuera la entrada usada hace más tiempo.
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, cached)| cached.last_used)
                .map(|(key, _)| *key)
            {
                entries.remove(&oldest);
                debug!("🧭 Route cache EVICT {:?}", oldest);
            }
        }

        entries.insert(
            key,
            CachedRoute {
                estimate,
                inserted_at: now,
                last_used: now,
            },
        );
    }

    /// Número de entradas vivas (para diagnóstico)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for RouteCacheService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(meters: f64) -> RouteEstimate {
        RouteEstimate {
            distance_display: format!("{:.1} كم", meters / 1000.0),
            duration_display: "1 ساعة".to_string(),
            distance_meters: meters,
            duration_seconds: 3600.0,
        }
    }

    #[tokio::test]
    async fn hit_returns_identical_estimate() {
        let cache = RouteCacheService::new();
        cache.insert(24.7, 46.6, 21.4, 39.2, estimate(950_000.0)).await;

        let hit = cache.get(24.7, 46.6, 21.4, 39.2).await.unwrap();
        assert_eq!(hit.distance_meters, 950_000.0);
        assert_eq!(hit.distance_display, "950.0 كم");
    }

    #[tokio::test]
    async fn key_rounds_to_four_decimals() {
        let cache = RouteCacheService::new();
        cache.insert(24.70001, 46.6, 21.4, 39.2, estimate(1000.0)).await;

        // Mismo punto a ~1 m de distancia: misma clave.
        assert!(cache.get(24.70003, 46.6, 21.4, 39.2).await.is_some());
        // Punto distinto de verdad: clave distinta.
        assert!(cache.get(24.71, 46.6, 21.4, 39.2).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = RouteCacheService::with_limits(8, Duration::from_secs(600));
        cache.insert(24.7, 46.6, 21.4, 39.2, estimate(1000.0)).await;

        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(cache.get(24.7, 46.6, 21.4, 39.2).await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(24.7, 46.6, 21.4, 39.2).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn least_recently_used_entry_is_evicted() {
        let cache = RouteCacheService::with_limits(2, Duration::from_secs(600));
        cache.insert(1.0, 1.0, 2.0, 2.0, estimate(1000.0)).await;
        cache.insert(3.0, 3.0, 4.0, 4.0, estimate(2000.0)).await;

        // Refrescar la primera para que la segunda sea la LRU.
        assert!(cache.get(1.0, 1.0, 2.0, 2.0).await.is_some());

        cache.insert(5.0, 5.0, 6.0, 6.0, estimate(3000.0)).await;

        assert!(cache.get(1.0, 1.0, 2.0, 2.0).await.is_some());
        assert!(cache.get(3.0, 3.0, 4.0, 4.0).await.is_none());
        assert!(cache.get(5.0, 5.0, 6.0, 6.0).await.is_some());
    }
}
