//! Debounce de sugerencias de lugares
//!
//! Componente por campo de entrada que convierte un stream de pulsaciones
//! en como máximo una búsqueda en vuelo. Cada pulsación cancela el
//! temporizador pendiente y programa uno nuevo; al disparar, la búsqueda
//! captura un número de generación y solo la última emitida puede publicar
//! sus resultados. Una respuesta tardía de una búsqueda anterior se
//! descarta en silencio, nunca pisa sugerencias más recientes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::models::place::PlaceCandidate;
use crate::services::place_search_service::{PlaceSearcher, MIN_QUERY_LEN};

/// Período de silencio tras la última pulsación antes de buscar.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(1000);

/// Debouncer de un campo de búsqueda de lugares.
///
/// Posee en exclusiva su temporizador pendiente y su marcador de última
/// llamada; no hay estado compartido entre campos distintos.
pub struct SuggestionDebouncer {
    searcher: Arc<dyn PlaceSearcher>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    latest: Arc<Mutex<Vec<PlaceCandidate>>>,
    pending: Option<JoinHandle<()>>,
}

impl SuggestionDebouncer {
    pub fn new(searcher: Arc<dyn PlaceSearcher>) -> Self {
        Self::with_delay(searcher, DEBOUNCE_DELAY)
    }

    pub fn with_delay(searcher: Arc<dyn PlaceSearcher>, delay: Duration) -> Self {
        Self {
            searcher,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(Mutex::new(Vec::new())),
            pending: None,
        }
    }

    /// Registrar el texto tras una pulsación.
    ///
    /// Resetea por completo el temporizador pendiente, de forma que nunca
    /// hay más de una invocación retrasada programada por campo.
    pub fn on_keystroke(&mut self, query: &str) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }

        if query.chars().count() < MIN_QUERY_LEN {
            // Por debajo del umbral no se programa trabajo y se invalida
            // cualquier respuesta todavía en vuelo.
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.latest.lock().unwrap().clear();
            return;
        }

        let searcher = Arc::clone(&self.searcher);
        let generation = Arc::clone(&self.generation);
        let latest = Arc::clone(&self.latest);
        let delay = self.delay;
        let query = query.to_string();

        // El handle abortable cubre SOLO el temporizador. Una vez emitida,
        // la petición corre en una tarea separada que no se aborta: si su
        // respuesta llega tarde se descarta por generación, que es la única
        // "cancelación" que existe aquí.
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            tokio::spawn(async move {
                // La generación se captura al emitir la petición; al
                // resolver, solo la última emitida coincide y publica.
                let issued = generation.fetch_add(1, Ordering::SeqCst) + 1;
                let results = searcher.search_places(&query).await;

                if generation.load(Ordering::SeqCst) == issued {
                    *latest.lock().unwrap() = results;
                } else {
                    log::debug!("🕓 Respuesta obsoleta descartada para '{}'", query);
                }
            });
        }));
    }

    /// Sugerencias visibles ahora mismo (las de la última búsqueda aplicada)
    pub fn suggestions(&self) -> Vec<PlaceCandidate> {
        self.latest.lock().unwrap().clone()
    }
}

impl Drop for SuggestionDebouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }
}
