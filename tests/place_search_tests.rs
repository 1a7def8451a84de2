//! Tests del servicio de búsqueda de lugares contra un geocoder simulado.
//! El upstream es un router axum local sirviendo respuestas enlatadas.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use freight_matching::services::place_search_service::PlaceSearchService;

async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn short_queries_issue_no_network_call() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_handler = hits.clone();

    let router = Router::new().route(
        "/search",
        get(move || {
            let hits = hits_handler.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(json!([]))
            }
        }),
    );

    let base_url = spawn_upstream(router).await;
    let service = PlaceSearchService::new(base_url, "ar".to_string(), 2);

    assert!(service.search_places("").await.is_empty());
    assert!(service.search_places("ري").await.is_empty());
    assert!(service.search_places("ab").await.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 0, "el gate corto no debe tocar la red");

    // El umbral cuenta caracteres, no bytes: 3 letras árabes sí disparan.
    service.search_places("جدة").await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn successful_search_maps_candidates_in_upstream_order() {
    let captured: Arc<Mutex<Option<HashMap<String, String>>>> = Arc::new(Mutex::new(None));
    let captured_handler = captured.clone();

    let router = Router::new().route(
        "/search",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let captured = captured_handler.clone();
            async move {
                *captured.lock().unwrap() = Some(params);
                Json(json!([
                    {
                        "display_name": "الرياض، منطقة الرياض، السعودية",
                        "lat": "24.7136",
                        "lon": "46.6753"
                    },
                    {
                        "display_name": "رياض الخبراء، منطقة القصيم، السعودية",
                        "lat": "25.9962",
                        "lon": "43.5594"
                    },
                    {
                        "display_name": "حي الرياض، جدة، السعودية",
                        "lat": "21.6243",
                        "lon": "39.2437"
                    }
                ]))
            }
        }),
    );

    let base_url = spawn_upstream(router).await;
    let service = PlaceSearchService::new(base_url, "ar".to_string(), 2);

    let results = service.search_places("الرياض").await;

    assert_eq!(results.len(), 3);
    // Orden del upstream preservado, sin re-ranking
    assert_eq!(results[0].label, "الرياض، منطقة الرياض، السعودية");
    assert_eq!(results[1].label, "رياض الخبراء، منطقة القصيم، السعودية");
    assert_eq!(results[2].label, "حي الرياض، جدة، السعودية");
    // Coordenadas parseadas desde texto a f64 dentro del servicio
    assert_eq!(results[0].latitude, 24.7136);
    assert_eq!(results[0].longitude, 46.6753);
    assert_eq!(results[2].latitude, 21.6243);

    let params = captured.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("format").map(String::as_str), Some("json"));
    assert_eq!(params.get("q").map(String::as_str), Some("الرياض"));
    assert_eq!(params.get("addressdetails").map(String::as_str), Some("1"));
    assert_eq!(params.get("limit").map(String::as_str), Some("5"));
    assert_eq!(params.get("accept-language").map(String::as_str), Some("ar"));
}

#[tokio::test]
async fn upstream_error_degrades_to_empty_list() {
    let router = Router::new().route(
        "/search",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );

    let base_url = spawn_upstream(router).await;
    let service = PlaceSearchService::new(base_url, "ar".to_string(), 2);

    assert!(service.search_places("الرياض").await.is_empty());
}

#[tokio::test]
async fn malformed_payload_degrades_to_empty_list() {
    // Objeto en vez de array: shape inesperado
    let router = Router::new().route(
        "/search",
        get(|| async { Json(json!({"unexpected": "shape"})) }),
    );

    let base_url = spawn_upstream(router).await;
    let service = PlaceSearchService::new(base_url, "ar".to_string(), 2);

    assert!(service.search_places("الرياض").await.is_empty());
}

#[tokio::test]
async fn unparseable_coordinates_degrade_to_empty_list() {
    let router = Router::new().route(
        "/search",
        get(|| async {
            Json(json!([
                {"display_name": "الرياض", "lat": "not-a-number", "lon": "46.6753"}
            ]))
        }),
    );

    let base_url = spawn_upstream(router).await;
    let service = PlaceSearchService::new(base_url, "ar".to_string(), 2);

    assert!(service.search_places("الرياض").await.is_empty());
}

#[tokio::test]
async fn slow_upstream_times_out_and_degrades_to_empty_list() {
    let router = Router::new().route(
        "/search",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(3)).await;
            Json(json!([]))
        }),
    );

    let base_url = spawn_upstream(router).await;
    // Timeout de cliente de 1 s, por debajo de los 3 s del handler
    let service = PlaceSearchService::new(base_url, "ar".to_string(), 1);

    assert!(service.search_places("الرياض").await.is_empty());
}

#[tokio::test]
async fn unreachable_upstream_degrades_to_empty_list() {
    // Puerto cerrado: fallo de conexión inmediato
    let service =
        PlaceSearchService::new("http://127.0.0.1:1".to_string(), "ar".to_string(), 1);

    assert!(service.search_places("الرياض").await.is_empty());
}
