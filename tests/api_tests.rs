use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use jobharvest::api::create_router;
use jobharvest::config::Config;
use jobharvest::engine::JobEngine;
use jobharvest::params::LISTING_PATH;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_helpers {
    use super::*;

    pub const TWO_JOBS: &str = r#"
<li><h3 class="base-search-card__title">Rust Engineer</h3><h4 class="base-search-card__subtitle">Acme</h4></li>
<li><h3 class="base-search-card__title">Go Engineer</h3><h4 class="base-search-card__subtitle">Globex</h4></li>"#;

    pub fn engine_for(base_url: String) -> Arc<JobEngine> {
        let config = Config {
            listing_base_url: base_url,
            ..Config::default()
        }
        .without_pacing();
        Arc::new(JobEngine::new(&config).expect("engine builds"))
    }

    pub async fn send(engine: Arc<JobEngine>, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(engine).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    pub async fn listing_server(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_post_search_returns_jobs() {
    let server = listing_server(ResponseTemplate::new(200).set_body_string(TWO_JOBS)).await;
    let engine = engine_for(server.uri());

    let request = Request::post("/api/jobs/search")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"keyword":"engineer","limit":2,"job_type":"full time"}"#))
        .unwrap();
    let (status, body) = send(engine, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["cache_size"], 1);
    assert_eq!(body["jobs"][0]["position"], "Rust Engineer");
    assert_eq!(body["jobs"][1]["company"], "Globex");
    assert_eq!(body["jobs"][1]["salary"], "Not specified");
}

#[tokio::test]
async fn test_get_search_uses_query_string() {
    let server = listing_server(ResponseTemplate::new(200).set_body_string(TWO_JOBS)).await;
    let engine = engine_for(server.uri());

    let request = Request::get("/api/jobs/search?keyword=engineer&limit=1&salary=100000")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(engine, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
}

#[tokio::test]
async fn test_search_rate_limit_maps_to_429() {
    let server = listing_server(ResponseTemplate::new(429)).await;
    let engine = engine_for(server.uri());

    let request = Request::post("/api/jobs/search")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"keyword":"engineer"}"#))
        .unwrap();
    let (status, _) = send(engine, request).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_search_upstream_error_maps_to_502() {
    let server = listing_server(ResponseTemplate::new(503)).await;
    let engine = engine_for(server.uri());

    let request = Request::get("/api/jobs/search?keyword=engineer")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(engine, request).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.as_str().unwrap_or_default().contains("503"));
}

#[tokio::test]
async fn test_details_rejects_non_posting_urls() {
    let engine = engine_for("http://127.0.0.1:9".to_string());

    let request = Request::get("/api/jobs/details?job_url=https%3A%2F%2Fexample.com%2Fjobs%2Fview%2F1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(Arc::clone(&engine), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::post("/api/jobs/details")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(engine, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, Value::String("job_url is required".to_string()));
}

#[tokio::test]
async fn test_cache_endpoints_and_health() {
    let server = listing_server(ResponseTemplate::new(200).set_body_string(TWO_JOBS)).await;
    let engine = engine_for(server.uri());
    engine
        .search(&jobharvest::data_models::SearchRequest::new("engineer", "").with_limit(2))
        .await
        .unwrap();

    let (status, body) = send(
        Arc::clone(&engine),
        Request::get("/api/cache/info").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cache_size"], 1);

    // entries are fresh, so clearing expired ones keeps them
    let (status, body) = send(
        Arc::clone(&engine),
        Request::delete("/api/cache").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cache_size"], 1);

    let (status, body) = send(
        engine,
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache_size"], 1);
}
