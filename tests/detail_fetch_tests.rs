use jobharvest::config::Config;
use jobharvest::engine::JobEngine;
use jobharvest::error::ScrapeError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_helpers {
    use super::*;

    pub const POSTING_PATH: &str = "/jobs/view/rust-engineer-at-acme-4319344438";

    pub const POSTING: &str = r#"<html><body>
  <h1 class="top-card-layout__title">Rust Engineer</h1>
  <a class="topcard__org-name-link">Acme</a>
  <figcaption class="num-applicants__caption">47 applicants</figcaption>
  <span class="job-details-skill-pill__text">Rust</span>
</body></html>"#;

    pub fn test_engine() -> JobEngine {
        JobEngine::new(&Config::default().without_pacing()).expect("engine builds")
    }

    pub async fn serve_posting(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(POSTING_PATH))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_fetch_detail_parses_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POSTING_PATH))
        .and(header("sec-fetch-mode", "navigate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(POSTING))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}{}", server.uri(), POSTING_PATH);
    let detail = test_engine().fetch_detail(&url).await.unwrap();

    assert_eq!(detail.title, "Rust Engineer");
    assert_eq!(detail.company, "Acme");
    assert_eq!(detail.applicant_count, "47 applicants");
    assert_eq!(detail.skills, vec!["Rust"]);
    assert_eq!(detail.job_url, url);
}

#[tokio::test]
async fn test_detail_fetches_are_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POSTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(POSTING))
        .expect(2)
        .mount(&server)
        .await;

    let engine = test_engine();
    let url = format!("{}{}", server.uri(), POSTING_PATH);
    engine.fetch_detail(&url).await.unwrap();
    engine.fetch_detail(&url).await.unwrap();
    assert_eq!(engine.cache_size(), 0);
}

#[tokio::test]
async fn test_detail_rate_limited() {
    let server = MockServer::start().await;
    serve_posting(&server, ResponseTemplate::new(429)).await;

    let url = format!("{}{}", server.uri(), POSTING_PATH);
    let err = test_engine().fetch_detail(&url).await.unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_detail_not_found() {
    let server = MockServer::start().await;
    serve_posting(&server, ResponseTemplate::new(404)).await;

    let url = format!("{}{}", server.uri(), POSTING_PATH);
    let err = test_engine().fetch_detail(&url).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Not Found"), "{err}");
}

#[tokio::test]
async fn test_detail_malformed_url() {
    let err = test_engine().fetch_detail("definitely not a url").await.unwrap_err();
    assert!(matches!(err, ScrapeError::InvalidUrl { .. }));
}
