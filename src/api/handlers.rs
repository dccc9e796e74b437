use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::data_models::SearchRequest;
use crate::engine::JobEngine;
use crate::error::ScrapeError;
use crate::fetcher::is_job_posting_url;

use super::models::{
    CacheResponse, DetailRequest, DetailResponse, HealthResponse, SearchResponse,
};

type ApiError = (StatusCode, String);

fn map_scrape_error(context: &str, e: ScrapeError) -> ApiError {
    error!("{context}: {e}");
    let status = match &e {
        ScrapeError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        ScrapeError::Http { .. } => StatusCode::BAD_GATEWAY,
        ScrapeError::Transport { .. } => StatusCode::GATEWAY_TIMEOUT,
        ScrapeError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
        ScrapeError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, format!("{context}: {e}"))
}

async fn run_search(
    engine: &JobEngine,
    request: SearchRequest,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();
    let jobs = engine
        .search(&request)
        .await
        .map_err(|e| map_scrape_error("Error searching jobs", e))?;

    let jobs = jobs.to_vec();
    info!(
        "search returned {} postings in {} ms",
        jobs.len(),
        start.elapsed().as_millis()
    );
    Ok(Json(SearchResponse {
        total_count: jobs.len(),
        jobs,
        cache_size: engine.cache_size(),
    }))
}

pub async fn search_handler(
    State(engine): State<Arc<JobEngine>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&engine, request).await
}

pub async fn search_query_handler(
    State(engine): State<Arc<JobEngine>>,
    Query(request): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&engine, request).await
}

async fn run_detail(engine: &JobEngine, job_url: &str) -> Result<Json<DetailResponse>, ApiError> {
    if job_url.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "job_url is required".to_string()));
    }
    if !is_job_posting_url(job_url) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Invalid job URL format".to_string(),
        ));
    }

    let job_details = engine
        .fetch_detail(job_url)
        .await
        .map_err(|e| map_scrape_error("Error extracting job details", e))?;

    Ok(Json(DetailResponse {
        job_details,
        message: "Job details extracted successfully".to_string(),
    }))
}

pub async fn detail_handler(
    State(engine): State<Arc<JobEngine>>,
    Json(request): Json<DetailRequest>,
) -> Result<Json<DetailResponse>, ApiError> {
    run_detail(&engine, &request.job_url).await
}

pub async fn detail_query_handler(
    State(engine): State<Arc<JobEngine>>,
    Query(request): Query<DetailRequest>,
) -> Result<Json<DetailResponse>, ApiError> {
    run_detail(&engine, &request.job_url).await
}

pub async fn clear_cache_handler(State(engine): State<Arc<JobEngine>>) -> Json<CacheResponse> {
    engine.clear_expired_cache();
    Json(CacheResponse {
        cache_size: engine.cache_size(),
        message: "Cache cleared successfully".to_string(),
    })
}

pub async fn cache_info_handler(State(engine): State<Arc<JobEngine>>) -> Json<CacheResponse> {
    Json(CacheResponse {
        cache_size: engine.cache_size(),
        message: "Cache information retrieved successfully".to_string(),
    })
}

pub async fn health_handler(State(engine): State<Arc<JobEngine>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        cache_size: engine.cache_size(),
    })
}
