use serde::{Deserialize, Serialize};

use crate::data_models::{JobDetail, JobSummary};

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub jobs: Vec<JobSummary>,
    pub total_count: usize,
    pub cache_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct DetailRequest {
    #[serde(default)]
    pub job_url: String,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub job_details: JobDetail,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CacheResponse {
    pub cache_size: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub cache_size: usize,
}
