use reqwest::Url;

use crate::data_models::{SearchRequest, WireCode};
use crate::error::ScrapeError;

/// Number of postings the listing endpoint returns per page.
pub const BATCH_SIZE: u32 = 25;

pub const LISTING_PATH: &str = "/jobs-guest/jobs/api/seeMoreJobPostings/search";

/// Wire-level query parameters in the order they are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireParams(Vec<(&'static str, String)>);

impl WireParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn push_opt<T: WireCode>(&mut self, key: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.0.push((key, value.wire_code().to_string()));
        }
    }
}

/// Translate a search into listing query parameters for the page that starts
/// `batch_offset` postings after the request's own page.
pub fn wire_params(request: &SearchRequest, batch_offset: u32) -> WireParams {
    let mut params = WireParams(Vec::new());

    let keyword = request.keyword.trim();
    if !keyword.is_empty() {
        params.0.push(("keywords", keyword.to_string()));
    }
    let location = request.location.trim();
    if !location.is_empty() {
        params.0.push(("location", location.to_string()));
    }

    params.push_opt("f_TPR", request.posting_age);
    params.push_opt("f_SB2", request.salary);
    params.push_opt("f_E", request.experience_level);
    params.push_opt("f_WT", request.remote_mode);
    params.push_opt("f_JT", request.job_type);

    // always sent, even when false
    params.0.push(("f_VJ", request.verified_only.to_string()));
    params.0.push(("f_EA", request.low_competition_only.to_string()));

    let start = request.page.saturating_mul(BATCH_SIZE).saturating_add(batch_offset);
    params.0.push(("start", start.to_string()));

    params.push_opt("sortBy", request.sort_by);
    params
}

/// Full listing URL for one page.
pub fn listing_url(
    base_url: &str,
    request: &SearchRequest,
    batch_offset: u32,
) -> Result<Url, ScrapeError> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), LISTING_PATH);
    let mut url = Url::parse(&raw).map_err(|_| ScrapeError::invalid_url(raw.clone()))?;
    url.query_pairs_mut()
        .extend_pairs(wire_params(request, batch_offset).iter());
    Ok(url)
}

/// Cache key for a search: the first page's URL plus the requested limit, so
/// two searches that only differ in limit are cached separately.
pub fn cache_key(base_url: &str, request: &SearchRequest) -> Result<String, ScrapeError> {
    let first_page = listing_url(base_url, request, 0)?;
    Ok(format!("{}_limit:{}", first_page, request.limit))
}
