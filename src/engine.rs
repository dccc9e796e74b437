use std::sync::Arc;
use tracing::info;

use crate::cache::{JobList, ResultCache};
use crate::config::Config;
use crate::data_models::{JobDetail, SearchRequest};
use crate::detail_parser::parse_job_detail;
use crate::error::ScrapeError;
use crate::fetcher::HttpFetcher;
use crate::search::{Pacing, SearchOrchestrator};

/// Entry point for callers: listing search, single-posting detail fetch and
/// cache administration.
pub struct JobEngine {
    search: SearchOrchestrator,
    fetcher: HttpFetcher,
}

impl JobEngine {
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let cache = Arc::new(ResultCache::new(config.cache_ttl));
        Self::with_cache(config, cache)
    }

    /// Build an engine around an existing cache, e.g. one shared with another engine.
    pub fn with_cache(config: &Config, cache: Arc<ResultCache>) -> Result<Self, ScrapeError> {
        let fetcher = HttpFetcher::new(config.listing_timeout, config.detail_timeout)?;
        let pacing = Pacing {
            delay: config.page_delay,
            jitter: config.page_jitter,
        };
        let search = SearchOrchestrator::new(
            fetcher.clone(),
            cache,
            config.listing_base_url.clone(),
            pacing,
        );
        Ok(Self { search, fetcher })
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<JobList, ScrapeError> {
        self.search.search(request).await
    }

    /// Scrape one posting page. Not cached. Callers are expected to reject
    /// URLs that are not posting pages before calling this.
    pub async fn fetch_detail(&self, job_url: &str) -> Result<JobDetail, ScrapeError> {
        let (url, html) = self.fetcher.fetch_detail(job_url).await?;
        let detail = parse_job_detail(&html, url.as_str());
        info!("scraped detail for {url}: {:?} at {:?}", detail.title, detail.company);
        Ok(detail)
    }

    pub fn clear_expired_cache(&self) {
        self.search.cache().clear_expired();
    }

    pub fn cache_size(&self) -> usize {
        self.search.cache().size()
    }
}
