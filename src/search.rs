use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::{JobList, ResultCache};
use crate::data_models::{JobSummary, SearchRequest};
use crate::error::ScrapeError;
use crate::fetcher::HttpFetcher;
use crate::listing_parser::parse_listing;
use crate::params::{BATCH_SIZE, cache_key, listing_url};

/// Pause between two listing pages: `delay` plus a random `0..=jitter`.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub delay: Duration,
    pub jitter: Duration,
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    pub fn next_pause(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ms)
        };
        self.delay + Duration::from_millis(extra)
    }

    async fn pause(&self) {
        let pause = self.next_pause();
        if !pause.is_zero() {
            debug!("waiting {} ms before next page", pause.as_millis());
            tokio::time::sleep(pause).await;
        }
    }
}

enum PageOutcome {
    More,
    Done,
}

/// Drives the page loop for one search and keeps the result cache in front of it.
pub struct SearchOrchestrator {
    fetcher: HttpFetcher,
    cache: Arc<ResultCache>,
    listing_base_url: String,
    pacing: Pacing,
}

impl SearchOrchestrator {
    pub fn new(
        fetcher: HttpFetcher,
        cache: Arc<ResultCache>,
        listing_base_url: impl Into<String>,
        pacing: Pacing,
    ) -> Self {
        Self {
            fetcher,
            cache,
            listing_base_url: listing_base_url.into(),
            pacing,
        }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Run a search.
    ///
    /// Pages are fetched one after another until `request.limit` postings are
    /// collected or a page comes back empty. Any request-level failure aborts
    /// the whole search; postings from earlier pages are dropped, not returned.
    pub async fn search(&self, request: &SearchRequest) -> Result<JobList, ScrapeError> {
        let key = cache_key(&self.listing_base_url, request)?;
        info!("search started, cache key: {key}");

        if let Some(jobs) = self.cache.get(&key) {
            info!("returning {} cached postings", jobs.len());
            return Ok(jobs);
        }

        let mut jobs: Vec<JobSummary> = Vec::new();
        let mut offset = 0u32;
        loop {
            if offset > 0 {
                self.pacing.pause().await;
            }
            let url = listing_url(&self.listing_base_url, request, offset)?;
            let body = self.fetcher.fetch_listing(&url).await.inspect_err(|e| {
                warn!("search aborted at offset {offset}, {} postings discarded: {e}", jobs.len());
            })?;

            let page = parse_listing(&body);
            info!("fetched {} postings at offset {offset}", page.len());
            match absorb_page(&mut jobs, page, request.limit) {
                PageOutcome::Done => break,
                PageOutcome::More => offset += BATCH_SIZE,
            }
        }

        let jobs: JobList = jobs.into();
        if !jobs.is_empty() {
            self.cache.put(key, Arc::clone(&jobs));
        }
        info!("search finished with {} postings", jobs.len());
        Ok(jobs)
    }
}

/// Append a page and decide whether another one is needed. `limit == 0`
/// means no limit.
fn absorb_page(jobs: &mut Vec<JobSummary>, page: Vec<JobSummary>, limit: usize) -> PageOutcome {
    if page.is_empty() {
        return PageOutcome::Done;
    }
    jobs.extend(page);
    if limit > 0 && jobs.len() >= limit {
        jobs.truncate(limit);
        return PageOutcome::Done;
    }
    PageOutcome::More
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize) -> Vec<JobSummary> {
        (0..n)
            .map(|i| JobSummary {
                position: format!("p{i}"),
                company: "c".into(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_empty_page_ends_loop() {
        let mut jobs = page(3);
        assert!(matches!(absorb_page(&mut jobs, vec![], 0), PageOutcome::Done));
        assert_eq!(jobs.len(), 3);
    }

    #[test]
    fn test_limit_truncates() {
        let mut jobs = Vec::new();
        assert!(matches!(absorb_page(&mut jobs, page(25), 5), PageOutcome::Done));
        assert_eq!(jobs.len(), 5);
    }

    #[test]
    fn test_unbounded_keeps_going() {
        let mut jobs = Vec::new();
        assert!(matches!(absorb_page(&mut jobs, page(25), 0), PageOutcome::More));
        assert!(matches!(absorb_page(&mut jobs, page(25), 0), PageOutcome::More));
        assert_eq!(jobs.len(), 50);
    }

    #[test]
    fn test_pacing_stays_within_bounds() {
        let pacing = Pacing {
            delay: Duration::from_millis(2000),
            jitter: Duration::from_millis(1000),
        };
        for _ in 0..50 {
            let p = pacing.next_pause();
            assert!(p >= Duration::from_millis(2000) && p <= Duration::from_millis(3000));
        }
        assert_eq!(Pacing::none().next_pause(), Duration::ZERO);
    }
}
