use rand::seq::SliceRandom;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ScrapeError;

pub const CANONICAL_HOST: &str = "www.linkedin.com";
const SOURCE_DOMAIN: &str = "linkedin.com";

const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:89.0) Gecko/20100101 Firefox/89.0",
];

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Headers the listing endpoint sees from its own in-page XHR calls.
fn listing_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        header::REFERER,
        HeaderValue::from_static("https://www.linkedin.com/jobs"),
    );
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}

/// Headers of a top-level document navigation.
fn document_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

fn is_regional_label(label: &str) -> bool {
    label.len() == 2 && label.chars().all(|c| c.is_ascii_lowercase())
}

/// Rewrite regional variants (`pt.linkedin.com`, `br.linkedin.com`, ...) to
/// the canonical host so every detail page comes back in the same language
/// and markup.
pub fn normalize_detail_url(raw: &str) -> Result<Url, ScrapeError> {
    let mut url = Url::parse(raw.trim()).map_err(|_| ScrapeError::invalid_url(raw))?;
    let regional = url
        .host_str()
        .and_then(|host| host.strip_suffix(SOURCE_DOMAIN))
        .and_then(|prefix| prefix.strip_suffix('.'))
        .is_some_and(is_regional_label);
    if regional {
        url.set_host(Some(CANONICAL_HOST))
            .map_err(|_| ScrapeError::invalid_url(raw))?;
        debug!("normalized detail url {raw} -> {url}");
    }
    Ok(url)
}

/// Whether `raw` looks like a posting page: https on the source domain (any
/// subdomain) with a `/jobs/view/` path.
pub fn is_job_posting_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw.trim()) else {
        return false;
    };
    let on_source = url
        .host_str()
        .is_some_and(|host| host == SOURCE_DOMAIN || host.ends_with(".linkedin.com"));
    url.scheme() == "https" && on_source && url.path().starts_with("/jobs/view/")
}

/// Thin HTTP layer: one request in, raw markup or a classified failure out.
/// No retries happen here.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    listing_timeout: Duration,
    detail_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(listing_timeout: Duration, detail_timeout: Duration) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(ScrapeError::Client)?;
        Ok(Self {
            client,
            listing_timeout,
            detail_timeout,
        })
    }

    /// Fetch one listing page.
    pub async fn fetch_listing(&self, url: &Url) -> Result<String, ScrapeError> {
        self.fetch(url, listing_headers(), self.listing_timeout).await
    }

    /// Fetch one posting's page. The URL is normalized to the canonical host first.
    pub async fn fetch_detail(&self, raw_url: &str) -> Result<(Url, String), ScrapeError> {
        let url = normalize_detail_url(raw_url)?;
        let body = self
            .fetch(&url, document_headers(), self.detail_timeout)
            .await?;
        Ok((url, body))
    }

    async fn fetch(
        &self,
        url: &Url,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<String, ScrapeError> {
        let res = self
            .client
            .get(url.clone())
            .headers(headers)
            .header(header::USER_AGENT, random_user_agent())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ScrapeError::transport(url.as_str(), e))?;

        let status = res.status();
        debug!("GET {url} -> {status}");
        match status {
            StatusCode::OK => res
                .text()
                .await
                .map_err(|e| ScrapeError::transport(url.as_str(), e)),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("rate limited by upstream: {url}");
                Err(ScrapeError::RateLimited {
                    url: url.to_string(),
                })
            }
            other => {
                warn!("upstream returned {other} for {url}");
                Err(ScrapeError::http(url.as_str(), other))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_user_agent_comes_from_pool() {
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&random_user_agent()));
        }
    }

    #[test]
    fn test_regional_host_is_normalized() {
        let url = normalize_detail_url("https://pt.linkedin.com/jobs/view/dev-at-acme-42").unwrap();
        assert_eq!(url.as_str(), "https://www.linkedin.com/jobs/view/dev-at-acme-42");

        let url = normalize_detail_url("https://br.linkedin.com/jobs/view/x-1?trk=a").unwrap();
        assert_eq!(url.host_str(), Some(CANONICAL_HOST));
        assert_eq!(url.query(), Some("trk=a"));
    }

    #[test]
    fn test_other_hosts_are_untouched() {
        let url = normalize_detail_url("https://www.linkedin.com/jobs/view/x-1").unwrap();
        assert_eq!(url.as_str(), "https://www.linkedin.com/jobs/view/x-1");

        let url = normalize_detail_url("http://127.0.0.1:8080/jobs/view/x-1").unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));

        // not a regional label
        let url = normalize_detail_url("https://lnkd.linkedin.com/jobs/view/x-1").unwrap();
        assert_eq!(url.host_str(), Some("lnkd.linkedin.com"));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_detail_url("::not a url::"),
            Err(ScrapeError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_is_job_posting_url() {
        assert!(is_job_posting_url("https://www.linkedin.com/jobs/view/dev-at-acme-1"));
        assert!(is_job_posting_url("https://pt.linkedin.com/jobs/view/dev-at-acme-1"));
        assert!(is_job_posting_url("https://linkedin.com/jobs/view/dev-at-acme-1"));
        assert!(!is_job_posting_url("http://www.linkedin.com/jobs/view/dev-at-acme-1"));
        assert!(!is_job_posting_url("https://www.linkedin.com/in/someone"));
        assert!(!is_job_posting_url("https://evil-linkedin.com/jobs/view/1"));
        assert!(!is_job_posting_url("jobs/view/1"));
    }
}
