use thiserror::Error;

/// Request-level failures. Any of these aborts the operation that hit it.
///
/// Field-level extraction misses are not errors: parsers return empty values
/// and keep going.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("rate limited by upstream while fetching {url}")]
    RateLimited { url: String },

    #[error("HTTP {status} {reason} while fetching {url}")]
    Http {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("transport error while fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ScrapeError {
    pub fn http(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::Http {
            url: url.into(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Upstream status code, when the failure came from an HTTP response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
