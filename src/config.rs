use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config::from_env()
});

pub const DEFAULT_LISTING_BASE_URL: &str = "https://www.linkedin.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Scheme and host the listing endpoint lives on, without a trailing slash.
    pub listing_base_url: String,
    pub listing_timeout: Duration,
    pub detail_timeout: Duration,
    pub cache_ttl: Duration,
    /// Fixed part of the pause between two listing pages.
    pub page_delay: Duration,
    /// Upper bound of the random extra pause added to `page_delay`.
    pub page_jitter: Duration,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listing_base_url: DEFAULT_LISTING_BASE_URL.to_string(),
            listing_timeout: Duration::from_secs(10),
            detail_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(3600),
            page_delay: Duration::from_millis(2000),
            page_jitter: Duration::from_millis(1000),
            bind_addr: "0.0.0.0:8001".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        let defaults = Config::default();
        Config {
            listing_base_url: get_env_or_default(
                "JOBHARVEST_LISTING_BASE_URL",
                &defaults.listing_base_url,
            )
            .trim_end_matches('/')
            .to_string(),
            listing_timeout: Duration::from_secs(get_env_parsed_or_default(
                "JOBHARVEST_LISTING_TIMEOUT_SECS",
                defaults.listing_timeout.as_secs(),
            )),
            detail_timeout: Duration::from_secs(get_env_parsed_or_default(
                "JOBHARVEST_DETAIL_TIMEOUT_SECS",
                defaults.detail_timeout.as_secs(),
            )),
            cache_ttl: Duration::from_secs(get_env_parsed_or_default(
                "JOBHARVEST_CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )),
            page_delay: Duration::from_millis(get_env_parsed_or_default(
                "JOBHARVEST_PAGE_DELAY_MS",
                defaults.page_delay.as_millis() as u64,
            )),
            page_jitter: Duration::from_millis(get_env_parsed_or_default(
                "JOBHARVEST_PAGE_JITTER_MS",
                defaults.page_jitter.as_millis() as u64,
            )),
            bind_addr: get_env_or_default("JOBHARVEST_BIND_ADDR", &defaults.bind_addr),
        }
    }

    /// Same settings with pacing disabled. Handy when the upstream is a local mock.
    pub fn without_pacing(mut self) -> Config {
        self.page_delay = Duration::ZERO;
        self.page_jitter = Duration::ZERO;
        self
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed_or_default<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("Invalid value for environment variable {key}: {raw}")),
        Err(_) => default,
    }
}
