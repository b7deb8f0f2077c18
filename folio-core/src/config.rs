//! Client configuration

use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_HERO_PERIOD: Duration = Duration::from_secs(6);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BOOK_LIMIT: u32 = 50;

/// Settings shared by the HTTP client and the pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolioConfig {
    /// Base URL of the REST API, also used to resolve media paths
    pub api_url: String,
    pub request_timeout: Duration,
    /// Dwell time of each hero item
    pub hero_period: Duration,
    /// Page size requested by the catalog page
    pub book_limit: u32,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            hero_period: DEFAULT_HERO_PERIOD,
            book_limit: DEFAULT_BOOK_LIMIT,
        }
    }
}

impl FolioConfig {
    /// Read configuration from `FOLIO_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("FOLIO_API_URL").filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("FOLIO_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse_positive("FOLIO_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = lookup("FOLIO_HERO_PERIOD_SECS") {
            config.hero_period =
                Duration::from_secs(parse_positive("FOLIO_HERO_PERIOD_SECS", &secs)?);
        }
        if let Some(limit) = lookup("FOLIO_BOOK_LIMIT") {
            config.book_limit = parse_positive("FOLIO_BOOK_LIMIT", &limit)? as u32;
        }

        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n >= 1 && n <= u32::MAX as u64 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
