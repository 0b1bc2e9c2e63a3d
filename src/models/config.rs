//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::{ExchangeRateTable, FilterSpec, Query};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote API endpoints and HTTP behavior
    #[serde(default)]
    pub api: ApiConfig,

    /// Detail fetch concurrency and deadline
    #[serde(default)]
    pub collector: CollectorConfig,

    /// On-disk result cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Currency code to rate per unit of base currency
    #[serde(default = "defaults::rates")]
    pub rates: BTreeMap<String, f64>,

    /// Default search parameters
    #[serde(default = "defaults::query")]
    pub query: Query,

    /// Default post-fetch filter
    #[serde(default)]
    pub filter: FilterSpec,

    /// Default maximum number of vacancies
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.api.base_url)?;
        url::Url::parse(&self.api.areas_url)?;
        if self.collector.workers == 0 {
            return Err(AppError::validation("collector.workers must be > 0"));
        }
        if self.collector.deadline_secs == Some(0) {
            return Err(AppError::validation("collector.deadline_secs must be > 0"));
        }
        if self.cache.dir.as_os_str().is_empty() {
            return Err(AppError::validation("cache.dir is empty"));
        }
        if self.rates.is_empty() {
            return Err(AppError::validation("No exchange rates defined"));
        }
        self.rate_table()?;
        Ok(())
    }

    /// Exchange rates as a validated table.
    pub fn rate_table(&self) -> Result<ExchangeRateTable> {
        ExchangeRateTable::new(self.rates.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            collector: CollectorConfig::default(),
            cache: CacheConfig::default(),
            rates: defaults::rates(),
            query: defaults::query(),
            filter: FilterSpec::default(),
            limit: None,
        }
    }
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Vacancy search endpoint; details live under `{base_url}/{id}`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Area tree endpoint used to resolve city names
    #[serde(default = "defaults::areas_url")]
    pub areas_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            areas_url: defaults::areas_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Detail fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Maximum concurrent detail requests
    #[serde(default = "defaults::workers")]
    pub workers: usize,

    /// Abort a collection that runs longer than this
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

impl CollectorConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            workers: defaults::workers(),
            deadline_secs: None,
        }
    }
}

/// Result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding one file per query fingerprint
    #[serde(default = "defaults::cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: defaults::cache_dir(),
        }
    }
}

mod defaults {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use crate::models::Query;

    pub fn base_url() -> String {
        "https://api.hh.ru/vacancies".into()
    }
    pub fn areas_url() -> String {
        "https://api.hh.ru/areas".into()
    }
    pub fn user_agent() -> String {
        concat!("hh-collector/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn workers() -> usize {
        5
    }
    pub fn cache_dir() -> PathBuf {
        PathBuf::from("cache")
    }

    // Base currency is RUR
    pub fn rates() -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("RUR".to_string(), 1.0),
            ("USD".to_string(), 0.01264),
            ("EUR".to_string(), 0.01083),
        ])
    }

    pub fn query() -> Query {
        Query::new()
            .with("text", "Rust")
            .with("area", 1)
            .with("per_page", 50)
    }
}
