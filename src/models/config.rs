//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Fetcher;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Package index endpoints
    #[serde(default)]
    pub index: IndexConfig,

    /// Fan-out/fan-in settings
    #[serde(default)]
    pub aggregator: AggregatorConfig,

    /// Recipe acceptance rules
    #[serde(default)]
    pub recipe: RecipeConfig,

    /// Persisted catalog location
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Read and parse failures are reported as [`AppError::Config`] naming
    /// the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| AppError::config(format!("invalid {}: {e}", path.display())))
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
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.aggregator.timeout_secs == 0 {
            return Err(AppError::validation("aggregator.timeout_secs must be > 0"));
        }
        if !(1..=100).contains(&self.index.page_size) {
            return Err(AppError::validation("index.page_size must be within 1..=100"));
        }
        if self.index.repository.split('/').filter(|s| !s.is_empty()).count() != 2 {
            return Err(AppError::validation(
                "index.repository must look like \"owner/name\"",
            ));
        }
        Url::parse(&self.index.api_base)
            .map_err(|e| AppError::validation(format!("index.api_base: {e}")))?;
        Url::parse(&self.index.web_base)
            .map_err(|e| AppError::validation(format!("index.web_base: {e}")))?;
        if self.recipe.fetchers.is_empty() {
            return Err(AppError::validation("recipe.fetchers is empty"));
        }
        if self.cache.file.as_os_str().is_empty() {
            return Err(AppError::validation("cache.file is empty"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::request_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::request_timeout(),
        }
    }
}

/// Where submissions are listed and diffs are fetched from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Base URL of the review API
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Base URL of the web-facing review site
    #[serde(default = "defaults::web_base")]
    pub web_base: String,

    /// Repository holding the package index, as `owner/name`
    #[serde(default = "defaults::repository")]
    pub repository: String,

    /// Number of submissions requested from the listing endpoint
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Raw-content mirror host for diffs. Empty fetches `diff_url` as-is.
    #[serde(default = "defaults::diff_host")]
    pub diff_host: String,

    /// Path prefix added when rewriting to the mirror host
    #[serde(default = "defaults::diff_path_prefix")]
    pub diff_path_prefix: String,

    /// Label shown as the provenance of every entry
    #[serde(default = "defaults::source_label")]
    pub source_label: String,
}

impl IndexConfig {
    /// Listing endpoint for open submissions.
    pub fn pulls_url(&self) -> String {
        format!(
            "{}/repos/{}/pulls?per_page={}",
            self.api_base.trim_end_matches('/'),
            self.repository,
            self.page_size
        )
    }

    /// Web page of the review queue.
    pub fn review_queue_url(&self) -> String {
        format!(
            "{}/{}/pulls",
            self.web_base.trim_end_matches('/'),
            self.repository
        )
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            web_base: defaults::web_base(),
            repository: defaults::repository(),
            page_size: defaults::page_size(),
            diff_host: defaults::diff_host(),
            diff_path_prefix: defaults::diff_path_prefix(),
            source_label: defaults::source_label(),
        }
    }
}

/// Fan-out/fan-in settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// How long to wait for all diff tasks before returning partial results
    #[serde(default = "defaults::aggregator_timeout")]
    pub timeout_secs: u64,
}

impl AggregatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::aggregator_timeout(),
        }
    }
}

/// Recipe acceptance rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeConfig {
    /// Fetchers a recipe may declare
    #[serde(default = "defaults::fetchers")]
    pub fetchers: Vec<Fetcher>,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            fetchers: defaults::fetchers(),
        }
    }
}

/// Persisted catalog location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache file, relative to the storage directory
    #[serde(default = "defaults::cache_file")]
    pub file: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            file: defaults::cache_file(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use crate::models::Fetcher;

    // HTTP defaults
    pub fn user_agent() -> String {
        concat!("pending-catalog/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn request_timeout() -> u64 {
        30
    }

    // Index defaults
    pub fn api_base() -> String {
        "https://api.github.com".into()
    }
    pub fn web_base() -> String {
        "https://github.com".into()
    }
    pub fn repository() -> String {
        "melpa/melpa".into()
    }
    pub fn page_size() -> u32 {
        100
    }
    pub fn diff_host() -> String {
        "patch-diff.githubusercontent.com".into()
    }
    pub fn diff_path_prefix() -> String {
        "/raw".into()
    }
    pub fn source_label() -> String {
        "PR".into()
    }

    // Aggregator defaults
    pub fn aggregator_timeout() -> u64 {
        60
    }

    // Recipe defaults
    pub fn fetchers() -> Vec<Fetcher> {
        Fetcher::ALL.to_vec()
    }

    // Cache defaults
    pub fn cache_file() -> PathBuf {
        PathBuf::from("catalog.json")
    }
}
