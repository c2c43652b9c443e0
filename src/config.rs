//! TOML configuration for the collaborators around the scoring core.
//!
//! The core never reads configuration; only the fetcher, the FAQ service
//! client and logging do.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "aeo-audit.toml";
pub const FAQ_API_URL_ENV: &str = "FAQ_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub faq: FaqConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("reading {}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| AppError::config(format!("parsing {}: {}", path.display(), e)))
    }

    /// Explicit path, else `./aeo-audit.toml` when present, else defaults.
    pub fn resolve(user: Option<&Path>) -> Result<Self> {
        if let Some(path) = user {
            return Self::load(path);
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default.exists() {
            Self::load(&default)
        } else {
            Ok(Self::default())
        }
    }

    /// Let `FAQ_API_URL` override the configured endpoint.
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(FAQ_API_URL_ENV) {
            self.faq.set_api_url(Some(url));
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Empty means no proxy. See `service::fetcher::proxied_url`.
    pub proxy_template: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            proxy_template: String::new(),
            timeout_secs: 30,
            max_retries: 2,
            retry_backoff_ms: 500,
            user_agent: concat!("aeo-audit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqConfig {
    /// FAQ generation endpoint; absent disables the feature.
    pub api_url: Option<String>,
    pub timeout_secs: u64,
}

impl FaqConfig {
    pub fn set_api_url(&mut self, url: Option<String>) {
        self.api_url = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.api_url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}
