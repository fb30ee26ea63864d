//! Application configuration loading and validation.
//!
//! Configuration is read from a TOML file. Every section is optional and
//! falls back to defaults, and two environment variables override the file:
//! `MCDESK_API_URL` for `api.base_url` and `MCDESK_TOKEN_PATH` for
//! `session.token_path`.
//!
//! # Example
//!
//! ```no_run
//! use mcdesk::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default("mcdesk.toml")?;
//!     config.logging.init(0);
//!     Ok(())
//! }
//! ```

mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::stats::{StatsPolicy, DEFAULT_DEPOSIT_FALLBACK};
use crate::error::{ConfigError, Result};

pub use logging::LoggingConfig;

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "MCDESK_API_URL";
/// Environment variable overriding `session.token_path`.
pub const ENV_TOKEN_PATH: &str = "MCDESK_TOKEN_PATH";

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are joined onto, e.g. `https://api.example.com/api/`.
    pub base_url: String,
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    /// Attempts for idempotent reads on timeout or connection failure.
    pub retry_max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000/api/".into(),
            timeout_ms: 15_000,
            connect_timeout_ms: 5_000,
            retry_max_attempts: 2,
            retry_backoff_ms: 250,
        }
    }
}

/// Where the session tokens live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Token file. Defaults to `<data dir>/mcdesk/session.json`.
    pub token_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Resolved token file path.
    #[must_use]
    pub fn resolved_token_path(&self) -> PathBuf {
        if let Some(path) = &self.token_path {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("mcdesk")
            .join("session.json")
    }
}

/// Dashboard aggregation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Deposit assumed when a transaction has none recorded.
    pub deposit_fallback: Decimal,
    /// Page size of the unfiltered fetch used for global stats.
    pub global_fetch_limit: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            deposit_fallback: DEFAULT_DEPOSIT_FALLBACK,
            global_fetch_limit: 1000,
        }
    }
}

impl StatsConfig {
    #[must_use]
    pub fn policy(&self) -> StatsPolicy {
        StatsPolicy {
            deposit_fallback: self.deposit_fallback,
        }
    }
}

/// Search box behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a search request is sent.
    pub debounce_ms: u64,
    pub page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            page_size: 20,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub stats: StatsConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load and validate a configuration file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse_toml(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        debug!(path = %path.display(), "Config file not found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML without touching the environment or validating.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config = toml::from_str(content).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Apply `MCDESK_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = env_value(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(path) = env_value(ENV_TOKEN_PATH) {
            self.session.token_path = Some(PathBuf::from(path));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "api.base_url",
            }
            .into());
        }
        if let Err(err) = url::Url::parse(&self.api.base_url) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url",
                reason: err.to_string(),
            }
            .into());
        }
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_ms",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.stats.deposit_fallback < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "stats.deposit_fallback",
                reason: "must not be negative".into(),
            }
            .into());
        }
        if self.stats.global_fetch_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "stats.global_fetch_limit",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.search.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.page_size",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        Ok(())
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.stats.deposit_fallback, dec!(5000));
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = Config::parse_toml(
            r#"
[api]
base_url = "https://market.example.com/api/"

[stats]
deposit_fallback = "2500"
"#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://market.example.com/api/");
        assert_eq!(config.api.timeout_ms, 15_000);
        assert_eq!(config.stats.policy().deposit_fallback, dec!(2500));
        assert_eq!(config.stats.global_fetch_limit, 1000);
    }

    #[test]
    fn validate_rejects_bad_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".into();
        match config.validate() {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => {
                assert_eq!(field, "api.base_url");
            }
            other => panic!("expected invalid base_url, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_negative_fallback() {
        let mut config = Config::default();
        config.stats.deposit_fallback = dec!(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_error_is_structured() {
        let result = Config::parse_toml("[api\nbase_url = 1");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn explicit_token_path_wins() {
        let session = SessionConfig {
            token_path: Some(PathBuf::from("/tmp/tokens.json")),
        };
        assert_eq!(
            session.resolved_token_path(),
            PathBuf::from("/tmp/tokens.json")
        );
        assert!(SessionConfig::default()
            .resolved_token_path()
            .ends_with("mcdesk/session.json"));
    }
}
