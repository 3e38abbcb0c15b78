//! Client configuration.

use crate::{CoreError, CoreResult, Paths};
use board_core::{Limits, SortOrder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default realtime backend endpoint.
pub const DEFAULT_BACKEND_URL: &str = "memory://local";

/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "BOARD_LOG_LEVEL";

/// Board client configuration, stored as JSON in `~/.board/config.json`.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Realtime backend endpoint.
    pub backend_url: String,
    /// Public API key for the backend, if it needs one.
    pub backend_api_key: Option<String>,
    pub max_content_length: usize,
    pub min_password_length: usize,
    /// How long a notice stays in the message area.
    pub notice_duration_ms: u64,
    /// Feed ordering used until the user picks another.
    pub default_sort: SortOrder,
}

impl Default for Config {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            backend_api_key: None,
            max_content_length: limits.max_content_length,
            min_password_length: limits.min_password_length,
            notice_duration_ms: 3000,
            default_sort: SortOrder::Newest,
        }
    }
}

impl Config {
    /// Defaults, then environment overrides.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Loads `paths.config_file()` if it exists, else defaults; then applies
    /// environment overrides and validates.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };
        config.load_from_env();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        self.apply_env(|name| std::env::var(name).ok());
    }

    /// Applies overrides from `lookup`. Only the log level can be overridden.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.log_level = level.trim().to_string();
        }
    }

    /// Rejects values the client cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_content_length == 0 {
            return Err(CoreError::Config(
                "max_content_length must be greater than zero".to_string(),
            ));
        }
        if self.notice_duration_ms == 0 {
            return Err(CoreError::Config(
                "notice_duration_ms must be greater than zero".to_string(),
            ));
        }
        self.backend_url()?;
        Ok(())
    }

    /// The backend endpoint as a parsed URL.
    pub fn backend_url(&self) -> CoreResult<Url> {
        Url::parse(&self.backend_url).map_err(CoreError::from)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_content_length: self.max_content_length,
            min_password_length: self.min_password_length,
        }
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}
