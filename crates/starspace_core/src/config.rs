//! Client runtime configuration.
//!
//! # Responsibility
//! - Resolve the backend base URL, local database path and HTTP timeout.
//! - Normalize and validate values before any network or storage use.
//!
//! # Invariants
//! - `api_base_url` is an absolute http(s) URL with no query or fragment.
//! - Endpoints are built by appending path segments, never by string joins.
//! - `request_timeout` is never zero.

use once_cell::sync::Lazy;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const ENV_API_URL: &str = "STARSPACE_API_URL";
pub const ENV_DB_PATH: &str = "STARSPACE_DB_PATH";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "STARSPACE_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_DB_FILE_NAME: &str = "starspace.sqlite3";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

static DEFAULT_API_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse(DEFAULT_API_URL).expect("valid default api url"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid api base url `{value}`: {reason}")]
    InvalidApiUrl { value: String, reason: String },
    #[error("invalid http timeout `{0}`; expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub db_path: PathBuf,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.clone(),
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Builds a config pointing at `api_base_url` with default storage and timeout.
    pub fn with_api_url(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_api_url(api_base_url)?,
            ..Self::default()
        })
    }

    /// Resolves configuration from process environment variables.
    ///
    /// Unset or blank variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(url) = read(ENV_API_URL) {
            config.api_base_url = normalize_api_url(&url)?;
        }
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(raw) = read(ENV_HTTP_TIMEOUT_SECS) {
            config.request_timeout = parse_timeout(&raw)?;
        }
        Ok(config)
    }

    /// Appends `segments` to the base URL path. Each segment is
    /// percent-encoded on its own, so ids may contain `/` or spaces.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ConfigError> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigError::InvalidApiUrl {
                value: self.api_base_url.to_string(),
                reason: "base url cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn normalize_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidApiUrl {
        value: raw.to_string(),
        reason,
    };
    let parsed = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", parsed.scheme())));
    }
    if parsed.cannot_be_a_base() {
        return Err(invalid("base url cannot carry a path".to_string()));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(parsed)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidTimeout(raw.to_string())),
        Ok(secs) => Ok(Duration::from_secs(secs)),
    }
}
