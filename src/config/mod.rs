use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AppError, AppResult};

pub mod defaults;
pub mod duration_serde;

use defaults::*;
use duration_serde::duration;

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connection establishment timeout
    #[serde(default = "default_connect_timeout", with = "duration")]
    pub connect_timeout: Duration,
    /// Total request timeout
    #[serde(default = "default_request_timeout", with = "duration")]
    pub request_timeout: Duration,
    /// User agent sent when the caller does not supply one
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Rename `custom-*` headers back to their real names before sending
    #[serde(default = "default_restore_disguised_headers")]
    pub restore_disguised_headers: bool,
}

/// Fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Character encoding used by raw fetches when none is given
    #[serde(default = "default_encoding")]
    pub default_encoding: String,
}

/// Read-only values exposed to operations through `AppContext`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Headers applied beneath caller headers on every fetch
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,
    /// Named values of the "setting" store
    #[serde(default)]
    pub settings: BTreeMap<String, serde_json::Value>,
    /// Named values of the "play" store
    #[serde(default)]
    pub playback: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub context: ContextConfig,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

fn default_restore_disguised_headers() -> bool {
    DEFAULT_RESTORE_DISGUISED_HEADERS
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            restore_disguised_headers: default_restore_disguised_headers(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_encoding: default_encoding(),
        }
    }
}

impl Config {
    /// Load from the file named by `MEDIA_PROBE_CONFIG`, or `media-probe.toml`
    pub fn load() -> AppResult<Self> {
        let config_file =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from_file(&config_file)
    }

    /// Layer defaults, the TOML file (if present) and `MEDIA_PROBE_*` env vars.
    ///
    /// Nested keys use a double underscore, e.g. `MEDIA_PROBE_HTTP__USER_AGENT`.
    pub fn load_from_file(config_file: impl AsRef<Path>) -> AppResult<Self> {
        let path = config_file.as_ref();
        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
        }

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document on top of the defaults, ignoring the environment
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(contents))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if encoding_rs::Encoding::for_label(self.fetch.default_encoding.as_bytes()).is_none() {
            return Err(AppError::configuration(format!(
                "fetch.default_encoding: unknown encoding '{}'",
                self.fetch.default_encoding
            )));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::configuration("http.user_agent must not be empty"));
        }
        if self.http.connect_timeout.is_zero() || self.http.request_timeout.is_zero() {
            return Err(AppError::configuration("http timeouts must be greater than zero"));
        }
        Ok(())
    }
}
