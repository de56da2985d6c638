//! Runtime settings.
//!
//! Sources, later overriding earlier:
//! 1. built-in defaults
//! 2. the settings file named by `--settings` or `NASHVILLE_SETTINGS`
//!    (format picked from the extension: yaml, toml, json)
//! 3. `NASHVILLE__*` environment variables (`__` separates nested keys)
//! 4. `DATABASE_URL`, `TICKETMASTER_API_KEY`, `SEATGEEK_CLIENT_ID`, used only
//!    when the field is still unset

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PORT, PG_POOL_ACQUIRE_TIMEOUT_SECS,
    PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};

/// Environment variable naming the settings file.
pub const SETTINGS_ENV_VAR: &str = "NASHVILLE_SETTINGS";
/// Prefix for settings environment variables.
pub const SETTINGS_ENV_PREFIX: &str = "NASHVILLE";

pub const DEFAULT_TICKETMASTER_BASE_URL: &str = "https://app.ticketmaster.com";
pub const DEFAULT_SEATGEEK_BASE_URL: &str = "https://api.seatgeek.com";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("database_url is not configured (set DATABASE_URL or NASHVILLE__DATABASE_URL)")]
    MissingDatabaseUrl,
}

/// Connection pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: PG_POOL_MAX_CONNECTIONS,
            acquire_timeout_secs: PG_POOL_ACQUIRE_TIMEOUT_SECS,
            idle_timeout_secs: PG_POOL_IDLE_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Period of the background collect + normalize loop. Disabled when unset.
    pub etl_interval_secs: Option<u64>,
    pub ticketmaster_api_key: Option<String>,
    pub ticketmaster_base_url: String,
    pub seatgeek_client_id: Option<String>,
    pub seatgeek_base_url: String,
    /// Per-request timeout for collector API calls.
    pub http_timeout_secs: u64,
    pub pool: PoolSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "0.0.0.0".to_owned(),
            port: DEFAULT_PORT,
            etl_interval_secs: None,
            ticketmaster_api_key: None,
            ticketmaster_base_url: DEFAULT_TICKETMASTER_BASE_URL.to_owned(),
            seatgeek_client_id: None,
            seatgeek_base_url: DEFAULT_SEATGEEK_BASE_URL.to_owned(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            pool: PoolSettings::default(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("etl_interval_secs", &self.etl_interval_secs)
            .field("ticketmaster_api_key", &self.ticketmaster_api_key.as_ref().map(|_| "***"))
            .field("ticketmaster_base_url", &self.ticketmaster_base_url)
            .field("seatgeek_client_id", &self.seatgeek_client_id.as_ref().map(|_| "***"))
            .field("seatgeek_base_url", &self.seatgeek_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("pool", &self.pool)
            .finish()
    }
}

impl Settings {
    /// Load settings from the optional file at `path`, falling back to the
    /// file named by [`SETTINGS_ENV_VAR`], then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        use config::{Config, Environment, File};

        let location = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(SETTINGS_ENV_VAR).map(Into::into));

        let mut builder = Config::builder();
        if let Some(location) = &location {
            tracing::debug!(path = %location.display(), "loading settings file");
            builder = builder.add_source(File::from(location.as_path()).required(true));
        }
        let mut settings: Self = builder
            .add_source(
                Environment::with_prefix(SETTINGS_ENV_PREFIX).separator("__").try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.apply_legacy_env();
        Ok(settings)
    }

    fn apply_legacy_env(&mut self) {
        let legacy = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        if self.database_url.is_none() {
            self.database_url = legacy("DATABASE_URL");
        }
        if self.ticketmaster_api_key.is_none() {
            self.ticketmaster_api_key = legacy("TICKETMASTER_API_KEY");
        }
        if self.seatgeek_client_id.is_none() {
            self.seatgeek_client_id = legacy("SEATGEEK_CLIENT_ID");
        }
    }

    /// Database URL, required by every command that touches Postgres.
    pub fn require_database_url(&self) -> Result<&str, SettingsError> {
        self.database_url.as_deref().ok_or(SettingsError::MissingDatabaseUrl)
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
