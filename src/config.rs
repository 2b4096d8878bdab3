//! Application-level configuration loading: upstream API location, timeouts and listen port.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "COURTSIDE_BACK_CONFIG_PATH";
const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_PORT: u16 = 8080;
/// Page size requested from the teams service; the wizard never pages further.
const DEFAULT_TEAMS_FETCH_LIMIT: u32 = 100;
/// Wizards left untouched for this long are closed.
const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    api_base_url: String,
    api_timeout: Duration,
    service_token: Option<String>,
    port: u16,
    teams_fetch_limit: u32,
    session_idle_ttl: Duration,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults, then apply
    /// environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        api_base_url = %app_config.api_base_url,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_env_overrides(|key| env::var(key).ok())
    }

    /// Base URL of the platform REST API (teams, tournaments, bookings).
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Timeout applied to every upstream request.
    pub fn api_timeout(&self) -> Duration {
        self.api_timeout
    }

    /// Token sent upstream when the caller has none.
    pub fn service_token(&self) -> Option<&str> {
        self.service_token.as_deref()
    }

    /// TCP port the HTTP server listens on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Maximum number of teams requested for a wizard.
    pub fn teams_fetch_limit(&self) -> u32 {
        self.teams_fetch_limit
    }

    /// How long a wizard may stay untouched before it is closed.
    pub fn session_idle_ttl(&self) -> Duration {
        self.session_idle_ttl
    }

    /// Replace the idle delay after which wizards are closed.
    pub fn with_session_idle_ttl(mut self, ttl: Duration) -> Self {
        self.session_idle_ttl = ttl;
        self
    }

    /// Override values from `API_BASE_URL`, `API_TIMEOUT_SECS`, `SESSION_IDLE_TTL_SECS`,
    /// `API_SERVICE_TOKEN` and `PORT` (or `SERVER_PORT`). Unparsable values are ignored.
    fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("API_BASE_URL").filter(|value| !value.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(secs) = lookup("API_TIMEOUT_SECS").and_then(|value| value.parse().ok()) {
            self.api_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = lookup("SESSION_IDLE_TTL_SECS")
            .and_then(|value| value.parse().ok())
            .filter(|secs| *secs > 0)
        {
            self.session_idle_ttl = Duration::from_secs(secs);
        }
        if let Some(token) = lookup("API_SERVICE_TOKEN").filter(|value| !value.is_empty()) {
            self.service_token = Some(token);
        }
        if let Some(port) = lookup("PORT")
            .or_else(|| lookup("SERVER_PORT"))
            .and_then(|value| value.parse().ok())
        {
            self.port = port;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout: DEFAULT_API_TIMEOUT,
            service_token: None,
            port: DEFAULT_PORT,
            teams_fetch_limit: DEFAULT_TEAMS_FETCH_LIMIT,
            session_idle_ttl: DEFAULT_SESSION_IDLE_TTL,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    api_base_url: Option<String>,
    api_timeout_secs: Option<u64>,
    service_token: Option<String>,
    port: Option<u16>,
    teams_fetch_limit: Option<u32>,
    session_idle_ttl_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: value.api_base_url.unwrap_or(defaults.api_base_url),
            api_timeout: value
                .api_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.api_timeout),
            service_token: value.service_token.or(defaults.service_token),
            port: value.port.unwrap_or(defaults.port),
            teams_fetch_limit: value
                .teams_fetch_limit
                .unwrap_or(defaults.teams_fetch_limit),
            session_idle_ttl: value
                .session_idle_ttl_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_idle_ttl),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
