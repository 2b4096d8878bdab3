use std::time::Duration;

use crate::config::AppConfig;

/// Runtime configuration describing how to reach the platform REST API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Root URL of the platform API.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Token used when the caller did not provide one.
    pub service_token: Option<String>,
}

impl GatewayConfig {
    /// Construct a configuration from an explicit base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            service_token: None,
        }
    }

    /// Attach a fallback service token.
    pub fn with_service_token(mut self, token: impl Into<String>) -> Self {
        self.service_token = Some(token.into());
        self
    }
}

impl From<&AppConfig> for GatewayConfig {
    fn from(config: &AppConfig) -> Self {
        let gateway = Self::new(config.api_base_url(), config.api_timeout());
        match config.service_token() {
            Some(token) => gateway.with_service_token(token),
            None => gateway,
        }
    }
}
