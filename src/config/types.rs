//! Configuration for the dialogue gateway.
//!
//! Absent upstream credentials are a request-time error (the endpoint
//! answers 500 until the key is supplied), not a startup failure, so the
//! key stays optional here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidValue(String),
}

/// Upstream chat-completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the provider; `/v1/chat/completions` is appended.
    pub base_url: String,
    /// Bearer token for the provider. Optional so the gateway can boot
    /// without credentials in development.
    pub api_key: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.grsai.com".to_string(),
            api_key: None,
        }
    }
}

/// Human-verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnstileConfig {
    /// Shared secret for the challenge endpoint. An absent secret
    /// bypasses verification; the bypass is logged on every request.
    pub secret: Option<String>,
    /// Challenge verification endpoint.
    pub verify_url: String,
    /// How long a passed verification exempts a caller identity.
    pub cache_ttl_secs: u64,
}

impl Default for TurnstileConfig {
    fn default() -> Self {
        Self {
            secret: None,
            verify_url: turnstile::DEFAULT_VERIFY_URL.to_string(),
            cache_ttl_secs: turnstile::DEFAULT_CACHE_TTL.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub upstream: UpstreamConfig,
    pub turnstile: TurnstileConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            upstream: UpstreamConfig::default(),
            turnstile: TurnstileConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidValue("host must not be empty".into()));
        }
        if !self.upstream.base_url.starts_with("http://")
            && !self.upstream.base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue(format!(
                "upstream base_url must be an http(s) URL, got '{}'",
                self.upstream.base_url
            )));
        }
        if self.turnstile.cache_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "turnstile cache_ttl_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
