//! Gateway configuration types.

mod types;

pub use types::{ConfigError, GatewayConfig, TurnstileConfig, UpstreamConfig};
