use clap::Parser;
use tracing::Level;

use dialogue_gateway::{
    config::{GatewayConfig, TurnstileConfig, UpstreamConfig},
    logging::{init_logging, LoggingConfig},
    server,
};

#[derive(Parser, Debug)]
#[command(name = "dialogue-gateway", about = "Streaming dialogue generation gateway")]
struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Base URL of the upstream chat-completion provider.
    #[arg(long, env = "UPSTREAM_BASE_URL", default_value = "https://api.grsai.com")]
    upstream_url: String,

    /// Bearer token for the upstream provider.
    #[arg(long, env = "UPSTREAM_API_KEY")]
    api_key: Option<String>,

    /// Turnstile shared secret; verification is bypassed when absent.
    #[arg(long, env = "TURNSTILE_SECRET_KEY")]
    turnstile_secret: Option<String>,

    /// Turnstile challenge verification endpoint.
    #[arg(long, env = "TURNSTILE_VERIFY_URL", default_value = turnstile::DEFAULT_VERIFY_URL)]
    turnstile_verify_url: String,

    /// Seconds a passed verification exempts the same caller.
    #[arg(long, default_value_t = 1800)]
    turnstile_cache_ttl_secs: u64,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long)]
    log_json: bool,

    /// Directory for rolling log files; console-only when unset.
    #[arg(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let _log_guard = init_logging(LoggingConfig {
        level,
        json_format: cli.log_json,
        log_dir: cli.log_dir.clone(),
        colorize: true,
    });

    let config = GatewayConfig {
        host: cli.host,
        port: cli.port,
        upstream: UpstreamConfig {
            base_url: cli.upstream_url,
            api_key: cli.api_key,
        },
        turnstile: TurnstileConfig {
            secret: cli.turnstile_secret,
            verify_url: cli.turnstile_verify_url,
            cache_ttl_secs: cli.turnstile_cache_ttl_secs,
        },
    };

    server::serve(config).await
}
