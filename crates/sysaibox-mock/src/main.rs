//! Sys AI Box Mock Server - Entry Point

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sysaibox_mock::{MockServer, RedemptionPolicy, config::Config};

#[derive(Parser, Debug)]
#[command(name = "sysaibox-mock")]
#[command(about = "Mock Sys AI Box server for SwiftSweep device pairing")]
#[command(version)]
struct Cli {
    /// Bind host
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// HTTP server port
    #[arg(long, default_value = "8080", env = "PORT")]
    port: u16,

    /// Externally reachable base URL, used for `verification_uri`
    #[arg(long, env = "PUBLIC_URL")]
    public_url: Option<String>,

    /// Prefix for user codes
    #[arg(long, env = "USER_CODE_PREFIX")]
    user_code_prefix: Option<String>,

    /// What happens to a pairing after its tokens are issued
    #[arg(long, value_enum, env = "REDEMPTION")]
    redemption: Option<RedemptionPolicy>,

    /// Purge expired/consumed pairings every N seconds (0 disables)
    #[arg(long, default_value = "0", env = "CLEANUP_INTERVAL_SECS")]
    cleanup_interval_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Sys AI Box mock server");

    let mut config = Config::from_env()?;
    config.host = cli.host;
    config.port = cli.port;
    if let Some(url) = cli.public_url {
        config.public_url = url.trim_end_matches('/').to_string();
    }
    if let Some(prefix) = cli.user_code_prefix {
        config.user_code_prefix = prefix.trim().to_ascii_uppercase();
    }
    if let Some(redemption) = cli.redemption {
        config.redemption = redemption;
    }
    if cli.cleanup_interval_secs > 0 {
        config.cleanup_interval = Some(Duration::from_secs(cli.cleanup_interval_secs));
    }

    tracing::info!(
        port = config.port,
        public_url = %config.public_url,
        redemption = ?config.redemption,
        "Running in HTTP mode"
    );

    MockServer::new(config).run_http().await
}
