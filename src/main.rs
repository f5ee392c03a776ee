//! Neople API proxy.
//!
//! Serves the key-injecting proxy handler on a TCP listener.
//!
//! ```text
//!     Browser                ┌──────────────────────────────┐
//!     GET /api/proxy/<path>  │           PROXY              │   GET /df/<path>?apikey=…
//!     ──────────────────────▶│ preflight / 405 / forward    │──────────────────────────▶ Neople API
//!                            │                              │
//!     ◀──────────────────────│ status + JSON + CORS origin  │◀──────────────────────────
//!                            └──────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use neople_proxy::config::{self, ApiKey, ProxyConfig, API_KEY_ENV};
use neople_proxy::http::HttpServer;
use neople_proxy::lifecycle::{self, Shutdown};
use neople_proxy::observability;

#[derive(Parser)]
#[command(name = "neople-proxy")]
#[command(about = "Key-injecting reverse proxy for the Neople API", long_about = None)]
struct Cli {
    /// Optional TOML config file; every setting has a default.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    observability::logging::init_logging(&config.observability.log_level);
    tracing::info!("neople-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let api_key = ApiKey::from_env();
    if api_key.is_empty() {
        tracing::warn!(env = API_KEY_ENV, "API key is not set; upstream calls will be rejected");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        mount_depth = config.listener.mount_depth,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = observability::metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    lifecycle::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, api_key)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
