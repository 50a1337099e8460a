//! decoy-router
//!
//! Sends human visitors and automated clients to different destinations.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ routing ──▶ classifier ──▶ dispatch
//!                     (request id,    (bypass,    (verdict)      (redirect | proxy)
//!                      trace, limits)  static,                        │
//!                                      keyed → store)                 ▼
//!     ◀────────────── response + no-cache + X-Decoy-* headers ◀── destination
//! ```

use clap::Parser;
use std::path::PathBuf;

use decoy_router::config::loader;
use decoy_router::lifecycle::startup;
use decoy_router::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "decoy-router", version, about = "Bot-aware redirect and reverse-proxy gate")]
struct Cli {
    /// TOML configuration file; defaults and environment variables otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = loader::load(cli.config.as_deref())?;
    logging::init(&loaded.config.observability)?;
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    let config = loaded.config;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        mode = config.dispatch.mode.as_str(),
        destinations_configured = config.destinations.is_some(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
