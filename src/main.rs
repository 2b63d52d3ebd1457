//! BetSwirl tools server.
//!
//! ```text
//! host agent runtime ──HTTP──▶ http (axum) ──▶ tools ──▶ casino ──▶ blockchain (RPC + signer)
//! ```
//!
//! The signer key is read from `BETSWIRL_PRIVATE_KEY`; everything else comes
//! from the TOML configuration file.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use betswirl_tools::config::{load_config, AppConfig};
use betswirl_tools::http::HttpServer;
use betswirl_tools::lifecycle::{self, build_app, connect_wallet};
use betswirl_tools::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "betswirl-tools")]
#[command(about = "Serve BetSwirl casino tools over HTTP", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when absent.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("betswirl-tools v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        casino_chains = config.casino.chains.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let wallet = connect_wallet(&config.blockchain).await?;
    let app = build_app(&config, Arc::new(wallet))?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config.server, app.state);
    server.run(listener, lifecycle::shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
