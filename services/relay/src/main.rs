use anyhow::{Context, Result};
use clap::Parser;
use realtime_relay::config::{Config, RelayMode};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser)]
#[command(version, about = "Relays WebRTC SDP offers to the OpenAI Realtime API")]
struct Cli {
    /// Address to listen on, overrides BIND_ADDRESS
    #[arg(long)]
    bind: Option<SocketAddr>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let args = Cli::parse();
    let mut config = Config::from_env().context("Failed to load relay configuration")?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    info!(
        "Configuration loaded. model={}, voice={}, mode={:?}",
        config.model, config.voice, config.mode
    );
    if config.mode == RelayMode::Direct {
        warn!("Direct mode sends the long-lived API key with every SDP exchange");
    }

    // --- 3. Build the application ---
    let app = realtime_relay::build_app(&config).context("Failed to build upstream client")?;

    // --- 4. Serve ---
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Starting relay server, listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
