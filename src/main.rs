//! Travel information gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                TRAVEL GATEWAY                │
//!   Client request   │  ┌──────────┐   ┌────────────┐               │
//!   ─────────────────┼─▶│   http   │──▶│  handlers  │               │
//!                    │  │  server  │   └─────┬──────┘               │
//!                    │  └──────────┘         │                      │
//!                    │        ┌──────────────┼──────────────┐       │
//!                    │        ▼              ▼              ▼       │
//!                    │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!                    │  │ flights  │   │ vehicles │   │   chat   │  │
//!                    │  │+aggregate│   │          │   │          │  │
//!                    │  └────┬─────┘   └────┬─────┘   └────┬─────┘  │
//!                    └───────┼──────────────┼──────────────┼────────┘
//!                            ▼              ▼              ▼
//!                      FlightAware       Auto.dev     Chat completions
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use travel_gateway::config::{load_config, parse_config};
use travel_gateway::lifecycle::{wait_for_signal, Shutdown};
use travel_gateway::observability::{logging, metrics};
use travel_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "travel-gateway", version, about = "Flight, vehicle and chat gateway")]
struct Args {
    /// Path to a TOML config file. Built-in defaults apply when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => parse_config("").context("building default config")?,
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "travel-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        flightaware_configured = !config.flightaware.api_key.is_empty(),
        autodev_configured = !config.autodev.api_key.is_empty(),
        chat_configured = !config.chat.api_key.is_empty(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .context("parsing metrics address")?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .with_context(|| format!("binding {}", config.listener.bind_address))?;

    let server = HttpServer::new(config).context("building upstream clients")?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
