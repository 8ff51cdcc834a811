//! gymgate — security and caching gateway for the studio management API.
//!
//! Every inbound request passes, in order, through the global rate
//! limiter, the request classifier (signature, agent, method, size and
//! media-type checks plus the per-key limit), the security header
//! injector and the response cache before reaching business handlers.

use std::path::PathBuf;

use axum::{routing::get, Json, Router};
use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gymgate::config::loader::load_config;
use gymgate::{GateConfig, GateServer, Shutdown};

#[derive(Parser)]
#[command(name = "gymgate", about = "Security and caching gateway for the studio management API")]
struct Args {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("gymgate v0.1.0 starting");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        per_key_limit = config.rate_limit.per_key_max_requests,
        global_limit = config.rate_limit.global_max_requests,
        cache_ttl_secs = config.cache.ttl_secs,
        max_body_bytes = config.security.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            gymgate::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    // Business handlers live in the application; the binary mounts only a
    // health probe behind the gate.
    let inner = Router::new().route("/health", get(health));

    let server = GateServer::new(config, inner);
    let shutdown = Shutdown::new();
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
