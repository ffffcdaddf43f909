//! Artifact proxy entry point.
//!
//! Boot order: logging → configuration → metrics → listener → server. The
//! server runs until Ctrl+C triggers the shutdown coordinator.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use artifact_proxy::config::load_config;
use artifact_proxy::observability::{self, metrics};
use artifact_proxy::{HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_tracing();

    tracing::info!("{} starting", artifact_proxy::SERVER_IDENT);

    let config_path: PathBuf = std::env::args_os()
        .nth(1)
        .map(Into::into)
        .unwrap_or_else(|| PathBuf::from("artifact-proxy.toml"));
    let config = load_config(&config_path)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        lookup_api = %config.lookup.api_url,
        storage_bucket = %config.storage.bucket,
        cache_ttl_secs = config.host_cache.ttl_secs,
        cache_capacity = config.host_cache.capacity,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                shutdown.trigger();
            }
        });
    }

    let server = HttpServer::new(config)?;
    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
