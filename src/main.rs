//! booksvc - OTLP-traced single-endpoint HTTP service
//!
//! Bootstraps the OpenTelemetry exporter, then serves `GET /books` with a
//! span per request. Misconfiguration is fatal before the server ever
//! starts; shutdown flushes buffered spans without blocking exit.

use anyhow::Context;
use booksvc::config::Config;
use booksvc::server::Server;
use booksvc::tracing::{init_subscriber, shutdown_tracing};
use clap::Parser;

/// booksvc - single-endpoint HTTP service with OTLP trace export
#[derive(Parser, Debug)]
#[command(name = "booksvc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listen address (host:port), overrides the configured default
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(address) = args.address {
        config.server.address = address;
    }

    // Fail fast: tracing without an exporter is a misconfiguration, not a
    // runtime condition to route around.
    let guard = init_subscriber(&config.tracing).context("Failed to initialize tracing")?;

    tracing::info!(
        service = %config.tracing.service_name,
        endpoint = %config.tracing.otlp.endpoint,
        insecure = config.tracing.otlp.insecure,
        "Tracing initialized"
    );
    tracing::info!("Starting booksvc v{}", booksvc::VERSION);

    let run_result = match Server::new(&config).await {
        Ok(server) => server.run().await,
        Err(e) => Err(e),
    };

    // Flush buffered spans on the way out. Shutdown errors are reported but
    // never block the exit sequence.
    if let Err(e) = shutdown_tracing(guard) {
        tracing::warn!("Tracing shutdown failed: {}", e);
    }

    run_result.context("Server terminated")?;
    Ok(())
}
