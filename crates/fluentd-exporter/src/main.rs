//! fluentd-exporter — Prometheus exporter for the Fluentd monitor agent.
//!
//! Polls `{endpoint}/api/plugins.json` once per scrape of the telemetry
//! path and republishes per-plugin buffer and retry stats as labeled
//! gauges, alongside scrape outcome metrics.
//!
//! # Usage
//!
//! ```text
//! fluentd-exporter --endpoint http://localhost:24220 --listen-address 0.0.0.0:9224
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use fluentd_metrics::{Exporter, ScrapeConfig};

mod server;

#[derive(Parser)]
#[command(name = "fluentd-exporter", about = "Fluentd monitor agent exporter", version)]
struct Cli {
    /// Address to listen on for web interface and telemetry.
    #[arg(long, default_value = "0.0.0.0:9224")]
    listen_address: SocketAddr,

    /// Path under which to expose metrics.
    #[arg(long, default_value = "/metrics")]
    telemetry_path: String,

    /// Fluentd monitor agent endpoint.
    #[arg(long, default_value = "http://localhost:24220")]
    endpoint: String,

    /// Timeout in seconds for trying to get stats from Fluentd.
    #[arg(long, default_value = "5")]
    timeout: u64,

    /// Namespace for metrics.
    #[arg(long, default_value = "fluentd")]
    namespace: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    if !cli.telemetry_path.starts_with('/') || cli.telemetry_path == "/" {
        anyhow::bail!(
            "telemetry path must start with '/' and not be the root: {}",
            cli.telemetry_path
        );
    }

    let config = ScrapeConfig {
        endpoint: cli.endpoint,
        namespace: cli.namespace,
        timeout: Duration::from_secs(cli.timeout),
    };
    let exporter = Arc::new(Exporter::new(&config)?);
    info!(endpoint = %config.endpoint, timeout_secs = cli.timeout, "exporter initialized");

    let router = server::build_router(exporter, &cli.telemetry_path);
    let listener = tokio::net::TcpListener::bind(cli.listen_address).await?;
    info!(addr = %cli.listen_address, path = %cli.telemetry_path, "providing metrics");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
