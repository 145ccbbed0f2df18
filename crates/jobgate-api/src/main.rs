//! Axum API server binary.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use jobgate_api::{create_router, logging, metrics, ApiConfig, AppState};
use jobgate_engine::EngineClient;

/// Job scraping gateway API server.
#[derive(Debug, Parser)]
#[command(name = "jobgate-api", version, about)]
struct Cli {
    /// Port to run on (overrides API_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Host to bind to (overrides API_HOST)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ApiConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    logging::init_tracing(&config.log).context("Failed to initialize logging")?;

    info!("Logging configured with level: {:?}", config.log.level);
    info!("File logging: {}", config.log.to_file);
    info!("Debug mode: {}", config.debug_mode);

    if !config.access.is_configured() {
        warn!("API_ACCESS_TOKEN is not configured; /scrape will answer 500 until it is set");
    }

    let metrics_handle = if config.metrics_enabled {
        info!("Prometheus metrics enabled at /metrics");
        Some(metrics::init_metrics().context("Failed to install Prometheus recorder")?)
    } else {
        None
    };

    let engine =
        EngineClient::new(config.engine.clone()).context("Failed to create engine client")?;
    info!("Scraping engine at {}", engine.base_url());

    let bind = (config.host.clone(), config.port);
    let state = AppState::new(config, Arc::new(engine));
    let app = create_router(state, metrics_handle);

    let listener = tokio::net::TcpListener::bind((bind.0.as_str(), bind.1))
        .await
        .with_context(|| format!("Failed to bind {}:{}", bind.0, bind.1))?;
    info!("Starting Job Scraper API server on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install CTRL+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
