//! Document Change Forwarder
//!
//! Runs the change event forwarder as a service:
//! - Accepts document change events on `POST /events`
//! - Forwards documents lacking the marker field to the API endpoint
//! - Exposes health/ready endpoints for orchestration
//! - Exports Prometheus metrics for observability

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use doc_change_forwarder::config::ForwarderConfig;
use doc_change_forwarder::delivery::HttpApiClient;
use doc_change_forwarder::forwarder::EventForwarder;
use doc_change_forwarder::http::{self, AppState};
use doc_change_forwarder::metrics::ForwarderMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first to get log level
    let config = ForwarderConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("doc_change_forwarder={}", config.log_level).parse()?)
                .add_directive("hyper=warn".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .json()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        endpoint = %config.endpoint_url,
        credentialed = config.is_credentialed(),
        marker_field = %config.marker_field,
        id_precedence = %config.id_precedence,
        "Starting document change forwarder"
    );

    let metrics = Arc::new(ForwarderMetrics::install()?);
    info!("Prometheus metrics initialized");

    let client = HttpApiClient::new(&config)?;
    let forwarder = Arc::new(EventForwarder::new(&config, client, Arc::clone(&metrics)));

    let router = http::router(AppState {
        forwarder,
        metrics: Arc::clone(&metrics),
    });
    let addr: SocketAddr = ([0, 0, 0, 0], config.http_port).into();

    info!(port = config.http_port, "Starting HTTP server");

    let server = axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        error!(error = %e, "HTTP server error");
        return Err(e.into());
    }

    info!("Forwarder shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
