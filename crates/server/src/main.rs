mod bootstrap;
mod health;
mod webhook;

use std::future::Future;
use std::io;
use std::time::Duration;

use anyhow::{anyhow, Result};
use axum::Router;
use quotesearch_core::config::{AppConfig, LoadOptions};
use quotesearch_core::Fulfillment;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &AppConfig) {
    use quotesearch_core::config::LogFormat::*;

    // RUST_LOG, when set, takes precedence over `logging.level`.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.trim().to_ascii_lowercase()));

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).json().init();
        }
    }
}

fn app_router(fulfillment: Fulfillment, webhook_path: &str) -> Router {
    webhook::router(fulfillment.clone(), webhook_path)
        .merge(health::router(fulfillment))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;
    let address = app.config.listen_address();
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    let router = app_router(app.fulfillment, &app.config.server.webhook_path);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        webhook_path = %app.config.server.webhook_path,
        "quotesearch-server started"
    );

    supervise(server, wait_for_shutdown(), shutdown_tx, grace).await
}

/// Runs until `shutdown` resolves or the server task exits on its own,
/// whichever comes first. An early server exit is an error.
async fn supervise<F>(
    mut server: JoinHandle<io::Result<()>>,
    shutdown: F,
    shutdown_tx: oneshot::Sender<()>,
    grace: Duration,
) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::select! {
        signal = shutdown => signal?,
        joined = &mut server => {
            tracing::error!(
                event_name = "system.server.exited",
                correlation_id = "shutdown",
                "server task exited before shutdown was requested"
            );
            joined??;
            return Err(anyhow!("server task exited before shutdown was requested"));
        }
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = grace.as_secs(),
        "quotesearch-server stopping"
    );
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined??,
        Err(_) => tracing::warn!(
            event_name = "system.server.shutdown_timeout",
            correlation_id = "shutdown",
            "in-flight requests did not drain before the grace period elapsed"
        ),
    }

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
