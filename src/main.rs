//! order-service server entry point.
//!
//! Connects to MySQL, applies migrations, and starts the Axum HTTP server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use order_service::api;
use order_service::app_state::AppState;
use order_service::config::{LogFormat, OrderServiceConfig};
use order_service::persistence::MySqlOrderRepository;
use order_service::service::OrderService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = OrderServiceConfig::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting order-service");

    // Build persistence layer
    let repository = MySqlOrderRepository::connect(&config.data_source_url, &config.mysql_settings())
        .await
        .context("connecting to mysql")?;
    if config.run_migrations {
        repository.migrate().await.context("running migrations")?;
    }

    // Build service layer
    let order_service = Arc::new(OrderService::new(Arc::new(repository.clone())));

    // Build router
    let app = api::build_app(
        AppState { order_service },
        Duration::from_secs(config.request_timeout_secs),
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repository.close().await;
    tracing::info!("order-service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
