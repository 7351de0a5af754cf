// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::ChartService;
use crate::application::poller::DashboardPoller;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_chart_source::HttpChartSource;
use crate::infrastructure::influx_repository::InfluxRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::chart::ChartModel;
use crate::presentation::handlers::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create chart source (infrastructure layer)
    let source = Arc::new(HttpChartSource::new(
        config.backend.base_url.clone(),
        config.backend.resource.clone(),
        config.backend.request_timeout(),
    )?);

    // Create the chart view and its time window
    let chart = Arc::new(ChartModel::new(
        config.dashboard.container.clone(),
        config.dashboard.series_definitions(),
    ));
    let window = config.dashboard.time_window();

    // One poller per dashboard view (application layer)
    let poller = DashboardPoller::new(
        source,
        chart.clone(),
        window.clone(),
        config.dashboard.poll_interval(),
    );
    let handle = poller.start();

    // Chart endpoint over the classification store
    let repository = Arc::new(InfluxRepository::new(
        config.influx.host.clone(),
        config.influx.token.clone(),
        config.influx.database.clone(),
        config.influx.retention_policy.clone(),
    ));
    let chart_service = ChartService::new(
        repository,
        config.influx.default_since.clone(),
        config.influx.default_group_by.clone(),
    );

    // Build router (presentation layer)
    let state = Arc::new(AppState {
        chart,
        window,
        chart_service,
        resource: config.backend.resource.clone(),
    });
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.server.listen_addr.parse()?;
    tracing::info!(
        "Starting shuttle-dashboard on {} (backend {})",
        addr,
        config.backend.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    handle.stop_and_wait().await;

    Ok(())
}
