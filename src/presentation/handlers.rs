// HTTP request handlers
use crate::application::chart_service::ChartQueryError;
use crate::domain::telemetry::ChartPayload;
use crate::presentation::app_state::AppState;
use crate::presentation::chart::ChartSnapshot;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct WindowQuery {
    pub since: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartQuery {
    pub since: Option<String>,
    pub group_by: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WindowResponse {
    pub since: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/rest/:resource/chart", get(chart_data))
        .route("/charts/:container", get(get_chart))
        .route("/charts/:container/window", put(set_window))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Stored counts per class, `null` when the store has no series
pub async fn chart_data(
    Path(resource): Path<String>,
    Query(query): Query<ChartQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<ChartPayload>>, StatusCode> {
    if resource != state.resource {
        return Err(StatusCode::NOT_FOUND);
    }

    match state
        .chart_service
        .chart(query.since.as_deref(), query.group_by.as_deref())
        .await
    {
        Ok(payload) => Ok(Json(payload)),
        Err(ChartQueryError::InvalidDuration(value)) => {
            tracing::warn!("Rejected chart query with duration {:?}", value);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            tracing::error!("Error reading chart data: {:#}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Current chart view model for a container
pub async fn get_chart(
    Path(container): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartSnapshot>, StatusCode> {
    if container != state.chart.container() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(state.chart.snapshot(state.window.current())))
}

/// Change the time window; the poller refreshes immediately on change
pub async fn set_window(
    Path(container): Path<String>,
    Query(query): Query<WindowQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WindowResponse>, StatusCode> {
    if container != state.chart.container() {
        return Err(StatusCode::NOT_FOUND);
    }

    if state.window.set(query.since.unwrap_or_default()) {
        tracing::info!("Time window for {} set to {}", container, state.window.current());
    }

    Ok(Json(WindowResponse {
        since: state.window.current(),
    }))
}
