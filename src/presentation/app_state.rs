// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::domain::time_window::TimeWindow;
use crate::presentation::chart::ChartModel;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub chart: Arc<ChartModel>,
    pub window: TimeWindow,
    pub chart_service: ChartService,
    /// Resource name served under `/rest/{resource}/chart`
    pub resource: String,
}
