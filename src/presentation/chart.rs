// Chart view model served to the rendering front end
use crate::application::chart_view::ChartView;
use crate::domain::series::SeriesDefinition;
use crate::domain::telemetry::ChartDataPoint;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::RwLock;

/// Snapshot of everything the charting library needs to draw.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    pub container: String,
    pub since: String,
    pub series: Vec<SeriesDefinition>,
    pub data_provider: Vec<ChartDataPoint>,
    pub revision: u64,
    pub last_rendered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct RenderState {
    data_provider: Vec<ChartDataPoint>,
    revision: u64,
    last_rendered_at: Option<DateTime<Utc>>,
}

/// In-memory chart attached to a named container.
#[derive(Debug)]
pub struct ChartModel {
    container: String,
    series: Vec<SeriesDefinition>,
    state: RwLock<RenderState>,
}

impl ChartModel {
    pub fn new(container: impl Into<String>, series: Vec<SeriesDefinition>) -> Self {
        Self {
            container: container.into(),
            series,
            state: RwLock::new(RenderState::default()),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn snapshot(&self, since: String) -> ChartSnapshot {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        ChartSnapshot {
            container: self.container.clone(),
            since,
            series: self.series.clone(),
            data_provider: state.data_provider.clone(),
            revision: state.revision,
            last_rendered_at: state.last_rendered_at,
        }
    }
}

impl ChartView for ChartModel {
    fn set_data_provider(&self, points: Vec<ChartDataPoint>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.data_provider = points;
    }

    fn validate_data(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.revision += 1;
        state.last_rendered_at = Some(Utc::now());
    }
}
