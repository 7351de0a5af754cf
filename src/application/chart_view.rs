// Chart view trait - the render target the poller feeds
use crate::domain::telemetry::ChartDataPoint;

pub trait ChartView: Send + Sync {
    /// Replace the data provider wholesale
    fn set_data_provider(&self, points: Vec<ChartDataPoint>);

    /// Signal that the data provider changed and the chart should redraw
    fn validate_data(&self);
}
