// Telemetry data domain models
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One sample as the backend sends it: field key -> value.
pub type RawSample = Map<String, Value>;

/// Backend chart response: timestamp -> sample.
pub type ChartPayload = HashMap<String, RawSample>;

/// A raw sample tagged with the key it arrived under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataPoint {
    pub timestamp: String,
    #[serde(flatten)]
    pub values: RawSample,
}

impl ChartDataPoint {
    pub fn new(timestamp: String, mut values: RawSample) -> Self {
        // the mapping key wins over any timestamp field in the record
        values.remove("timestamp");
        Self { timestamp, values }
    }
}

/// Turn a chart response into the chart's data provider, oldest first.
///
/// Timestamps compare as plain strings, so ISO-8601 and equal-width epoch
/// keys come out in chronological order.
pub fn into_data_provider(payload: ChartPayload) -> Vec<ChartDataPoint> {
    let mut points: Vec<ChartDataPoint> = payload
        .into_iter()
        .map(|(timestamp, values)| ChartDataPoint::new(timestamp, values))
        .collect();
    points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    points
}
