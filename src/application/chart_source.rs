// Chart source trait - the poller's HTTP-fetch capability
use crate::domain::telemetry::ChartPayload;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("chart request failed: {0}")]
    Transport(String),

    #[error("chart request returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode chart response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ChartSource: Send + Sync {
    /// Fetch the timestamp -> sample mapping for the given time window
    async fn fetch_chart(&self, since: &str) -> Result<ChartPayload, FetchError>;
}
