// Repository trait for stored classification counts
use crate::domain::telemetry::ChartPayload;
use async_trait::async_trait;

#[async_trait]
pub trait ChartRepository: Send + Sync {
    /// Count anomalies per class in `group_by` buckets over the last `since`.
    /// Returns `None` when the store has no series at all.
    async fn count_by_class(&self, since: &str, group_by: &str) -> anyhow::Result<Option<ChartPayload>>;
}
