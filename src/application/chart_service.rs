// Chart service - Use case behind the chart endpoint
use crate::application::chart_repository::ChartRepository;
use crate::domain::telemetry::ChartPayload;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartQueryError {
    #[error("invalid duration {0:?}")]
    InvalidDuration(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct ChartService {
    repository: Arc<dyn ChartRepository>,
    default_since: String,
    default_group_by: String,
}

impl ChartService {
    pub fn new(
        repository: Arc<dyn ChartRepository>,
        default_since: String,
        default_group_by: String,
    ) -> Self {
        Self {
            repository,
            default_since,
            default_group_by,
        }
    }

    /// Chart data for the window, falling back to the configured defaults
    /// for missing or empty parameters.
    pub async fn chart(
        &self,
        since: Option<&str>,
        group_by: Option<&str>,
    ) -> Result<Option<ChartPayload>, ChartQueryError> {
        let since = non_empty(since).unwrap_or(&self.default_since);
        let group_by = non_empty(group_by).unwrap_or(&self.default_group_by);

        for value in [since, group_by] {
            if !is_duration_literal(value) {
                return Err(ChartQueryError::InvalidDuration(value.to_string()));
            }
        }

        Ok(self.repository.count_by_class(since, group_by).await?)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// InfluxQL duration literal such as `90m`, `1d` or `1h30m`.
/// Anything else would be spliced into the query text.
pub fn is_duration_literal(value: &str) -> bool {
    const UNITS: [&str; 9] = ["ns", "us", "µs", "ms", "s", "m", "h", "d", "w"];

    let mut rest = value;
    if rest.is_empty() {
        return false;
    }
    while !rest.is_empty() {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return false;
        }
        rest = &rest[digits..];
        let Some(unit) = UNITS.iter().find(|u| rest.starts_with(**u)) else {
            return false;
        };
        rest = &rest[unit.len()..];
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRepository {
        queries: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ChartRepository for RecordingRepository {
        async fn count_by_class(
            &self,
            since: &str,
            group_by: &str,
        ) -> anyhow::Result<Option<ChartPayload>> {
            self.queries
                .lock()
                .unwrap()
                .push((since.to_string(), group_by.to_string()));
            if since == "5d" {
                anyhow::bail!("InfluxDB query failed with status 500");
            }
            Ok(None)
        }
    }

    fn service(repository: &Arc<RecordingRepository>) -> ChartService {
        ChartService::new(repository.clone(), "1d".to_string(), "1h".to_string())
    }

    #[tokio::test]
    async fn test_defaults_for_missing_parameters() {
        let repository = Arc::new(RecordingRepository::default());
        let service = service(&repository);

        assert!(service.chart(None, None).await.unwrap().is_none());
        service.chart(Some(""), Some("5m")).await.unwrap();
        service.chart(Some("7d"), Some(" ")).await.unwrap();

        assert_eq!(
            *repository.queries.lock().unwrap(),
            vec![
                ("1d".to_string(), "1h".to_string()),
                ("1d".to_string(), "5m".to_string()),
                ("7d".to_string(), "1h".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_rejects_non_duration_input() {
        let repository = Arc::new(RecordingRepository::default());
        let service = service(&repository);

        let result = service.chart(Some("1d; DROP DATABASE x"), None).await;
        assert!(matches!(result, Err(ChartQueryError::InvalidDuration(_))));
        assert!(repository.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let repository = Arc::new(RecordingRepository::default());
        let result = service(&repository).chart(Some("5d"), None).await;
        assert!(matches!(result, Err(ChartQueryError::Store(_))));
    }

    #[test]
    fn test_duration_literals() {
        for ok in ["1d", "90m", "1h30m", "500ms", "2w", "10us", "3µs"] {
            assert!(is_duration_literal(ok), "{}", ok);
        }
        for bad in ["", "d", "1", "1x", "1d ", "-1d", "now()", "1h;"] {
            assert!(!is_duration_literal(bad), "{}", bad);
        }
    }
}
