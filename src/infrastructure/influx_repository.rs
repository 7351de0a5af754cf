// InfluxDB repository implementation
use crate::application::chart_repository::ChartRepository;
use crate::domain::telemetry::ChartPayload;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

const SERIES_NAME: &str = "classification";
const CLASS_KEY: &str = "class";

#[derive(Debug, Clone)]
pub struct InfluxRepository {
    client: reqwest::Client,
    host: String,
    token: String,
    database: String,
    retention_policy: String,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    #[serde(default)]
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    columns: Vec<String>,
    values: Vec<Vec<Value>>,
    #[serde(default)]
    tags: Option<std::collections::HashMap<String, String>>,
}

impl InfluxRepository {
    pub fn new(host: String, token: String, database: String, retention_policy: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
            token,
            database,
            retention_policy,
        }
    }

    fn count_query(since: &str, group_by: &str) -> String {
        format!(
            "SELECT count(\"{key}\") FROM \"{series}\" WHERE time > now() - {since} GROUP BY time({group_by}), \"{key}\"",
            key = CLASS_KEY,
            series = SERIES_NAME,
        )
    }

    fn build_query_url(&self, query: &str) -> String {
        format!(
            "{}/query?db={}&rp={}&q={}",
            self.host,
            urlencoding::encode(&self.database),
            urlencoding::encode(&self.retention_policy),
            urlencoding::encode(query)
        )
    }

    async fn execute_query(&self, query: &str) -> Result<InfluxQLResponse> {
        let url = self.build_query_url(query);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if !self.token.is_empty() {
            request = request.header("Authorization", format!("Token {}", self.token));
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to InfluxDB")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB query failed with status {}: {}", status, body);
        }

        response
            .json::<InfluxQLResponse>()
            .await
            .context("Failed to parse InfluxDB response")
    }
}

/// Fold per-class series into bucket time -> { class -> count }.
fn group_counts(response: InfluxQLResponse) -> Result<Option<ChartPayload>> {
    let Some(result) = response.results.into_iter().next() else {
        return Ok(None);
    };
    if let Some(error) = result.error {
        anyhow::bail!("InfluxDB query error: {}", error);
    }
    let series_list = match result.series {
        Some(series) if !series.is_empty() => series,
        _ => return Ok(None),
    };

    let mut payload = ChartPayload::new();
    for series in series_list {
        let Some(class) = series.tags.as_ref().and_then(|t| t.get(CLASS_KEY)) else {
            tracing::warn!("Skipping {} series without a {} tag", SERIES_NAME, CLASS_KEY);
            continue;
        };
        let class = class_field(class);

        let time_idx = series.columns.iter().position(|c| c == "time").unwrap_or(0);
        let count_idx = series.columns.iter().position(|c| c == "count").unwrap_or(1);

        for row in &series.values {
            let (Some(time), Some(count)) = (
                row.get(time_idx).and_then(Value::as_str),
                row.get(count_idx).and_then(Value::as_f64),
            ) else {
                continue;
            };
            payload
                .entry(time.to_string())
                .or_default()
                .insert(class.clone(), Value::from(count));
        }
    }

    tracing::debug!("Grouped counts into {} buckets", payload.len());
    Ok(Some(payload))
}

/// Class tags become the series field keys the chart reads: `1` -> `1.0`.
fn class_field(tag: &str) -> String {
    tag.parse::<f64>()
        .map(|v| format!("{:?}", v))
        .unwrap_or_else(|_| tag.to_string())
}

#[async_trait]
impl ChartRepository for InfluxRepository {
    async fn count_by_class(&self, since: &str, group_by: &str) -> Result<Option<ChartPayload>> {
        let query = Self::count_query(since, group_by);
        tracing::debug!("Executing chart query: {}", query);

        let response = self.execute_query(&query).await?;
        group_counts(response)
    }
}
