// HTTP chart source implementation
use crate::application::chart_source::{ChartSource, FetchError};
use crate::domain::telemetry::ChartPayload;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpChartSource {
    client: reqwest::Client,
    base_url: String,
    resource: String,
}

impl HttpChartSource {
    pub fn new(base_url: String, resource: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            resource,
        })
    }

    fn build_chart_url(&self, since: &str) -> String {
        format!(
            "{}/rest/{}/chart?since={}",
            self.base_url,
            self.resource,
            urlencoding::encode(since)
        )
    }
}

#[async_trait]
impl ChartSource for HttpChartSource {
    async fn fetch_chart(&self, since: &str) -> Result<ChartPayload, FetchError> {
        let url = self.build_chart_url(since);
        tracing::debug!("Fetching chart data: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        // The backend answers `null` when it has no series at all
        let payload: Option<ChartPayload> =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(payload.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Query,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
    };
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct SinceQuery {
        since: String,
    }

    async fn chart(Query(query): Query<SinceQuery>) -> Response {
        match query.since.as_str() {
            "1d" => Json(json!({
                "2015-01-02T00:00:00Z": { "1.0": 5 },
                "2015-01-01T00:00:00Z": { "1.0": 3 }
            }))
            .into_response(),
            "empty" => Json(serde_json::Value::Null).into_response(),
            "garbage" => "not json".into_response(),
            "1 h" => Json(json!({ "0": { "2.0": 1 } })).into_response(),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "store unavailable").into_response(),
        }
    }

    async fn serve() -> String {
        let router = Router::new().route("/rest/space-shuttle/chart", get(chart));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn source(base_url: String) -> HttpChartSource {
        HttpChartSource::new(base_url, "space-shuttle".to_string(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_build_chart_url() {
        let source = source("http://localhost:8080/".to_string());
        assert_eq!(
            source.build_chart_url("1d"),
            "http://localhost:8080/rest/space-shuttle/chart?since=1d"
        );
        assert_eq!(
            source.build_chart_url("1 h&x"),
            "http://localhost:8080/rest/space-shuttle/chart?since=1%20h%26x"
        );
    }

    #[tokio::test]
    async fn test_fetches_payload() {
        let source = source(serve().await);
        let payload = source.fetch_chart("1d").await.unwrap();

        assert_eq!(payload.len(), 2);
        assert_eq!(payload["2015-01-01T00:00:00Z"]["1.0"], json!(3));
    }

    #[tokio::test]
    async fn test_encodes_window() {
        let source = source(serve().await);
        let payload = source.fetch_chart("1 h").await.unwrap();
        assert!(payload.contains_key("0"));
    }

    #[tokio::test]
    async fn test_null_body_is_empty() {
        let source = source(serve().await);
        assert!(source.fetch_chart("empty").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status() {
        let source = source(serve().await);
        match source.fetch_chart("1y").await {
            Err(FetchError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "store unavailable");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let source = source(serve().await);
        assert!(matches!(
            source.fetch_chart("garbage").await,
            Err(FetchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = source(format!("http://{}", addr));
        assert!(matches!(
            source.fetch_chart("1d").await,
            Err(FetchError::Transport(_))
        ));
    }
}
