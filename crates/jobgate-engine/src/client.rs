//! Scraping engine HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use jobgate_models::{ScrapeRequest, ScrapeResult};

use crate::error::{EngineError, EngineResult};
use crate::table::EngineTable;
use crate::ScrapeEngine;

/// Configuration for the engine client.
#[derive(Debug, Clone)]
pub struct EngineClientConfig {
    /// Base URL of the engine service
    pub base_url: String,
    /// Per-call timeout. `None` waits for the engine however long it takes.
    pub timeout: Option<Duration>,
}

impl Default for EngineClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8001".to_string(),
            timeout: None,
        }
    }
}

/// Error body some engines send alongside a failing status.
#[derive(Debug, Deserialize)]
struct EngineErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Client for an out-of-process scraping engine.
pub struct EngineClient {
    http: Client,
    config: EngineClientConfig,
}

impl EngineClient {
    /// Create a new engine client.
    pub fn new(config: EngineClientConfig) -> EngineResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(EngineError::Network)?;

        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ScrapeEngine for EngineClient {
    async fn scrape(&self, request: &ScrapeRequest) -> EngineResult<ScrapeResult> {
        let url = self.url("/scrape");

        debug!("Sending scrape request with {} parameters to {}", request.len(), url);

        let response = self.http.post(&url).json(&request.to_params()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<EngineErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or_else(|| format!("Engine returned {}: {}", status, body));
            return Err(EngineError::Rejected(message));
        }

        let body = response.text().await?;
        let table: EngineTable = serde_json::from_str(&body)
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        Ok(table.into_jobs())
    }

    async fn health_check(&self) -> bool {
        let url = self.url("/health");

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("Engine health check failed: {}", response.status());
                false
            }
            Err(e) => {
                warn!("Engine health check error: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use jobgate_models::{adapt, CellValue};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> EngineClient {
        EngineClient::new(EngineClientConfig {
            base_url: server.uri(),
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = EngineClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8001");
        assert!(config.timeout.is_none());
    }

    #[tokio::test]
    async fn test_scrape_posts_only_forwarded_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape"))
            .and(body_json(json!({"search_term": "engineer", "results_wanted": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "schema": {
                    "fields": [
                        {"name": "index", "type": "integer"},
                        {"name": "title", "type": "string"},
                        {"name": "max_amount", "type": "number"}
                    ],
                    "primaryKey": ["index"]
                },
                "data": [{"index": 0, "title": "Software Engineer", "max_amount": null}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request =
            adapt(br#"{"search_term":"engineer","results_wanted":5,"foo":"bar"}"#).unwrap();
        let jobs = client_for(&server).scrape(&request).await.unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].get("title"), Some(&CellValue::from("Software Engineer")));
        assert!(matches!(jobs[0].get("max_amount"), Some(CellValue::Float(f)) if f.is_nan()));
    }

    #[tokio::test]
    async fn test_scrape_failure_carries_engine_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "Network error"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .scrape(&ScrapeRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Rejected(_)));
        assert_eq!(err.to_string(), "Network error");
    }

    #[tokio::test]
    async fn test_scrape_failure_with_plain_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid country"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .scrape(&ScrapeRequest::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("invalid country"));
        assert!(err.to_string().contains("422"));
    }

    #[tokio::test]
    async fn test_scrape_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .scrape(&ScrapeRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert!(client_for(&server).health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let client = EngineClient::new(EngineClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: Some(Duration::from_secs(1)),
        })
        .unwrap();

        assert!(!client.health_check().await);
    }
}
