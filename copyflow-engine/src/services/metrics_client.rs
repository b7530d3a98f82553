//! External keyword-metrics provider client
//!
//! DataForSEO-style search-volume API: one POST per upload carrying the full
//! keyword list, HTTP basic auth, bounded by a per-request timeout. The
//! provider is best-effort; callers treat every failure as non-fatal.

use async_trait::async_trait;
use copyflow_common::config::MetricsProviderSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Provider client errors. These never leave the enrichment task.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider request timed out")]
    Timeout,

    #[error("Provider API error {0}: {1}")]
    Api(u16, String),

    #[error("Could not parse provider response: {0}")]
    Parse(String),
}

/// One keyword's metrics as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetric {
    pub keyword: String,
    pub search_volume: Option<i64>,
    pub cpc: Option<f64>,
    pub competition: Option<String>,
    pub competition_index: Option<i64>,
    pub low_top_of_page_bid: Option<f64>,
    pub high_top_of_page_bid: Option<f64>,
}

/// Seam between the enrichment pipeline and the external provider, so tests
/// can substitute a fake without network access.
#[async_trait]
pub trait KeywordMetricsProvider: Send + Sync {
    async fn fetch_metrics(&self, keywords: &[String]) -> Result<Vec<ProviderMetric>, ProviderError>;
}

#[derive(Serialize)]
struct SearchVolumeTask<'a> {
    keywords: &'a [String],
}

#[derive(Deserialize)]
struct SearchVolumeResponse {
    tasks: Option<Vec<SearchVolumeTaskResult>>,
}

#[derive(Deserialize)]
struct SearchVolumeTaskResult {
    result: Option<Vec<ProviderMetric>>,
}

/// HTTP client for the live provider.
pub struct HttpMetricsProvider {
    http_client: reqwest::Client,
    settings: MetricsProviderSettings,
}

impl HttpMetricsProvider {
    pub fn new(settings: MetricsProviderSettings) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self {
            http_client,
            settings,
        })
    }
}

#[async_trait]
impl KeywordMetricsProvider for HttpMetricsProvider {
    async fn fetch_metrics(&self, keywords: &[String]) -> Result<Vec<ProviderMetric>, ProviderError> {
        tracing::debug!(keyword_count = keywords.len(), "Querying keyword metrics provider");

        let body = vec![SearchVolumeTask { keywords }];
        let response = self
            .http_client
            .post(&self.settings.base_url)
            .basic_auth(&self.settings.login, Some(&self.settings.password))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), text));
        }

        let parsed: SearchVolumeResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let metrics = parsed
            .tasks
            .unwrap_or_default()
            .into_iter()
            .flat_map(|task| task.result.unwrap_or_default())
            .collect();
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parsing_tolerates_missing_fields() {
        let raw = r#"{
            "tasks": [{
                "result": [
                    {"keyword": "pumps", "search_volume": 1200, "cpc": 0.8,
                     "competition": "LOW", "competition_index": 12,
                     "low_top_of_page_bid": 0.2, "high_top_of_page_bid": 1.1},
                    {"keyword": "valves"}
                ]
            }]
        }"#;
        let parsed: SearchVolumeResponse = serde_json::from_str(raw).unwrap();
        let metrics: Vec<ProviderMetric> = parsed
            .tasks
            .unwrap()
            .into_iter()
            .flat_map(|t| t.result.unwrap_or_default())
            .collect();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].search_volume, Some(1200));
        assert_eq!(metrics[1].keyword, "valves");
        assert_eq!(metrics[1].search_volume, None);
    }

    #[test]
    fn empty_task_list_yields_no_metrics() {
        let parsed: SearchVolumeResponse = serde_json::from_str(r#"{"tasks": null}"#).unwrap();
        assert!(parsed.tasks.is_none());
    }
}
