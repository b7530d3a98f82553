//! Shared test helpers
#![allow(dead_code)]

use async_trait::async_trait;
use copyflow_common::db::init::create_schema;
use copyflow_engine::services::metrics_client::{
    KeywordMetricsProvider, ProviderError, ProviderMetric,
};
use copyflow_engine::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::Notify;
use uuid::Uuid;

/// In-memory pool with schema created. Capped at one connection: each
/// pooled in-memory SQLite connection is a separate database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    create_schema(&pool).await.expect("schema creation");
    pool
}

/// In-memory state with schema created; no metrics provider.
pub async fn test_state() -> AppState {
    AppState::new(test_pool().await, None)
}

/// In-memory state wired to the given provider.
pub async fn test_state_with_provider(provider: Arc<dyn KeywordMetricsProvider>) -> AppState {
    AppState::new(test_pool().await, Some(provider))
}

/// Create a project and one page in it; returns the page id.
pub async fn seed_page(pool: &SqlitePool) -> Uuid {
    let project = copyflow_engine::db::projects::create_project(
        pool,
        &format!("Project {}", Uuid::new_v4()),
        "https://acme.test",
        None,
        Uuid::new_v4(),
    )
    .await
    .expect("project create");

    copyflow_engine::db::pages::create_page(pool, project.id, "Industrial Pumps", "industrial-pumps")
        .await
        .expect("page create")
        .id
}

pub fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

pub fn metric(keyword: &str, volume: i64) -> ProviderMetric {
    ProviderMetric {
        keyword: keyword.to_string(),
        search_volume: Some(volume),
        cpc: Some(0.75),
        competition: Some("MEDIUM".to_string()),
        competition_index: Some(50),
        low_top_of_page_bid: Some(0.3),
        high_top_of_page_bid: Some(1.8),
    }
}

/// Scripted provider: records every call and replays the configured
/// response, or fails if `fail` is set. `fetched` is signalled on every
/// call so tests can wait for a detached enrichment task without sleeping.
pub struct FakeProvider {
    pub calls: Mutex<Vec<Vec<String>>>,
    pub metrics: Mutex<Vec<ProviderMetric>>,
    pub fail: bool,
    pub fetched: Notify,
}

impl FakeProvider {
    pub fn returning(metrics: Vec<ProviderMetric>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            metrics: Mutex::new(metrics),
            fail: false,
            fetched: Notify::new(),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            metrics: Mutex::new(Vec::new()),
            fail: true,
            fetched: Notify::new(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn set_metrics(&self, metrics: Vec<ProviderMetric>) {
        *self.metrics.lock().unwrap() = metrics;
    }
}

#[async_trait]
impl KeywordMetricsProvider for FakeProvider {
    async fn fetch_metrics(&self, kws: &[String]) -> Result<Vec<ProviderMetric>, ProviderError> {
        self.calls.lock().unwrap().push(kws.to_vec());
        // notify_one stores a permit, so a waiter that arrives late still wakes
        self.fetched.notify_one();
        if self.fail {
            return Err(ProviderError::Timeout);
        }
        Ok(self.metrics.lock().unwrap().clone())
    }
}
