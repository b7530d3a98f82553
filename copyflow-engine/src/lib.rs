//! copyflow-engine library interface
//!
//! The page workflow engine: versioned SEO/content artifacts, derived page
//! status, content file parsing, and background keyword enrichment. The HTTP
//! layer in `api` is a thin skin over the services; integration tests drive
//! the services directly through [`AppState`].

pub mod api;
pub mod db;
pub mod error;
pub mod parser;
pub mod services;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use services::metrics_client::KeywordMetricsProvider;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers and services
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// External keyword-metrics provider; None disables enrichment
    pub metrics_provider: Option<Arc<dyn KeywordMetricsProvider>>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, metrics_provider: Option<Arc<dyn KeywordMetricsProvider>>) -> Self {
        Self {
            db,
            metrics_provider,
            startup_time: Utc::now(),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::page_routes())
        .merge(api::seo_routes())
        .merge(api::content_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
