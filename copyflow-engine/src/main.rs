//! copyflow-engine - page workflow engine service
//!
//! Coordinates the content-production pipeline: versioned SEO and content
//! artifact uploads, derived page status, and background keyword enrichment.

use anyhow::Result;
use copyflow_common::config::Settings;
use copyflow_engine::services::metrics_client::HttpMetricsProvider;
use copyflow_engine::services::metrics_client::KeywordMetricsProvider;
use copyflow_engine::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting copyflow-engine");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Optional first argument: path to a TOML config file
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref())?;

    info!("Database: {}", settings.database_path.display());
    let db_pool = copyflow_common::db::init_database(&settings.database_path).await?;
    info!("Database connection established");

    let provider: Option<Arc<dyn KeywordMetricsProvider>> = match &settings.metrics_provider {
        Some(provider_settings) => {
            let client = HttpMetricsProvider::new(provider_settings.clone())
                .map_err(|e| anyhow::anyhow!("metrics provider setup failed: {e}"))?;
            info!("Keyword metrics provider configured: {}", provider_settings.base_url);
            Some(Arc::new(client))
        }
        None => {
            warn!("No keyword metrics provider configured; enrichment disabled");
            None
        }
    };

    let state = AppState::new(db_pool, provider);
    let app = copyflow_engine::build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    info!("Listening on http://{}", settings.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
