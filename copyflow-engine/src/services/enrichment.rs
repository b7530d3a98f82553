//! Keyword metrics enrichment pipeline
//!
//! Runs detached from the upload that triggered it: the upload response
//! returns as soon as the artifact and status writes land, and enrichment
//! success or failure is visible only in logs. One provider attempt per
//! upload, no automatic retry; the upsert makes a later manual re-run
//! idempotent.

use crate::db::keyword_metrics;
use crate::services::metrics_client::KeywordMetricsProvider;
use chrono::Utc;
use copyflow_common::db::models::{KeywordClass, KeywordMetric, SeoArtifact};
use copyflow_common::{Error, Result};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Kick off enrichment for a freshly written SEO artifact. Fire-and-forget;
/// never blocks or fails the caller.
pub fn spawn_enrichment(
    pool: SqlitePool,
    provider: Arc<dyn KeywordMetricsProvider>,
    artifact: SeoArtifact,
) {
    let artifact_id = artifact.id;
    tokio::spawn(async move {
        match enrich_artifact(&pool, provider.as_ref(), &artifact).await {
            Ok(stored) => {
                info!(%artifact_id, stored, "Keyword enrichment complete");
            }
            Err(e) => {
                // Non-fatal by contract: the upload already succeeded
                warn!(%artifact_id, error = %e, "Keyword enrichment failed");
            }
        }
    });
}

/// Fetch metrics for one SEO artifact version and upsert them.
///
/// Returns the number of metric rows written. An empty keyword set is a
/// no-op, not an error.
pub async fn enrich_artifact(
    pool: &SqlitePool,
    provider: &dyn KeywordMetricsProvider,
    artifact: &SeoArtifact,
) -> Result<usize> {
    let keywords = dedupe_keywords(&artifact.primary_keywords, &artifact.secondary_keywords);
    if keywords.is_empty() {
        debug!(artifact_id = %artifact.id, "No keywords to enrich");
        return Ok(0);
    }

    let fetched = provider
        .fetch_metrics(&keywords)
        .await
        .map_err(|e| Error::Internal(format!("metrics provider: {e}")))?;

    let primary: HashSet<&str> = artifact
        .primary_keywords
        .iter()
        .map(String::as_str)
        .collect();
    let metrics: Vec<KeywordMetric> = fetched
        .into_iter()
        .map(|m| to_metric(artifact.id, &primary, m))
        .collect();

    keyword_metrics::upsert_metrics(pool, &metrics).await?;
    Ok(metrics.len())
}

/// Merge primary and secondary lists preserving order, dropping duplicates.
fn dedupe_keywords(primary: &[String], secondary: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    primary
        .iter()
        .chain(secondary.iter())
        .filter(|k| !k.trim().is_empty())
        .filter(|k| seen.insert(k.as_str()))
        .cloned()
        .collect()
}

fn to_metric(
    artifact_id: Uuid,
    primary: &HashSet<&str>,
    fetched: crate::services::metrics_client::ProviderMetric,
) -> KeywordMetric {
    // A keyword in both lists classifies as primary (first match wins)
    let class = if primary.contains(fetched.keyword.as_str()) {
        KeywordClass::Primary
    } else {
        KeywordClass::Secondary
    };
    KeywordMetric {
        seo_artifact_id: artifact_id,
        keyword: fetched.keyword,
        keyword_class: class,
        search_volume: fetched.search_volume,
        cpc: fetched.cpc,
        competition: fetched.competition,
        competition_index: fetched.competition_index,
        low_top_of_page_bid: fetched.low_top_of_page_bid,
        high_top_of_page_bid: fetched.high_top_of_page_bid,
        fetched_at: Utc::now(),
    }
}
