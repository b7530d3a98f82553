//! SEO artifact manager
//!
//! Owns the SEO upload write path: validate, insert the next artifact
//! version, recompute the page status, then hand the new version to the
//! enrichment pipeline as a detached task. Artifact and status writes must
//! both land before the call returns; enrichment must never delay it.

use crate::db::{content_artifacts, keyword_metrics, pages, seo_artifacts};
use crate::services::enrichment;
use crate::workflow::compute_status;
use crate::AppState;
use copyflow_common::db::models::{KeywordMetric, SeoArtifact};
use copyflow_common::{Error, Result};
use tracing::{debug, warn};
use uuid::Uuid;

/// Upload a new SEO keyword set for a page.
///
/// The artifact insert and the status update commit in one transaction, with
/// the page status and content presence re-read inside it: either both land
/// or neither does, and a concurrent content upload cannot slip a stale
/// status write in between.
pub async fn upload_seo_data(
    state: &AppState,
    page_id: Uuid,
    primary_keywords: Vec<String>,
    secondary_keywords: Vec<String>,
    uploader: Uuid,
) -> Result<SeoArtifact> {
    if primary_keywords.is_empty() && secondary_keywords.is_empty() {
        // Permitted for legacy compatibility, but worth noticing
        warn!(%page_id, "SEO upload with no keywords");
    }

    let mut tx = state.db.begin().await?;

    let page = pages::get_page(&mut *tx, page_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("page {page_id}")))?;

    let artifact = seo_artifacts::insert_next(
        &mut *tx,
        page_id,
        &primary_keywords,
        &secondary_keywords,
        uploader,
    )
    .await?;

    let has_content = content_artifacts::get_latest(&mut *tx, page_id)
        .await?
        .is_some();
    let next_status = compute_status(page.status, true, has_content);
    if next_status != page.status {
        pages::update_page_status(&mut *tx, page_id, next_status).await?;
    }

    tx.commit().await?;
    if next_status != page.status {
        debug!(%page_id, from = %page.status, to = %next_status, "Page status updated");
    }

    match &state.metrics_provider {
        Some(provider) => {
            enrichment::spawn_enrichment(state.db.clone(), provider.clone(), artifact.clone());
        }
        None => debug!(%page_id, "Metrics provider not configured; skipping enrichment"),
    }

    Ok(artifact)
}

/// Latest SEO artifact for a page, if any.
pub async fn get_latest_seo_data(state: &AppState, page_id: Uuid) -> Result<Option<SeoArtifact>> {
    seo_artifacts::get_latest(&state.db, page_id).await
}

/// Full SEO version history for a page, newest first.
pub async fn get_seo_history(state: &AppState, page_id: Uuid) -> Result<Vec<SeoArtifact>> {
    seo_artifacts::list_versions(&state.db, page_id).await
}

/// Correct keyword fields of the current SEO version in place. No version
/// bump, no status change, no re-enrichment.
pub async fn correct_seo_data(
    state: &AppState,
    artifact_id: Uuid,
    primary_keywords: Vec<String>,
    secondary_keywords: Vec<String>,
) -> Result<SeoArtifact> {
    seo_artifacts::correct_current(&state.db, artifact_id, &primary_keywords, &secondary_keywords)
        .await
}

/// Stored keyword metrics for one SEO artifact version.
pub async fn get_keyword_metrics(
    state: &AppState,
    seo_artifact_id: Uuid,
) -> Result<Vec<KeywordMetric>> {
    keyword_metrics::list_for_artifact(&state.db, seo_artifact_id).await
}
