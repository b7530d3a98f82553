//! Content artifact manager
//!
//! Mirror of the SEO manager's write path for content bodies, minus the
//! enrichment step. The parsed payload arrives format-agnostic from the
//! content file parser, so nothing here depends on CSV vs spreadsheet.

use crate::db::{content_artifacts, pages, seo_artifacts};
use crate::workflow::compute_status;
use crate::AppState;
use copyflow_common::db::models::{ContentArtifact, NormalizedContent};
use copyflow_common::{Error, Result};
use tracing::debug;
use uuid::Uuid;

/// Upload a new content body for a page.
///
/// Same transactional write path as the SEO side: artifact insert, presence
/// re-read and status update commit together or not at all.
pub async fn upload_content_data(
    state: &AppState,
    page_id: Uuid,
    parsed_content: NormalizedContent,
    source_document_url: Option<String>,
    uploader: Uuid,
) -> Result<ContentArtifact> {
    if parsed_content.is_empty() {
        return Err(Error::Validation("content payload is empty".into()));
    }

    let mut tx = state.db.begin().await?;

    let page = pages::get_page(&mut *tx, page_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("page {page_id}")))?;

    let artifact = content_artifacts::insert_next(
        &mut *tx,
        page_id,
        &parsed_content,
        source_document_url.as_deref(),
        uploader,
    )
    .await?;

    let has_seo = seo_artifacts::get_latest(&mut *tx, page_id).await?.is_some();
    let next_status = compute_status(page.status, has_seo, true);
    if next_status != page.status {
        pages::update_page_status(&mut *tx, page_id, next_status).await?;
    }

    tx.commit().await?;
    if next_status != page.status {
        debug!(%page_id, from = %page.status, to = %next_status, "Page status updated");
    }

    Ok(artifact)
}

/// Correct the payload of the current content version in place. No version
/// bump, no status change.
pub async fn correct_content_data(
    state: &AppState,
    artifact_id: Uuid,
    parsed_content: NormalizedContent,
    source_document_url: Option<String>,
) -> Result<ContentArtifact> {
    if parsed_content.is_empty() {
        return Err(Error::Validation("content payload is empty".into()));
    }
    content_artifacts::correct_current(
        &state.db,
        artifact_id,
        &parsed_content,
        source_document_url.as_deref(),
    )
    .await
}

/// Latest content artifact for a page, if any.
pub async fn get_latest_content_data(
    state: &AppState,
    page_id: Uuid,
) -> Result<Option<ContentArtifact>> {
    content_artifacts::get_latest(&state.db, page_id).await
}

/// Full content version history for a page, newest first.
pub async fn get_content_history(state: &AppState, page_id: Uuid) -> Result<Vec<ContentArtifact>> {
    content_artifacts::list_versions(&state.db, page_id).await
}
