//! Review transitions and aggregate page reads

use crate::db::{analysis_results, content_artifacts, pages, seo_artifacts};
use crate::workflow::{apply_review, ReviewAction};
use crate::AppState;
use copyflow_common::db::models::{AnalysisResult, ContentArtifact, Page, SeoArtifact};
use copyflow_common::{Error, Result};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// A page together with its latest artifacts and latest analysis.
#[derive(Debug, Serialize)]
pub struct PageDetail {
    #[serde(flatten)]
    pub page: Page,
    pub seo_data: Option<SeoArtifact>,
    pub content_data: Option<ContentArtifact>,
    pub analysis: Option<AnalysisResult>,
}

/// Apply a reviewer decision to a page in `pending_review`. The status read
/// and write share a transaction so a concurrent upload cannot change the
/// page between the check and the transition.
pub async fn transition_page_status(
    state: &AppState,
    page_id: Uuid,
    action: ReviewAction,
) -> Result<Page> {
    let mut tx = state.db.begin().await?;

    let page = pages::get_page(&mut *tx, page_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("page {page_id}")))?;

    let next_status = apply_review(page.status, action)?;
    pages::update_page_status(&mut *tx, page_id, next_status).await?;
    let updated = pages::get_page(&mut *tx, page_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("page {page_id}")))?;

    tx.commit().await?;
    info!(%page_id, action = action.as_str(), from = %page.status, to = %next_status, "Review transition");

    Ok(updated)
}

/// Page aggregate for detail views: latest SEO, latest content, latest
/// analysis. Analysis is produced externally and consumed read-only here.
pub async fn get_page_detail(state: &AppState, page_id: Uuid) -> Result<PageDetail> {
    let page = pages::get_page(&state.db, page_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("page {page_id}")))?;

    let seo_data = seo_artifacts::get_latest(&state.db, page_id).await?;
    let content_data = content_artifacts::get_latest(&state.db, page_id).await?;
    let analysis = analysis_results::get_latest_for_page(&state.db, page_id).await?;

    Ok(PageDetail {
        page,
        seo_data,
        content_data,
        analysis,
    })
}
