//! SEO artifact endpoints

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::require_uploader;
use crate::error::ApiResult;
use crate::services::seo_manager;
use crate::AppState;
use copyflow_common::db::models::{KeywordMetric, SeoArtifact};

#[derive(Debug, Deserialize)]
pub struct SeoUploadRequest {
    #[serde(default)]
    pub primary_keywords: Vec<String>,
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
}

/// POST /pages/:page_id/seo
pub async fn upload_seo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(page_id): Path<Uuid>,
    Json(req): Json<SeoUploadRequest>,
) -> ApiResult<Json<SeoArtifact>> {
    let uploader = require_uploader(&headers)?;
    let artifact = seo_manager::upload_seo_data(
        &state,
        page_id,
        req.primary_keywords,
        req.secondary_keywords,
        uploader,
    )
    .await?;
    Ok(Json(artifact))
}

/// GET /pages/:page_id/seo
pub async fn get_latest_seo(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> ApiResult<Json<Option<SeoArtifact>>> {
    let artifact = seo_manager::get_latest_seo_data(&state, page_id).await?;
    Ok(Json(artifact))
}

/// GET /pages/:page_id/seo/history
pub async fn get_seo_history(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> ApiResult<Json<Vec<SeoArtifact>>> {
    let history = seo_manager::get_seo_history(&state, page_id).await?;
    Ok(Json(history))
}

/// PUT /seo/:artifact_id
///
/// In-place correction of the current version's keyword fields.
pub async fn correct_seo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(artifact_id): Path<Uuid>,
    Json(req): Json<SeoUploadRequest>,
) -> ApiResult<Json<SeoArtifact>> {
    require_uploader(&headers)?;
    let artifact = seo_manager::correct_seo_data(
        &state,
        artifact_id,
        req.primary_keywords,
        req.secondary_keywords,
    )
    .await?;
    Ok(Json(artifact))
}

/// GET /seo/:artifact_id/metrics
pub async fn get_keyword_metrics(
    State(state): State<AppState>,
    Path(artifact_id): Path<Uuid>,
) -> ApiResult<Json<Vec<KeywordMetric>>> {
    let metrics = seo_manager::get_keyword_metrics(&state, artifact_id).await?;
    Ok(Json(metrics))
}

pub fn seo_routes() -> Router<AppState> {
    Router::new()
        .route("/pages/:page_id/seo", post(upload_seo).get(get_latest_seo))
        .route("/pages/:page_id/seo/history", get(get_seo_history))
        .route("/seo/:artifact_id", put(correct_seo))
        .route("/seo/:artifact_id/metrics", get(get_keyword_metrics))
}
