//! Content artifact endpoints
//!
//! Content arrives either pre-parsed (JSON body) or as a raw CSV/XLSX file
//! upload that runs through the parser first. Both paths converge on the
//! same manager call.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::require_uploader;
use crate::error::ApiResult;
use crate::parser::parse_content_file;
use crate::services::content_manager;
use crate::AppState;
use copyflow_common::db::models::{ContentArtifact, NormalizedContent};

#[derive(Debug, Deserialize)]
pub struct ContentUploadRequest {
    pub parsed_content: NormalizedContent,
    pub source_document_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FileUploadParams {
    pub file_name: String,
    pub source_document_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseParams {
    pub file_name: String,
}

/// POST /pages/:page_id/content
pub async fn upload_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(page_id): Path<Uuid>,
    Json(req): Json<ContentUploadRequest>,
) -> ApiResult<Json<ContentArtifact>> {
    let uploader = require_uploader(&headers)?;
    let artifact = content_manager::upload_content_data(
        &state,
        page_id,
        req.parsed_content,
        req.source_document_url,
        uploader,
    )
    .await?;
    Ok(Json(artifact))
}

/// POST /pages/:page_id/content/file?file_name=...
///
/// Raw file body; parsed before the versioned write.
pub async fn upload_content_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(page_id): Path<Uuid>,
    Query(params): Query<FileUploadParams>,
    body: Bytes,
) -> ApiResult<Json<ContentArtifact>> {
    let uploader = require_uploader(&headers)?;
    let parsed = parse_content_file(&params.file_name, &body)?;
    let artifact = content_manager::upload_content_data(
        &state,
        page_id,
        parsed,
        params.source_document_url,
        uploader,
    )
    .await?;
    Ok(Json(artifact))
}

/// POST /content/parse?file_name=...
///
/// Parse without persisting, for client-side preview.
pub async fn parse_only(
    Query(params): Query<ParseParams>,
    body: Bytes,
) -> ApiResult<Json<NormalizedContent>> {
    let parsed = parse_content_file(&params.file_name, &body)?;
    Ok(Json(parsed))
}

/// PUT /content/:artifact_id
///
/// In-place correction of the current version's payload.
pub async fn correct_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(artifact_id): Path<Uuid>,
    Json(req): Json<ContentUploadRequest>,
) -> ApiResult<Json<ContentArtifact>> {
    require_uploader(&headers)?;
    let artifact = content_manager::correct_content_data(
        &state,
        artifact_id,
        req.parsed_content,
        req.source_document_url,
    )
    .await?;
    Ok(Json(artifact))
}

/// GET /pages/:page_id/content
pub async fn get_latest_content(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> ApiResult<Json<Option<ContentArtifact>>> {
    let artifact = content_manager::get_latest_content_data(&state, page_id).await?;
    Ok(Json(artifact))
}

/// GET /pages/:page_id/content/history
pub async fn get_content_history(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ContentArtifact>>> {
    let history = content_manager::get_content_history(&state, page_id).await?;
    Ok(Json(history))
}

pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pages/:page_id/content",
            post(upload_content).get(get_latest_content),
        )
        .route("/pages/:page_id/content/file", post(upload_content_file))
        .route("/pages/:page_id/content/history", get(get_content_history))
        .route("/content/:artifact_id", put(correct_content))
        .route("/content/parse", post(parse_only))
}

