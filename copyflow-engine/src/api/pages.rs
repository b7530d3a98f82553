//! Project, page and review endpoints

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::require_uploader;
use crate::db::{pages, projects};
use crate::error::ApiResult;
use crate::services::review_manager::{self, PageDetail};
use crate::workflow::ReviewAction;
use crate::AppState;
use copyflow_common::db::models::{Page, Project};

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub website_url: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub action: ReviewAction,
}

/// POST /projects
pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let uploader = require_uploader(&headers)?;
    let project = projects::create_project(
        &state.db,
        &req.name,
        &req.website_url,
        req.description.as_deref(),
        uploader,
    )
    .await?;
    Ok(Json(project))
}

/// POST /projects/:project_id/pages
pub async fn create_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreatePageRequest>,
) -> ApiResult<Json<Page>> {
    require_uploader(&headers)?;
    let page = pages::create_page(&state.db, project_id, &req.name, &req.slug).await?;
    Ok(Json(page))
}

/// GET /pages/:page_id
pub async fn get_page_detail(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> ApiResult<Json<PageDetail>> {
    let detail = review_manager::get_page_detail(&state, page_id).await?;
    Ok(Json(detail))
}

/// POST /pages/:page_id/review
pub async fn review_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(page_id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> ApiResult<Json<Page>> {
    require_uploader(&headers)?;
    let page = review_manager::transition_page_status(&state, page_id, req.action).await?;
    Ok(Json(page))
}

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects/:project_id/pages", post(create_page))
        .route("/pages/:page_id", get(get_page_detail))
        .route("/pages/:page_id/review", post(review_page))
}
