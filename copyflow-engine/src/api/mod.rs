//! HTTP API handlers for the workflow engine
//!
//! Thin layer over the services: request shapes, uploader identity
//! extraction, and routing. All workflow rules live below this layer.

pub mod content;
pub mod health;
pub mod pages;
pub mod seo;

pub use content::content_routes;
pub use health::health_routes;
pub use pages::page_routes;
pub use seo::seo_routes;

use crate::error::ApiError;
use axum::http::HeaderMap;
use copyflow_common::Error;
use uuid::Uuid;

/// Resolve the uploader identity from the `x-user-id` header.
///
/// Identity is always explicit per request; there is no ambient current-user
/// state. A missing or malformed header is `NotAuthenticated`.
pub(crate) fn require_uploader(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or(ApiError::Common(Error::NotAuthenticated))
}
