//! Engine database operations
//!
//! One module per table. All row mapping happens here; service code only
//! sees the typed models from `copyflow-common`.

pub mod analysis_results;
pub mod content_artifacts;
pub mod keyword_metrics;
pub mod pages;
pub mod projects;
pub mod seo_artifacts;
mod versioning;

use chrono::{DateTime, Utc};
use copyflow_common::{Error, Result};
use uuid::Uuid;

/// Parse a TEXT uuid column.
pub(crate) fn parse_uuid(raw: &str, column: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| Error::Internal(format!("invalid uuid in column {column}: {e}")))
}

/// Parse an RFC3339 TEXT timestamp column.
pub(crate) fn parse_timestamp(raw: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("invalid timestamp in column {column}: {e}")))
}

/// Parse a JSON TEXT column holding a string list.
pub(crate) fn parse_string_list(raw: &str, column: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|e| Error::Internal(format!("invalid JSON in column {column}: {e}")))
}
