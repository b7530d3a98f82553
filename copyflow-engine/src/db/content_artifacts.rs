//! Content artifact persistence
//!
//! Same append-only versioning scheme as the SEO table, with its own
//! independent version counter per page. The normalized payload is stored as
//! a JSON column.

use super::versioning::map_insert_error;
use super::{parse_timestamp, parse_uuid};
use chrono::Utc;
use copyflow_common::db::models::{ContentArtifact, NormalizedContent};
use copyflow_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Acquire, Row, Sqlite, SqliteExecutor, SqlitePool};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

const COLUMNS: &str =
    "id, page_id, parsed_content, source_document_url, uploaded_by, version, uploaded_at";

/// Current (highest-version) content artifact for a page, if any.
pub async fn get_latest(
    executor: impl SqliteExecutor<'_>,
    page_id: Uuid,
) -> Result<Option<ContentArtifact>> {
    let row = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM content_artifacts WHERE page_id = ? ORDER BY version DESC LIMIT 1"
    ))
    .bind(page_id.to_string())
    .fetch_optional(executor)
    .await?;

    row.map(|row| artifact_from_row(&row)).transpose()
}

/// Full version history for a page, newest first.
pub async fn list_versions(pool: &SqlitePool, page_id: Uuid) -> Result<Vec<ContentArtifact>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM content_artifacts WHERE page_id = ? ORDER BY version DESC"
    ))
    .bind(page_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(artifact_from_row).collect()
}

/// Insert the next version of the page's content artifact. See the SEO
/// counterpart for the race and atomicity semantics.
// Returns a boxed future rather than using `async fn`: the anonymous
// lifetime of `impl Acquire<'_>` is late-bound, which makes rustc reject
// `Send` proofs for callers' futures (rust-lang/rust#102211).
pub fn insert_next<'a, A>(
    conn: A,
    page_id: Uuid,
    parsed_content: &'a NormalizedContent,
    source_document_url: Option<&'a str>,
    uploaded_by: Uuid,
) -> Pin<Box<dyn Future<Output = Result<ContentArtifact>> + Send + 'a>>
where
    A: Acquire<'a, Database = Sqlite> + Send + 'a,
{
    Box::pin(async move {
        let mut conn = conn.acquire().await?;
        let current = get_latest(&mut *conn, page_id).await?;
        let version = current.map(|a| a.version).unwrap_or(0) + 1;

        let artifact = ContentArtifact {
            id: Uuid::new_v4(),
            page_id,
            parsed_content: parsed_content.clone(),
            source_document_url: source_document_url.map(|u| u.to_string()),
            uploaded_by,
            version,
            uploaded_at: Utc::now(),
        };

        let payload = serde_json::to_string(&artifact.parsed_content)
            .map_err(|e| Error::Internal(format!("content encoding: {e}")))?;

        sqlx::query(
            r#"
        INSERT INTO content_artifacts
            (id, page_id, parsed_content, source_document_url, uploaded_by, version, uploaded_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        )
        .bind(artifact.id.to_string())
        .bind(artifact.page_id.to_string())
        .bind(payload)
        .bind(&artifact.source_document_url)
        .bind(artifact.uploaded_by.to_string())
        .bind(artifact.version)
        .bind(artifact.uploaded_at.to_rfc3339())
        .execute(&mut *conn)
        .await
        .map_err(|e| map_insert_error(e, page_id, "content", version))?;

        Ok(artifact)
    })
}

/// In-place correction of the current version only. Mirrors the SEO
/// counterpart: history stays immutable, a stale target surfaces as
/// `VersionConflict`.
pub async fn correct_current(
    pool: &SqlitePool,
    artifact_id: Uuid,
    parsed_content: &NormalizedContent,
    source_document_url: Option<&str>,
) -> Result<ContentArtifact> {
    let payload = serde_json::to_string(parsed_content)
        .map_err(|e| Error::Internal(format!("content encoding: {e}")))?;

    let result = sqlx::query(
        r#"
        UPDATE content_artifacts
        SET parsed_content = ?, source_document_url = ?
        WHERE id = ?
          AND version = (SELECT MAX(version) FROM content_artifacts c
                         WHERE c.page_id = content_artifacts.page_id)
        "#,
    )
    .bind(payload)
    .bind(source_document_url)
    .bind(artifact_id.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let exists: Option<(String, i64)> =
            sqlx::query_as("SELECT page_id, version FROM content_artifacts WHERE id = ?")
                .bind(artifact_id.to_string())
                .fetch_optional(pool)
                .await?;
        return match exists {
            Some((page_id, version)) => Err(Error::VersionConflict {
                page_id: parse_uuid(&page_id, "content_artifacts.page_id")?,
                kind: "content",
                version,
            }),
            None => Err(Error::NotFound(format!("content artifact {artifact_id}"))),
        };
    }

    let row = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM content_artifacts WHERE id = ?"
    ))
    .bind(artifact_id.to_string())
    .fetch_one(pool)
    .await?;
    artifact_from_row(&row)
}

fn artifact_from_row(row: &SqliteRow) -> Result<ContentArtifact> {
    let id: String = row.get("id");
    let page_id: String = row.get("page_id");
    let payload: String = row.get("parsed_content");
    let uploaded_by: String = row.get("uploaded_by");
    let uploaded_at: String = row.get("uploaded_at");

    Ok(ContentArtifact {
        id: parse_uuid(&id, "content_artifacts.id")?,
        page_id: parse_uuid(&page_id, "content_artifacts.page_id")?,
        parsed_content: serde_json::from_str(&payload)
            .map_err(|e| Error::Internal(format!("invalid JSON in content payload: {e}")))?,
        source_document_url: row.get("source_document_url"),
        uploaded_by: parse_uuid(&uploaded_by, "content_artifacts.uploaded_by")?,
        version: row.get("version"),
        uploaded_at: parse_timestamp(&uploaded_at, "content_artifacts.uploaded_at")?,
    })
}
