//! SEO artifact persistence
//!
//! Versioned, append-only keyword sets. Reads take the highest version;
//! writes insert current-max + 1 and rely on UNIQUE(page_id, version) to
//! reject the loser of a concurrent race.

use super::versioning::map_insert_error;
use super::{parse_string_list, parse_timestamp, parse_uuid};
use chrono::Utc;
use copyflow_common::db::models::SeoArtifact;
use copyflow_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Acquire, Row, Sqlite, SqliteExecutor, SqlitePool};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

const COLUMNS: &str =
    "id, page_id, primary_keywords, secondary_keywords, uploaded_by, version, uploaded_at";

/// Current (highest-version) SEO artifact for a page, if any.
pub async fn get_latest(
    executor: impl SqliteExecutor<'_>,
    page_id: Uuid,
) -> Result<Option<SeoArtifact>> {
    let row = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM seo_artifacts WHERE page_id = ? ORDER BY version DESC LIMIT 1"
    ))
    .bind(page_id.to_string())
    .fetch_optional(executor)
    .await?;

    row.map(|row| artifact_from_row(&row)).transpose()
}

/// Full version history for a page, newest first.
pub async fn list_versions(pool: &SqlitePool, page_id: Uuid) -> Result<Vec<SeoArtifact>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM seo_artifacts WHERE page_id = ? ORDER BY version DESC"
    ))
    .bind(page_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(artifact_from_row).collect()
}

/// Insert the next version of the page's SEO artifact.
///
/// Takes anything a connection can be acquired from, so callers that need
/// the insert atomic with other writes pass their open transaction.
///
/// Not a compare-and-swap: two concurrent uploads can both read version N and
/// try to insert N+1. The uniqueness constraint decides the winner; the loser
/// gets `VersionConflict` and should re-read and retry.
// Returns a boxed future rather than using `async fn`: the anonymous
// lifetime of `impl Acquire<'_>` is late-bound, which makes rustc reject
// `Send` proofs for callers' futures (rust-lang/rust#102211).
pub fn insert_next<'a, A>(
    conn: A,
    page_id: Uuid,
    primary_keywords: &'a [String],
    secondary_keywords: &'a [String],
    uploaded_by: Uuid,
) -> Pin<Box<dyn Future<Output = Result<SeoArtifact>> + Send + 'a>>
where
    A: Acquire<'a, Database = Sqlite> + Send + 'a,
{
    Box::pin(async move {
        let mut conn = conn.acquire().await?;
        let current = get_latest(&mut *conn, page_id).await?;
        let version = current.map(|a| a.version).unwrap_or(0) + 1;

        let artifact = SeoArtifact {
            id: Uuid::new_v4(),
            page_id,
            primary_keywords: primary_keywords.to_vec(),
            secondary_keywords: secondary_keywords.to_vec(),
            uploaded_by,
            version,
            uploaded_at: Utc::now(),
        };

        sqlx::query(
            r#"
        INSERT INTO seo_artifacts
            (id, page_id, primary_keywords, secondary_keywords, uploaded_by, version, uploaded_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        )
        .bind(artifact.id.to_string())
        .bind(artifact.page_id.to_string())
        .bind(encode_list(&artifact.primary_keywords)?)
        .bind(encode_list(&artifact.secondary_keywords)?)
        .bind(artifact.uploaded_by.to_string())
        .bind(artifact.version)
        .bind(artifact.uploaded_at.to_rfc3339())
        .execute(&mut *conn)
        .await
        .map_err(|e| map_insert_error(e, page_id, "seo", version))?;

        Ok(artifact)
    })
}

/// In-place field correction of the current version only.
///
/// Historical versions are immutable; the version guard makes an attempt to
/// correct a superseded artifact a no-op surfaced as `VersionConflict`.
pub async fn correct_current(
    pool: &SqlitePool,
    artifact_id: Uuid,
    primary_keywords: &[String],
    secondary_keywords: &[String],
) -> Result<SeoArtifact> {
    let result = sqlx::query(
        r#"
        UPDATE seo_artifacts
        SET primary_keywords = ?, secondary_keywords = ?
        WHERE id = ?
          AND version = (SELECT MAX(version) FROM seo_artifacts s
                         WHERE s.page_id = seo_artifacts.page_id)
        "#,
    )
    .bind(encode_list(primary_keywords)?)
    .bind(encode_list(secondary_keywords)?)
    .bind(artifact_id.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let exists: Option<(String, i64)> =
            sqlx::query_as("SELECT page_id, version FROM seo_artifacts WHERE id = ?")
                .bind(artifact_id.to_string())
                .fetch_optional(pool)
                .await?;
        return match exists {
            Some((page_id, version)) => Err(Error::VersionConflict {
                page_id: parse_uuid(&page_id, "seo_artifacts.page_id")?,
                kind: "seo",
                version,
            }),
            None => Err(Error::NotFound(format!("seo artifact {artifact_id}"))),
        };
    }

    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM seo_artifacts WHERE id = ?"))
        .bind(artifact_id.to_string())
        .fetch_one(pool)
        .await?;
    artifact_from_row(&row)
}

fn encode_list(list: &[String]) -> Result<String> {
    serde_json::to_string(list).map_err(|e| Error::Internal(format!("keyword encoding: {e}")))
}

fn artifact_from_row(row: &SqliteRow) -> Result<SeoArtifact> {
    let id: String = row.get("id");
    let page_id: String = row.get("page_id");
    let primary: String = row.get("primary_keywords");
    let secondary: String = row.get("secondary_keywords");
    let uploaded_by: String = row.get("uploaded_by");
    let uploaded_at: String = row.get("uploaded_at");

    Ok(SeoArtifact {
        id: parse_uuid(&id, "seo_artifacts.id")?,
        page_id: parse_uuid(&page_id, "seo_artifacts.page_id")?,
        primary_keywords: parse_string_list(&primary, "seo_artifacts.primary_keywords")?,
        secondary_keywords: parse_string_list(&secondary, "seo_artifacts.secondary_keywords")?,
        uploaded_by: parse_uuid(&uploaded_by, "seo_artifacts.uploaded_by")?,
        version: row.get("version"),
        uploaded_at: parse_timestamp(&uploaded_at, "seo_artifacts.uploaded_at")?,
    })
}
