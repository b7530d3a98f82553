//! Analysis result reads
//!
//! Analysis rows are produced by an external provider; the engine only ever
//! reads the most recent one for a page.

use super::{parse_timestamp, parse_uuid};
use copyflow_common::db::models::AnalysisResult;
use copyflow_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub async fn get_latest_for_page(
    pool: &SqlitePool,
    page_id: Uuid,
) -> Result<Option<AnalysisResult>> {
    let row = sqlx::query(
        r#"
        SELECT id, page_id, overall_score, seo_score, readability_score,
               keyword_density_score, grammar_score, detailed_feedback, created_at
        FROM analysis_results
        WHERE page_id = ?
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(page_id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let id: String = row.get("id");
            let page_id: String = row.get("page_id");
            let created_at: String = row.get("created_at");
            let feedback: Option<String> = row.get("detailed_feedback");
            Ok(Some(AnalysisResult {
                id: parse_uuid(&id, "analysis_results.id")?,
                page_id: parse_uuid(&page_id, "analysis_results.page_id")?,
                overall_score: row.get("overall_score"),
                seo_score: row.get("seo_score"),
                readability_score: row.get("readability_score"),
                keyword_density_score: row.get("keyword_density_score"),
                grammar_score: row.get("grammar_score"),
                detailed_feedback: feedback
                    .map(|f| {
                        serde_json::from_str(&f).map_err(|e| {
                            Error::Internal(format!("invalid JSON in analysis feedback: {e}"))
                        })
                    })
                    .transpose()?,
                created_at: parse_timestamp(&created_at, "analysis_results.created_at")?,
            }))
        }
        None => Ok(None),
    }
}
