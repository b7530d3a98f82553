//! Keyword metric persistence
//!
//! Metrics attach to a specific SEO artifact version, so late-arriving
//! enrichment for a superseded version never touches newer data. Writes are
//! upserts on the (seo_artifact_id, keyword) natural key, which makes
//! repeated enrichment attempts idempotent.

use super::{parse_timestamp, parse_uuid};
use copyflow_common::db::models::{KeywordClass, KeywordMetric};
use copyflow_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub async fn upsert_metrics(pool: &SqlitePool, metrics: &[KeywordMetric]) -> Result<()> {
    for metric in metrics {
        sqlx::query(
            r#"
            INSERT INTO keyword_metrics
                (seo_artifact_id, keyword, keyword_class, search_volume, cpc,
                 competition, competition_index, low_top_of_page_bid,
                 high_top_of_page_bid, fetched_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(seo_artifact_id, keyword) DO UPDATE SET
                keyword_class = excluded.keyword_class,
                search_volume = excluded.search_volume,
                cpc = excluded.cpc,
                competition = excluded.competition,
                competition_index = excluded.competition_index,
                low_top_of_page_bid = excluded.low_top_of_page_bid,
                high_top_of_page_bid = excluded.high_top_of_page_bid,
                fetched_at = excluded.fetched_at
            "#,
        )
        .bind(metric.seo_artifact_id.to_string())
        .bind(&metric.keyword)
        .bind(metric.keyword_class.as_str())
        .bind(metric.search_volume)
        .bind(metric.cpc)
        .bind(&metric.competition)
        .bind(metric.competition_index)
        .bind(metric.low_top_of_page_bid)
        .bind(metric.high_top_of_page_bid)
        .bind(metric.fetched_at.to_rfc3339())
        .execute(pool)
        .await?;
    }
    Ok(())
}

pub async fn list_for_artifact(
    pool: &SqlitePool,
    seo_artifact_id: Uuid,
) -> Result<Vec<KeywordMetric>> {
    let rows = sqlx::query(
        r#"
        SELECT seo_artifact_id, keyword, keyword_class, search_volume, cpc,
               competition, competition_index, low_top_of_page_bid,
               high_top_of_page_bid, fetched_at
        FROM keyword_metrics
        WHERE seo_artifact_id = ?
        ORDER BY keyword
        "#,
    )
    .bind(seo_artifact_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let artifact_id: String = row.get("seo_artifact_id");
            let class: String = row.get("keyword_class");
            let fetched_at: String = row.get("fetched_at");
            Ok(KeywordMetric {
                seo_artifact_id: parse_uuid(&artifact_id, "keyword_metrics.seo_artifact_id")?,
                keyword: row.get("keyword"),
                keyword_class: KeywordClass::parse(&class).ok_or_else(|| {
                    Error::Internal(format!("unknown keyword class '{class}'"))
                })?,
                search_volume: row.get("search_volume"),
                cpc: row.get("cpc"),
                competition: row.get("competition"),
                competition_index: row.get("competition_index"),
                low_top_of_page_bid: row.get("low_top_of_page_bid"),
                high_top_of_page_bid: row.get("high_top_of_page_bid"),
                fetched_at: parse_timestamp(&fetched_at, "keyword_metrics.fetched_at")?,
            })
        })
        .collect()
}
