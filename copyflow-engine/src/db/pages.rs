//! Page database operations
//!
//! `status` is the only engine-mutable column; everything else is set at
//! creation. Slug uniqueness within a project is checked proactively and
//! backed by the UNIQUE constraint for the race window in between.

use super::{parse_timestamp, parse_uuid};
use chrono::Utc;
use copyflow_common::db::models::{Page, PageStatus};
use copyflow_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use uuid::Uuid;

pub async fn create_page(
    pool: &SqlitePool,
    project_id: Uuid,
    name: &str,
    slug: &str,
) -> Result<Page> {
    let name = name.trim();
    // Lowercased at write time so UNIQUE(project_id, slug) is effectively
    // case-insensitive
    let slug = slug.trim().to_ascii_lowercase();
    if name.is_empty() || slug.is_empty() {
        return Err(Error::Validation(
            "page name and slug must not be empty".into(),
        ));
    }

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM pages WHERE project_id = ? AND slug = ?")
            .bind(project_id.to_string())
            .bind(&slug)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(Error::Validation(format!(
            "a page with slug '{slug}' already exists in this project"
        )));
    }

    let now = Utc::now();
    let page = Page {
        id: Uuid::new_v4(),
        project_id,
        name: name.to_string(),
        slug: slug.clone(),
        status: PageStatus::Draft,
        created_at: now,
        updated_at: now,
    };

    let result = sqlx::query(
        r#"
        INSERT INTO pages (id, project_id, name, slug, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(page.id.to_string())
    .bind(page.project_id.to_string())
    .bind(&page.name)
    .bind(&page.slug)
    .bind(page.status.as_str())
    .bind(page.created_at.to_rfc3339())
    .bind(page.updated_at.to_rfc3339())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(page),
        // The proactive check above can lose a race; the constraint catches it
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(Error::Validation(
            format!("a page with slug '{slug}' already exists in this project"),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn get_page(executor: impl SqliteExecutor<'_>, page_id: Uuid) -> Result<Option<Page>> {
    let row = sqlx::query(
        "SELECT id, project_id, name, slug, status, created_at, updated_at FROM pages WHERE id = ?",
    )
    .bind(page_id.to_string())
    .fetch_optional(executor)
    .await?;

    row.map(|row| page_from_row(&row)).transpose()
}

/// Persist a recomputed or reviewer-assigned status.
pub async fn update_page_status(
    executor: impl SqliteExecutor<'_>,
    page_id: Uuid,
    status: PageStatus,
) -> Result<()> {
    let result = sqlx::query("UPDATE pages SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(page_id.to_string())
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("page {page_id}")));
    }
    Ok(())
}

fn page_from_row(row: &SqliteRow) -> Result<Page> {
    let id: String = row.get("id");
    let project_id: String = row.get("project_id");
    let status: String = row.get("status");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Page {
        id: parse_uuid(&id, "pages.id")?,
        project_id: parse_uuid(&project_id, "pages.project_id")?,
        name: row.get("name"),
        slug: row.get("slug"),
        status: PageStatus::parse(&status)
            .ok_or_else(|| Error::Internal(format!("unknown page status '{status}'")))?,
        created_at: parse_timestamp(&created_at, "pages.created_at")?,
        updated_at: parse_timestamp(&updated_at, "pages.updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::projects::create_project;
    use copyflow_common::db::init::create_schema;

    async fn test_pool_with_project() -> (SqlitePool, Uuid) {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        let project = create_project(&pool, "Acme", "https://acme.test", None, Uuid::new_v4())
            .await
            .unwrap();
        (pool, project.id)
    }

    #[tokio::test]
    async fn new_pages_start_in_draft() {
        let (pool, project_id) = test_pool_with_project().await;
        let page = create_page(&pool, project_id, "Pumps", "pumps").await.unwrap();
        assert_eq!(page.status, PageStatus::Draft);

        let loaded = get_page(&pool, page.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, PageStatus::Draft);
        assert_eq!(loaded.slug, "pumps");
    }

    #[tokio::test]
    async fn slug_uniqueness_is_case_insensitive() {
        let (pool, project_id) = test_pool_with_project().await;
        create_page(&pool, project_id, "Pumps", "Pumps").await.unwrap();
        let err = create_page(&pool, project_id, "Pumps 2", "PUMPS")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("already exists")));
    }

    #[tokio::test]
    async fn status_update_round_trips() {
        let (pool, project_id) = test_pool_with_project().await;
        let page = create_page(&pool, project_id, "Pumps", "pumps").await.unwrap();

        update_page_status(&pool, page.id, PageStatus::AwaitingContent)
            .await
            .unwrap();
        let loaded = get_page(&pool, page.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, PageStatus::AwaitingContent);
    }

    #[tokio::test]
    async fn status_update_for_missing_page_is_not_found() {
        let (pool, _) = test_pool_with_project().await;
        let err = update_page_status(&pool, Uuid::new_v4(), PageStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
