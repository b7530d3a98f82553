//! Database initialization
//!
//! Opens (or creates) the SQLite database and creates the schema
//! idempotently. The UNIQUE constraints here are load-bearing: version
//! assignment for artifacts and the keyword-metrics upsert both rely on them.

use crate::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL lets concurrent upload requests read while one writer commits
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all engine tables (idempotent). Exposed separately so tests can
/// run against `sqlite::memory:` pools.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_projects_table(pool).await?;
    create_pages_table(pool).await?;
    create_seo_artifacts_table(pool).await?;
    create_content_artifacts_table(pool).await?;
    create_keyword_metrics_table(pool).await?;
    create_analysis_results_table(pool).await?;
    Ok(())
}

pub async fn create_projects_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            website_url TEXT NOT NULL,
            description TEXT,
            created_by TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_pages_table(pool: &SqlitePool) -> Result<()> {
    // slug is stored lowercased, so the UNIQUE constraint gives
    // case-insensitive uniqueness within a project
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pages (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL REFERENCES projects(id),
            name TEXT NOT NULL,
            slug TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'draft',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (project_id, slug)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_seo_artifacts_table(pool: &SqlitePool) -> Result<()> {
    // UNIQUE(page_id, version) rejects the loser of a concurrent version race
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS seo_artifacts (
            id TEXT PRIMARY KEY,
            page_id TEXT NOT NULL REFERENCES pages(id),
            primary_keywords TEXT NOT NULL,
            secondary_keywords TEXT NOT NULL,
            uploaded_by TEXT NOT NULL,
            version INTEGER NOT NULL,
            uploaded_at TEXT NOT NULL,
            UNIQUE (page_id, version)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_content_artifacts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_artifacts (
            id TEXT PRIMARY KEY,
            page_id TEXT NOT NULL REFERENCES pages(id),
            parsed_content TEXT NOT NULL,
            source_document_url TEXT,
            uploaded_by TEXT NOT NULL,
            version INTEGER NOT NULL,
            uploaded_at TEXT NOT NULL,
            UNIQUE (page_id, version)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_keyword_metrics_table(pool: &SqlitePool) -> Result<()> {
    // (seo_artifact_id, keyword) is the natural key; enrichment upserts on it
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS keyword_metrics (
            seo_artifact_id TEXT NOT NULL REFERENCES seo_artifacts(id),
            keyword TEXT NOT NULL,
            keyword_class TEXT NOT NULL,
            search_volume INTEGER,
            cpc REAL,
            competition TEXT,
            competition_index INTEGER,
            low_top_of_page_bid REAL,
            high_top_of_page_bid REAL,
            fetched_at TEXT NOT NULL,
            PRIMARY KEY (seo_artifact_id, keyword)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_analysis_results_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analysis_results (
            id TEXT PRIMARY KEY,
            page_id TEXT NOT NULL REFERENCES pages(id),
            overall_score REAL NOT NULL,
            seo_score REAL,
            readability_score REAL,
            keyword_density_score REAL,
            grammar_score REAL,
            detailed_feedback TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
