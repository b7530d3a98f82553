//! Project database operations
//!
//! Projects exist here as the container pages hang off; full project
//! management lives outside the engine.

use super::{parse_timestamp, parse_uuid};
use chrono::Utc;
use copyflow_common::db::models::Project;
use copyflow_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub async fn create_project(
    pool: &SqlitePool,
    name: &str,
    website_url: &str,
    description: Option<&str>,
    created_by: Uuid,
) -> Result<Project> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("project name must not be empty".into()));
    }

    let project = Project {
        id: Uuid::new_v4(),
        name: name.to_string(),
        website_url: website_url.trim().to_string(),
        description: description.map(|d| d.to_string()),
        created_by,
        created_at: Utc::now(),
    };

    let result = sqlx::query(
        r#"
        INSERT INTO projects (id, name, website_url, description, created_by, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(project.id.to_string())
    .bind(&project.name)
    .bind(&project.website_url)
    .bind(&project.description)
    .bind(project.created_by.to_string())
    .bind(project.created_at.to_rfc3339())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(project),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(Error::Validation(
            format!("a project named '{name}' already exists"),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn get_project(pool: &SqlitePool, project_id: Uuid) -> Result<Option<Project>> {
    let row = sqlx::query(
        "SELECT id, name, website_url, description, created_by, created_at FROM projects WHERE id = ?",
    )
    .bind(project_id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let id: String = row.get("id");
            let created_by: String = row.get("created_by");
            let created_at: String = row.get("created_at");
            Ok(Some(Project {
                id: parse_uuid(&id, "projects.id")?,
                name: row.get("name"),
                website_url: row.get("website_url"),
                description: row.get("description"),
                created_by: parse_uuid(&created_by, "projects.created_by")?,
                created_at: parse_timestamp(&created_at, "projects.created_at")?,
            }))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copyflow_common::db::init::create_schema;

    #[tokio::test]
    async fn duplicate_project_name_is_a_validation_error() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();

        let owner = Uuid::new_v4();
        create_project(&pool, "Acme", "https://acme.test", None, owner)
            .await
            .expect("first create");
        let err = create_project(&pool, "Acme", "https://acme.test", None, owner)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("already exists")));
    }
}
