use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::core::{
    errors::{AppError, AppResult},
    types::{ContentRecord, ContentStatus, NewContent},
};

fn parse_timestamp(value: String) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|v| v.with_timezone(&Utc))
        .map_err(|err| AppError::Database(format!("invalid timestamp {value}: {err}")))
}

pub async fn list_contents(pool: &SqlitePool) -> AppResult<Vec<ContentRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, description, thumbnail_url, status, notion_url, created_at
        FROM contents
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(map_content).collect()
}

pub async fn find_content(pool: &SqlitePool, id: &str) -> AppResult<Option<ContentRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, description, thumbnail_url, status, notion_url, created_at
        FROM contents
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(map_content).transpose()
}

pub async fn get_content(pool: &SqlitePool, id: &str) -> AppResult<ContentRecord> {
    find_content(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("content {id}")))
}

pub async fn insert_content(
    pool: &SqlitePool,
    id: &str,
    content: &NewContent,
) -> AppResult<ContentRecord> {
    sqlx::query(
        r#"
        INSERT INTO contents (id, title, description, thumbnail_url, status, notion_url)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(id)
    .bind(&content.title)
    .bind(&content.description)
    .bind(&content.thumbnail_url)
    .bind(content.status.as_str())
    .bind(&content.notion_url)
    .execute(pool)
    .await?;
    get_content(pool, id).await
}

pub async fn delete_content(pool: &SqlitePool, id: &str) -> AppResult<bool> {
    let affected = sqlx::query("DELETE FROM contents WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(affected > 0)
}

fn map_content(row: sqlx::sqlite::SqliteRow) -> AppResult<ContentRecord> {
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;
    Ok(ContentRecord {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        thumbnail_url: row.try_get("thumbnail_url")?,
        status: ContentStatus::from_str(&status)
            .ok_or_else(|| AppError::Database(format!("unknown content status {status}")))?,
        notion_url: row.try_get("notion_url")?,
        created_at: parse_timestamp(created_at)?,
    })
}
