//! Owner-scoped document storage. Every query is filtered by
//! `(collection, user_id)`; a record owned by someone else behaves as absent.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub collection: String,
    pub user_id: Uuid,
    pub body: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List ordering. Field names are compile-time constants, never user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    CreatedDesc,
    FieldDesc(&'static str),
    FieldAsc(&'static str),
}

impl SortOrder {
    fn order_by(&self) -> String {
        match self {
            SortOrder::CreatedDesc => "created_at DESC".to_string(),
            SortOrder::FieldDesc(field) => {
                format!("body->>'{field}' DESC NULLS LAST, created_at DESC")
            }
            SortOrder::FieldAsc(field) => {
                format!("body->>'{field}' ASC NULLS LAST, created_at DESC")
            }
        }
    }
}

pub async fn list_documents(
    pool: &PgPool,
    collection: &str,
    user_id: Uuid,
    order: SortOrder,
) -> Result<Vec<DocumentRow>, sqlx::Error> {
    let sql = format!(
        "SELECT * FROM documents WHERE collection = $1 AND user_id = $2 ORDER BY {}",
        order.order_by()
    );
    sqlx::query_as(&sql)
        .bind(collection)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn get_document(
    pool: &PgPool,
    collection: &str,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<DocumentRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM documents WHERE id = $1 AND collection = $2 AND user_id = $3")
        .bind(id)
        .bind(collection)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_document(
    pool: &PgPool,
    collection: &str,
    user_id: Uuid,
    body: &Value,
) -> Result<DocumentRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO documents (id, collection, user_id, body)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(collection)
    .bind(user_id)
    .bind(body)
    .fetch_one(pool)
    .await
}

/// Replaces the stored body. Callers merge patches before writing.
pub async fn update_document(
    pool: &PgPool,
    collection: &str,
    user_id: Uuid,
    id: Uuid,
    body: &Value,
) -> Result<Option<DocumentRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE documents
        SET body = $1, updated_at = now()
        WHERE id = $2 AND collection = $3 AND user_id = $4
        RETURNING *
        "#,
    )
    .bind(body)
    .bind(id)
    .bind(collection)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Adds one to a numeric body field, treating a missing field as zero.
pub async fn increment_field(
    pool: &PgPool,
    collection: &str,
    user_id: Uuid,
    id: Uuid,
    field: &'static str,
) -> Result<Option<DocumentRow>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE documents
        SET body = jsonb_set(body, '{{{field}}}', to_jsonb(COALESCE((body->>'{field}')::int, 0) + 1))
        WHERE id = $1 AND collection = $2 AND user_id = $3
        RETURNING *
        "#
    );
    sqlx::query_as(&sql)
        .bind(id)
        .bind(collection)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Returns `true` when a row was removed.
pub async fn delete_document(
    pool: &PgPool,
    collection: &str,
    user_id: Uuid,
    id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM documents WHERE id = $1 AND collection = $2 AND user_id = $3")
            .bind(id)
            .bind(collection)
            .bind(user_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

/// Counts records, optionally only those whose body `status` matches.
pub async fn count_documents(
    pool: &PgPool,
    collection: &str,
    user_id: Uuid,
    status: Option<&str>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM documents
        WHERE collection = $1 AND user_id = $2
          AND ($3::text IS NULL OR body->>'status' = $3)
        "#,
    )
    .bind(collection)
    .bind(user_id)
    .bind(status)
    .fetch_one(pool)
    .await
}
