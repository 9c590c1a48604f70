use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub points: i32,
    pub level: i32,
    pub streak: i32,
    pub join_date: NaiveDate,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub university: Option<String>,
    pub branch: Option<String>,
    pub graduation_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// What clients see of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub points: i32,
    pub level: i32,
    pub streak: i32,
    pub join_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
}

impl From<UserRow> for PublicUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            points: row.points,
            level: row.level,
            streak: row.streak,
            join_date: row.join_date,
            bio: row.bio,
            phone: row.phone,
            university: row.university,
            branch: row.branch,
            graduation_year: row.graduation_year,
        }
    }
}

pub async fn find_by_id(pool: &sqlx::PgPool, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(
    pool: &sqlx::PgPool,
    email: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}
