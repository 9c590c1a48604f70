use axum::{extract::State, Json};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use tracing::info;

use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::models::user::{self, PublicUser, UserRow};
use crate::profile::settings::UserSettings;
use crate::state::AppState;

/// Editable profile fields. Absent fields are left untouched; an empty string
/// clears an optional field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub university: Option<String>,
    pub branch: Option<String>,
    pub graduation_year: Option<i32>,
}

impl ProfileUpdate {
    pub fn apply(self, row: &mut UserRow) -> Result<(), AppError> {
        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Name cannot be empty".to_string()));
            }
            row.name = name.to_string();
        }
        if let Some(year) = self.graduation_year {
            let current = Utc::now().year();
            if !(1950..=current + 10).contains(&year) {
                return Err(AppError::Validation(format!(
                    "Graduation year {year} is out of range"
                )));
            }
            row.graduation_year = Some(year);
        }
        set_optional(&mut row.bio, self.bio);
        set_optional(&mut row.phone, self.phone);
        set_optional(&mut row.university, self.university);
        set_optional(&mut row.branch, self.branch);
        Ok(())
    }
}

fn set_optional(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        let value = value.trim();
        *field = (!value.is_empty()).then(|| value.to_string());
    }
}

async fn current_user(state: &AppState, auth: &AuthUser) -> Result<UserRow, AppError> {
    user::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    Ok(Json(current_user(&state, &auth).await?.into()))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<PublicUser>, AppError> {
    let mut row = current_user(&state, &auth).await?;
    update.apply(&mut row)?;

    let row: UserRow = sqlx::query_as(
        r#"
        UPDATE users
        SET name = $1, bio = $2, phone = $3, university = $4, branch = $5, graduation_year = $6
        WHERE id = $7
        RETURNING *
        "#,
    )
    .bind(&row.name)
    .bind(&row.bio)
    .bind(&row.phone)
    .bind(&row.university)
    .bind(&row.branch)
    .bind(row.graduation_year)
    .bind(auth.user_id)
    .fetch_one(&state.db)
    .await?;

    info!("Updated profile for user {}", auth.user_id);
    Ok(Json(row.into()))
}

#[derive(Debug, FromRow)]
struct SettingsRow {
    body: Value,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    #[serde(flatten)]
    pub settings: UserSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// GET /api/v1/settings
/// Users who never saved settings get the defaults.
pub async fn handle_get_settings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SettingsResponse>, AppError> {
    let row: Option<SettingsRow> =
        sqlx::query_as("SELECT body, updated_at FROM user_settings WHERE user_id = $1")
            .bind(auth.user_id)
            .fetch_optional(&state.db)
            .await?;

    let response = match row {
        Some(row) => SettingsResponse {
            settings: serde_json::from_value(row.body)?,
            updated_at: Some(row.updated_at),
        },
        None => SettingsResponse {
            settings: UserSettings::default(),
            updated_at: None,
        },
    };
    Ok(Json(response))
}

/// PUT /api/v1/settings
pub async fn handle_update_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings: UserSettings = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid settings: {e}")))?;

    let row: SettingsRow = sqlx::query_as(
        r#"
        INSERT INTO user_settings (user_id, body, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (user_id) DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()
        RETURNING body, updated_at
        "#,
    )
    .bind(auth.user_id)
    .bind(serde_json::to_value(&settings)?)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(SettingsResponse {
        settings,
        updated_at: Some(row.updated_at),
    }))
}
