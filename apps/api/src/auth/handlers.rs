use axum::{extract::State, Json};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{cleared_cookie, resolve_session, session_cookie, AuthUser};
use crate::auth::token::issue_token;
use crate::errors::AppError;
use crate::models::user::{self, PublicUser, UserRow};
use crate::rewards::{level_for_points, SIGNUP_POINTS};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: PublicUser,
    pub token: String,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let (Some(name), Some(email), Some(password)) = (
        non_empty(req.name),
        non_empty(req.email).map(|e| e.to_lowercase()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Name, email, and password are required".to_string(),
        ));
    };

    if user::find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(password).await?;

    let row: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, points, level, streak, join_date)
        VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(SIGNUP_POINTS)
    .bind(level_for_points(SIGNUP_POINTS))
    .bind(Utc::now().date_naive())
    .fetch_one(&state.db)
    .await
    .map_err(|e| match e {
        // lost a race with a concurrent signup for the same address
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Email already exists".to_string())
        }
        other => AppError::Database(other),
    })?;

    info!("Registered user {}", row.id);
    start_session(&state, jar, row)
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let (Some(email), Some(password)) = (
        non_empty(req.email).map(|e| e.to_lowercase()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let row = user::find_by_email(&state.db, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, row.password_hash.clone()).await? {
        return Err(AppError::InvalidCredentials);
    }

    info!("User {} logged in", row.id);
    start_session(&state, jar, row)
}

fn start_session(
    state: &AppState,
    jar: CookieJar,
    row: UserRow,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let (token, _) = issue_token(
        &state.config.jwt_secret,
        row.id,
        &row.email,
        state.config.token_ttl_days,
    )?;
    let jar = jar.add(session_cookie(token.clone(), &state.config));

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: row.into(),
            token,
        }),
    ))
}

/// POST /api/v1/auth/logout
/// Clears the cookie; a still-valid token is also revoked until it expires.
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if let Ok(session) =
        resolve_session(&jar, &state.config.jwt_secret, state.revocations.as_ref()).await
    {
        state
            .revocations
            .revoke(session.claims.jti, session.claims.remaining_secs())
            .await?;
        info!("User {} logged out", session.user_id);
    }

    Ok((jar.remove(cleared_cookie()), Json(json!({ "success": true }))))
}

/// GET /api/v1/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let row = user::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(row.into()))
}
