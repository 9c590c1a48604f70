//! Explicit session context. Handlers that need an owner id take an
//! `AuthUser` argument; there is no ambient "current user".

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::auth::revocation::RevocationStore;
use crate::auth::token::{verify_token, Claims};
use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;

pub const AUTH_COOKIE: &str = "auth-token";

/// The authenticated caller, resolved from the `auth-token` cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub claims: Claims,
}

/// Cookie present, signature and expiry valid, and not logged out.
pub async fn resolve_session(
    jar: &CookieJar,
    secret: &str,
    revocations: &dyn RevocationStore,
) -> Result<AuthUser, AppError> {
    let token = jar
        .get(AUTH_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = verify_token(secret, token)?;

    if revocations.is_revoked(claims.jti).await? {
        tracing::warn!("revoked token presented for user {}", claims.sub);
        return Err(AppError::Unauthorized);
    }

    Ok(AuthUser {
        user_id: claims.sub,
        claims,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let jar = CookieJar::from_headers(&parts.headers);
        resolve_session(&jar, &state.config.jwt_secret, state.revocations.as_ref()).await
    }
}

/// HttpOnly, SameSite=Lax, lifetime matching the token; `Secure` in production.
pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.is_production())
        .max_age(time::Duration::days(config.token_ttl_days))
        .build()
}

pub fn cleared_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, "")).path("/").build()
}
