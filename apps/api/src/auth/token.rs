use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Claims carried by the `auth-token` cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Owner id every tracked record is scoped by.
    pub sub: Uuid,
    pub email: String,
    /// Token id, used for revocation on logout.
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Seconds until expiry, never negative.
    pub fn remaining_secs(&self) -> u64 {
        (self.exp - Utc::now().timestamp()).max(0) as u64
    }
}

/// Signs an HS256 token for `user_id` valid for `ttl_days`.
pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    email: &str,
    ttl_days: i64,
) -> Result<(String, Claims), AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        jti: Uuid::new_v4(),
        iat: now.timestamp(),
        exp: (now + Duration::days(ttl_days)).timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("token signing failed: {e}")))?;

    Ok((token, claims))
}

/// Verifies signature and expiry. Any failure is reported as `Unauthorized`.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("rejected session token: {e}");
        AppError::Unauthorized
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issued_token_verifies() {
        let user_id = Uuid::new_v4();
        let (token, claims) = issue_token(SECRET, user_id, "a@b.dev", 7).unwrap();
        let decoded = verify_token(SECRET, &token).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.sub, user_id);
    }

    #[test]
    fn test_expiry_is_seven_days() {
        let (_, claims) = issue_token(SECRET, Uuid::new_v4(), "a@b.dev", 7).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert!(claims.remaining_secs() > 6 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = issue_token(SECRET, Uuid::new_v4(), "a@b.dev", 7).unwrap();
        assert!(matches!(
            verify_token("other", &token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let (token, _) = issue_token(SECRET, Uuid::new_v4(), "a@b.dev", -1).unwrap();
        assert!(matches!(
            verify_token(SECRET, &token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verify_token(SECRET, "not-a-jwt").is_err());
    }
}
