//! Logout support. JWTs are stateless, so a logged-out token stays valid until
//! `exp` unless its `jti` is recorded here.

use async_trait::async_trait;
use redis::Client as RedisClient;
use uuid::Uuid;

use crate::errors::AppError;

/// Carried in `AppState` as `Arc<dyn RevocationStore>`.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Marks `jti` revoked for `ttl_secs` (the token's remaining lifetime).
    async fn revoke(&self, jti: Uuid, ttl_secs: u64) -> Result<(), AppError>;

    async fn is_revoked(&self, jti: Uuid) -> Result<bool, AppError>;
}

/// Redis-backed store: one `revoked:{jti}` key per logged-out token, expiring
/// together with the token itself.
pub struct RedisRevocationStore {
    client: RedisClient,
}

impl RedisRevocationStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

fn revocation_key(jti: Uuid) -> String {
    format!("revoked:{jti}")
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, jti: Uuid, ttl_secs: u64) -> Result<(), AppError> {
        if ttl_secs == 0 {
            return Ok(()); // already expired
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(revocation_key(jti))
            .arg(1)
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn is_revoked(&self, jti: Uuid) -> Result<bool, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let exists: bool = redis::cmd("EXISTS")
            .arg(revocation_key(jti))
            .query_async(&mut conn)
            .await?;
        Ok(exists)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let jti = Uuid::nil();
        assert_eq!(
            revocation_key(jti),
            "revoked:00000000-0000-0000-0000-000000000000"
        );
    }
}
