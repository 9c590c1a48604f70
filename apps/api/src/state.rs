use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::auth::revocation::RevocationStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Resume file storage (MinIO locally, S3 in production).
    pub s3: S3Client,
    /// Tokens revoked by logout. Redis-backed in the running service.
    pub revocations: Arc<dyn RevocationStore>,
    pub config: Config,
}
