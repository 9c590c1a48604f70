pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ats::handlers::handle_analyze;
use crate::auth::handlers as auth;
use crate::profile::handlers as profile;
use crate::resumes::handlers::{self as resumes, MAX_UPLOAD_BYTES};
use crate::resumes::models::Resume;
use crate::rewards::handlers as rewards;
use crate::state::AppState;
use crate::tracker::collection::Collection;
use crate::tracker::handlers::{create, delete, get_one, list, update};
use crate::tracker::models::{
    AptitudeTest, CodingProblem, Goal, Interview, JobApplication, Resource,
};
use crate::tracker::stats;

/// CRUD routes for one collection: `{base}` and `{base}/:id`.
fn collection_routes<C: Collection>(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(base, get(list::<C>).post(create::<C>))
        .route(
            &format!("{base}/:id"),
            get(get_one::<C>).put(update::<C>).delete(delete::<C>),
        )
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        // Stats (static segments win over `/:id`)
        .route("/api/v1/coding/stats", get(stats::handle_coding_stats))
        .route("/api/v1/aptitude/stats", get(stats::handle_aptitude_stats))
        .route("/api/v1/resumes/stats", get(resumes::handle_resume_stats))
        // Resumes
        .route("/api/v1/resumes/:id/ats", get(resumes::handle_ats_check))
        .route(
            "/api/v1/resumes/:id/file",
            get(resumes::handle_download)
                .post(resumes::handle_upload)
                // headroom so oversized files reach the 413 check instead of a read error
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES * 2)),
        )
        .route("/api/v1/ats/analyze", post(handle_analyze))
        // Profile & settings
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        .route(
            "/api/v1/settings",
            get(profile::handle_get_settings).put(profile::handle_update_settings),
        )
        // Rewards
        .route("/api/v1/rewards", get(rewards::handle_overview))
        .route("/api/v1/rewards/points", post(rewards::handle_add_points))
        .route("/api/v1/rewards/streak", post(rewards::handle_bump_streak))
        .route(
            "/api/v1/rewards/claim/:reward_id",
            post(rewards::handle_claim),
        );

    router = collection_routes::<CodingProblem>(router, "/api/v1/coding");
    router = collection_routes::<JobApplication>(router, "/api/v1/applications");
    router = collection_routes::<Interview>(router, "/api/v1/interviews");
    router = collection_routes::<Goal>(router, "/api/v1/goals");
    router = collection_routes::<AptitudeTest>(router, "/api/v1/aptitude");
    router = collection_routes::<Resume>(router, "/api/v1/resumes");
    router = collection_routes::<Resource>(router, "/api/v1/resources");

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::revocation::memory::MemoryRevocationStore;
    use crate::auth::session::AUTH_COOKIE;
    use crate::auth::token::issue_token;
    use crate::config::Config;

    const SECRET: &str = "router-secret";

    // Nothing here touches Postgres or S3; the lazy pool never connects.
    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/unused".to_string(),
            redis_url: String::new(),
            s3_bucket: "resumes".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            jwt_secret: SECRET.to_string(),
            token_ttl_days: 7,
            app_env: "test".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        };
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .build();
        AppState {
            db,
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            revocations: Arc::new(MemoryRevocationStore::default()),
            config,
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_collections_require_session() {
        for path in [
            "/api/v1/coding",
            "/api/v1/applications",
            "/api/v1/goals",
            "/api/v1/resources",
            "/api/v1/resumes/stats",
            "/api/v1/rewards",
            "/api/v1/settings",
        ] {
            let app = build_router(test_state());
            let response = app
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
            let body = json_body(response).await;
            assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn test_forged_cookie_rejected() {
        let (token, _) = issue_token("other-secret", Uuid::new_v4(), "a@b.dev", 7).unwrap();
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::get("/api/v1/interviews")
                    .header(header::COOKIE, format!("{AUTH_COOKIE}={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_id_gets_json_error() {
        let (token, _) = issue_token(SECRET, Uuid::new_v4(), "a@b.dev", 7).unwrap();
        for path in ["/api/v1/coding/not-a-uuid", "/api/v1/rewards/claim/abc"] {
            let method = if path.contains("claim") { "POST" } else { "GET" };
            let app = build_router(test_state());
            let request = Request::builder()
                .method(method)
                .uri(path)
                .header(header::COOKIE, format!("{AUTH_COOKIE}={token}"))
                .body(Body::empty())
                .unwrap();

            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
            let body = json_body(response).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_analyze_with_session() {
        let (token, _) = issue_token(SECRET, Uuid::new_v4(), "a@b.dev", 7).unwrap();
        let app = build_router(test_state());
        let request = Request::post("/api/v1/ats/analyze")
            .header(header::COOKIE, format!("{AUTH_COOKIE}={token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"text":"A friendly person.","preset":"creation"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["score"], 75);
    }
}
