use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::extract::Path;
use crate::models::user::{self, UserRow};
use crate::rewards::catalog::{
    evaluate_achievements, find_reward, AchievementStatus, Progress, RewardItem, REWARDS,
};
use crate::rewards::POINTS_PER_LEVEL;
use crate::state::AppState;
use crate::tracker::collection::Collection;
use crate::tracker::models::{CodingProblem, Interview, JobApplication};
use crate::tracker::store::count_documents;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsOverview {
    pub points: i32,
    pub level: i32,
    pub streak: i32,
    pub achievements: Vec<AchievementStatus>,
    pub rewards: &'static [RewardItem],
}

#[derive(Debug, Serialize)]
pub struct PointsBalance {
    pub success: bool,
    pub points: i32,
    pub level: i32,
    pub streak: i32,
}

impl From<UserRow> for PointsBalance {
    fn from(row: UserRow) -> Self {
        Self {
            success: true,
            points: row.points,
            level: row.level,
            streak: row.streak,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddPointsRequest {
    pub points: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub success: bool,
    pub reward: &'static RewardItem,
    pub remaining_points: i32,
    pub level: i32,
}

// Both statements keep `level` in step with `points` (see `level_for_points`).
const ADD_POINTS_SQL: &str = r#"
    UPDATE users
    SET points = points + $1, level = (points + $1) / $2 + 1
    WHERE id = $3
    RETURNING *
"#;

const CLAIM_REWARD_SQL: &str = r#"
    UPDATE users
    SET points = points - $1, level = (points - $1) / $3 + 1
    WHERE id = $2 AND points >= $1
    RETURNING *
"#;

/// Returns the shortfall when `balance` cannot cover `cost`.
pub fn shortfall(balance: i32, cost: i32) -> Option<i32> {
    (balance < cost).then(|| cost - balance)
}

async fn current_user(state: &AppState, user_id: Uuid) -> Result<UserRow, AppError> {
    user::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// GET /api/v1/rewards
pub async fn handle_overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<RewardsOverview>, AppError> {
    let row = current_user(&state, auth.user_id).await?;

    let progress = Progress {
        completed_problems: count_documents(
            &state.db,
            CodingProblem::NAME,
            auth.user_id,
            Some("completed"),
        )
        .await?,
        applications: count_documents(&state.db, JobApplication::NAME, auth.user_id, None).await?,
        completed_interviews: count_documents(
            &state.db,
            Interview::NAME,
            auth.user_id,
            Some("completed"),
        )
        .await?,
        streak: i64::from(row.streak),
    };

    Ok(Json(RewardsOverview {
        points: row.points,
        level: row.level,
        streak: row.streak,
        achievements: evaluate_achievements(&progress),
        rewards: REWARDS,
    }))
}

/// POST /api/v1/rewards/points
pub async fn handle_add_points(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AddPointsRequest>,
) -> Result<Json<PointsBalance>, AppError> {
    if req.points <= 0 {
        return Err(AppError::Validation(
            "Points must be a positive number".to_string(),
        ));
    }

    let row: UserRow = sqlx::query_as(ADD_POINTS_SQL)
        .bind(req.points)
        .bind(POINTS_PER_LEVEL)
        .bind(auth.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    info!("User {} earned {} points", auth.user_id, req.points);
    Ok(Json(row.into()))
}

/// POST /api/v1/rewards/streak
pub async fn handle_bump_streak(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PointsBalance>, AppError> {
    let row: UserRow =
        sqlx::query_as("UPDATE users SET streak = streak + 1 WHERE id = $1 RETURNING *")
            .bind(auth.user_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::Unauthorized)?;
    Ok(Json(row.into()))
}

/// POST /api/v1/rewards/claim/:reward_id
pub async fn handle_claim(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(reward_id): Path<u32>,
) -> Result<Json<ClaimResponse>, AppError> {
    let reward = find_reward(reward_id)
        .ok_or_else(|| AppError::NotFound(format!("Reward {reward_id} not found")))?;

    // Conditional update so two concurrent claims cannot overdraw the balance.
    let updated: Option<UserRow> = sqlx::query_as(CLAIM_REWARD_SQL)
        .bind(reward.cost)
        .bind(auth.user_id)
        .bind(POINTS_PER_LEVEL)
        .fetch_optional(&state.db)
        .await?;

    let row = match updated {
        Some(row) => row,
        None => {
            let row = current_user(&state, auth.user_id).await?;
            let missing = shortfall(row.points, reward.cost).unwrap_or(0);
            return Err(AppError::UnprocessableEntity(format!(
                "You need {missing} more points"
            )));
        }
    };

    info!("User {} claimed reward {}", auth.user_id, reward.id);
    Ok(Json(ClaimResponse {
        success: true,
        reward,
        remaining_points: row.points,
        level: row.level,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall() {
        assert_eq!(shortfall(100, 500), Some(400));
        assert_eq!(shortfall(500, 500), None);
        assert_eq!(shortfall(900, 150), None);
    }

    /// Evaluates a `level = (points <op> $1) / $n + 1` clause the way Postgres
    /// integer division would, for a user holding `points`.
    fn level_after(points: i32, delta: i32) -> i32 {
        (points + delta) / POINTS_PER_LEVEL + 1
    }

    #[test]
    fn test_claim_drops_level_with_points() {
        // level 2 at 600 points; the 500-point course leaves 100 points at level 1
        let course = find_reward(2).unwrap();
        assert_eq!(crate::rewards::level_for_points(600), 2);
        assert_eq!(shortfall(600, course.cost), None);
        assert_eq!(level_after(600, -course.cost), 1);
        assert_eq!(
            level_after(600, -course.cost),
            crate::rewards::level_for_points(600 - course.cost)
        );
        assert_eq!(level_after(1000, -course.cost), 2);
    }

    #[test]
    fn test_balance_updates_recompute_level() {
        for sql in [ADD_POINTS_SQL, CLAIM_REWARD_SQL] {
            assert!(sql.contains("level = (points"), "{sql}");
        }
        assert!(CLAIM_REWARD_SQL.contains("level = (points - $1) / $3 + 1"));
        assert!(CLAIM_REWARD_SQL.contains("points >= $1"));
    }

    #[test]
    fn test_add_points_request_shape() {
        let req: AddPointsRequest = serde_json::from_str(r#"{"points":25}"#).unwrap();
        assert_eq!(req.points, 25);
    }
}
