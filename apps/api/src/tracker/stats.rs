use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;
use crate::tracker::handlers::load_all;
use crate::tracker::models::{
    AptitudeCategory, AptitudeStatus, AptitudeTest, CodingProblem, Difficulty, ProblemStatus,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodingStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub todo: usize,
    /// Completed problems per difficulty.
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    pub total_time: u64,
    pub completion_rate: f64,
}

pub fn coding_stats<'a>(problems: impl IntoIterator<Item = &'a CodingProblem>) -> CodingStats {
    let problems: Vec<&CodingProblem> = problems.into_iter().collect();
    let with_status = |s: ProblemStatus| problems.iter().filter(|p| p.status == s).count();
    let solved = |d: Difficulty| {
        problems
            .iter()
            .filter(|p| p.difficulty == d && p.status == ProblemStatus::Completed)
            .count()
    };

    let total = problems.len();
    let completed = with_status(ProblemStatus::Completed);
    CodingStats {
        total,
        completed,
        in_progress: with_status(ProblemStatus::InProgress),
        todo: with_status(ProblemStatus::Todo),
        easy: solved(Difficulty::Easy),
        medium: solved(Difficulty::Medium),
        hard: solved(Difficulty::Hard),
        total_time: problems
            .iter()
            .filter_map(|p| p.time_spent)
            .map(u64::from)
            .sum(),
        completion_rate: rate(completed, total),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AptitudeStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub planned: usize,
    /// Rounded mean score over completed tests.
    pub avg_score: u32,
    pub total_time: u64,
    /// Completed tests per category.
    pub quantitative: usize,
    pub logical: usize,
    pub verbal: usize,
    pub general: usize,
    pub completion_rate: f64,
}

pub fn aptitude_stats<'a>(tests: impl IntoIterator<Item = &'a AptitudeTest>) -> AptitudeStats {
    let tests: Vec<&AptitudeTest> = tests.into_iter().collect();
    let completed: Vec<&&AptitudeTest> = tests
        .iter()
        .filter(|t| t.status == AptitudeStatus::Completed)
        .collect();
    let by_category =
        |c: AptitudeCategory| completed.iter().filter(|t| t.category == c).count();

    let avg_score = if completed.is_empty() {
        0
    } else {
        let sum: u64 = completed.iter().map(|t| u64::from(t.score)).sum();
        (sum as f64 / completed.len() as f64).round() as u32
    };

    AptitudeStats {
        total: tests.len(),
        completed: completed.len(),
        in_progress: tests
            .iter()
            .filter(|t| t.status == AptitudeStatus::InProgress)
            .count(),
        planned: tests
            .iter()
            .filter(|t| t.status == AptitudeStatus::Planned)
            .count(),
        avg_score,
        total_time: tests.iter().map(|t| u64::from(t.time_spent)).sum(),
        quantitative: by_category(AptitudeCategory::Quantitative),
        logical: by_category(AptitudeCategory::Logical),
        verbal: by_category(AptitudeCategory::Verbal),
        general: by_category(AptitudeCategory::General),
        completion_rate: rate(completed.len(), tests.len()),
    }
}

/// Percentage of `part` in `whole`; zero for an empty collection.
pub fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Rounds to one decimal place, as the dashboard averages are shown.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// GET /api/v1/coding/stats
pub async fn handle_coding_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CodingStats>, AppError> {
    let docs = load_all::<CodingProblem>(&state, auth.user_id).await?;
    Ok(Json(coding_stats(docs.iter().map(|d| &d.body))))
}

/// GET /api/v1/aptitude/stats
pub async fn handle_aptitude_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AptitudeStats>, AppError> {
    let docs = load_all::<AptitudeTest>(&state, auth.user_id).await?;
    Ok(Json(aptitude_stats(docs.iter().map(|d| &d.body))))
}
