use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::tracker::collection::{require_text, Collection};
use crate::tracker::store::SortOrder;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

// ────────────────────────────────────────────────────────────────────────────
// Coding problems
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingProblem {
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub status: ProblemStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Minutes spent on the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingProblemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProblemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
}

impl Collection for CodingProblem {
    const NAME: &'static str = "coding-problems";
    const ORDER: SortOrder = SortOrder::CreatedDesc;
    type Create = CodingProblem;
    type Patch = CodingProblemPatch;

    fn from_create(input: Self::Create, _today: NaiveDate) -> Result<Self, AppError> {
        Ok(input)
    }

    fn normalize(&mut self) -> Result<(), AppError> {
        require_text(&self.title, "Title is required")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job applications
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Shortlisted,
    Interview,
    Offer,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub applied_date: Option<NaiveDate>,
    pub salary: Option<String>,
    pub link: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Collection for JobApplication {
    const NAME: &'static str = "applications";
    const ORDER: SortOrder = SortOrder::FieldDesc("appliedDate");
    type Create = NewApplication;
    type Patch = JobApplicationPatch;

    fn from_create(input: Self::Create, today: NaiveDate) -> Result<Self, AppError> {
        Ok(JobApplication {
            company: input.company,
            position: input.position,
            status: input.status,
            applied_date: input.applied_date.unwrap_or(today),
            salary: input.salary,
            link: input.link,
            notes: input.notes,
        })
    }

    fn normalize(&mut self) -> Result<(), AppError> {
        require_text(&self.company, "Company is required")?;
        require_text(&self.position, "Position is required")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Interviews
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub company: String,
    pub round: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    /// Free-form kind, e.g. "technical" or "hr".
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: InterviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InterviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Collection for Interview {
    const NAME: &'static str = "interviews";
    const ORDER: SortOrder = SortOrder::FieldDesc("date");
    type Create = Interview;
    type Patch = InterviewPatch;

    fn from_create(input: Self::Create, _today: NaiveDate) -> Result<Self, AppError> {
        Ok(input)
    }

    fn normalize(&mut self) -> Result<(), AppError> {
        require_text(&self.company, "Company is required")?;
        require_text(&self.round, "Round is required")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Goals
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Abandoned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub target: String,
    /// Percent complete, 0 – 100.
    #[serde(default)]
    pub progress: u32,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: GoalStatus,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GoalStatus>,
}

impl Collection for Goal {
    const NAME: &'static str = "goals";
    const ORDER: SortOrder = SortOrder::FieldAsc("dueDate");
    type Create = Goal;
    type Patch = GoalPatch;

    fn from_create(input: Self::Create, _today: NaiveDate) -> Result<Self, AppError> {
        Ok(input)
    }

    fn normalize(&mut self) -> Result<(), AppError> {
        require_text(&self.title, "Title is required")?;
        if self.progress > 100 {
            return Err(AppError::Validation(
                "Progress must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Aptitude tests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AptitudeCategory {
    Quantitative,
    Logical,
    Verbal,
    General,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AptitudeStatus {
    Completed,
    InProgress,
    #[default]
    Planned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AptitudeTest {
    pub title: String,
    pub category: AptitudeCategory,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub correct_answers: u32,
    /// Minutes used.
    #[serde(default)]
    pub time_spent: u32,
    /// Minutes allowed.
    #[serde(default)]
    pub max_time: u32,
    /// Percentage, derived from the answer counts.
    #[serde(default)]
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: AptitudeStatus,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AptitudeTestPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<AptitudeCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AptitudeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Collection for AptitudeTest {
    const NAME: &'static str = "aptitude-tests";
    const ORDER: SortOrder = SortOrder::CreatedDesc;
    type Create = AptitudeTest;
    type Patch = AptitudeTestPatch;

    fn from_create(input: Self::Create, _today: NaiveDate) -> Result<Self, AppError> {
        Ok(input)
    }

    fn normalize(&mut self) -> Result<(), AppError> {
        require_text(&self.title, "Title is required")?;
        if self.correct_answers > self.total_questions {
            return Err(AppError::Validation(
                "Correct answers cannot exceed total questions".to_string(),
            ));
        }
        self.score = percentage(self.correct_answers, self.total_questions);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Saved resources
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub title: String,
    /// Free-form kind, e.g. "article", "video" or "course".
    #[serde(rename = "type", default)]
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_saved: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
}

impl Collection for Resource {
    const NAME: &'static str = "resources";
    const ORDER: SortOrder = SortOrder::CreatedDesc;
    type Create = Resource;
    type Patch = ResourcePatch;

    fn from_create(input: Self::Create, _today: NaiveDate) -> Result<Self, AppError> {
        Ok(input)
    }

    fn normalize(&mut self) -> Result<(), AppError> {
        require_text(&self.title, "Title is required")?;
        require_text(&self.url, "URL is required")?;
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(AppError::Validation(
                "URL must start with http:// or https://".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rounded percentage; zero when the denominator is zero.
pub fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::collection::apply_patch;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_problem_status_wire_format() {
        let problem: CodingProblem = serde_json::from_value(json!({
            "title": "Two Sum",
            "difficulty": "easy",
            "status": "in-progress"
        }))
        .unwrap();
        assert_eq!(problem.status, ProblemStatus::InProgress);
        assert_eq!(problem.platform, "");
        assert!(serde_json::from_value::<CodingProblem>(json!({
            "title": "x", "difficulty": "impossible"
        }))
        .is_err());
    }

    #[test]
    fn test_application_defaults_to_today() {
        let input: NewApplication = serde_json::from_value(json!({
            "company": "Acme",
            "position": "SDE Intern"
        }))
        .unwrap();
        let app = JobApplication::from_create(input, today()).unwrap();
        assert_eq!(app.applied_date, today());
        assert_eq!(app.status, ApplicationStatus::Applied);

        let value = serde_json::to_value(&app).unwrap();
        assert_eq!(value["appliedDate"], "2026-03-14");
    }

    #[test]
    fn test_patch_changes_only_given_fields() {
        let problem = CodingProblem {
            title: "Two Sum".to_string(),
            difficulty: Difficulty::Easy,
            platform: "LeetCode".to_string(),
            status: ProblemStatus::Todo,
            notes: "hash map".to_string(),
            link: None,
            time_spent: None,
        };
        let patch = CodingProblemPatch {
            status: Some(ProblemStatus::Completed),
            ..Default::default()
        };
        let updated = apply_patch(&problem, patch, today()).unwrap();
        assert_eq!(updated.status, ProblemStatus::Completed);
        assert_eq!(updated.notes, "hash map");
        assert_eq!(updated.platform, "LeetCode");
    }

    #[test]
    fn test_patch_cannot_blank_required_field() {
        let app = JobApplication::from_create(
            NewApplication {
                company: "Acme".to_string(),
                position: "SDE".to_string(),
                status: ApplicationStatus::Applied,
                applied_date: None,
                salary: None,
                link: None,
                notes: None,
            },
            today(),
        )
        .unwrap();
        let patch = JobApplicationPatch {
            company: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            apply_patch(&app, patch, today()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_goal_progress_bounded() {
        let mut goal: Goal = serde_json::from_value(json!({
            "title": "Finish DP sheet",
            "dueDate": "2026-05-01",
            "progress": 120
        }))
        .unwrap();
        assert!(goal.normalize().is_err());
        goal.progress = 100;
        assert!(goal.normalize().is_ok());
    }

    #[test]
    fn test_aptitude_score_derived() {
        let mut test: AptitudeTest = serde_json::from_value(json!({
            "title": "Quantitative Aptitude - Basic",
            "category": "quantitative",
            "difficulty": "easy",
            "totalQuestions": 20,
            "correctAnswers": 16,
            "score": 3
        }))
        .unwrap();
        test.normalize().unwrap();
        assert_eq!(test.score, 80);

        test.correct_answers = 21;
        assert!(test.normalize().is_err());
    }

    #[test]
    fn test_interview_kind_serializes_as_type() {
        let interview: Interview = serde_json::from_value(json!({
            "company": "Acme",
            "round": "Technical 1",
            "date": "2026-04-02",
            "type": "technical"
        }))
        .unwrap();
        assert_eq!(interview.kind, "technical");
        assert_eq!(interview.status, InterviewStatus::Scheduled);
        assert_eq!(serde_json::to_value(&interview).unwrap()["type"], "technical");
    }

    #[test]
    fn test_resource_defaults_and_url_check() {
        let mut resource: Resource = serde_json::from_value(json!({
            "title": "Striver SDE Sheet",
            "type": "article",
            "url": "https://takeuforward.org/sde-sheet"
        }))
        .unwrap();
        assert!(!resource.is_saved);
        assert!(resource.normalize().is_ok());

        let patch = ResourcePatch {
            is_saved: Some(true),
            ..Default::default()
        };
        let saved = apply_patch(&resource, patch, today()).unwrap();
        assert!(saved.is_saved);
        assert_eq!(serde_json::to_value(&saved).unwrap()["isSaved"], true);

        resource.url = "javascript:alert(1)".to_string();
        assert!(matches!(resource.normalize(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
    }
}
