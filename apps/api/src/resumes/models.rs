use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ats::scorer::{AtsAnalysis, AtsPreset, AtsScorer, ScoreInput};
use crate::errors::AppError;
use crate::tracker::collection::Collection;
use crate::tracker::store::SortOrder;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResumeType {
    Master,
    Tailored,
    Template,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    Active,
    #[default]
    Draft,
    Archived,
}

pub const INITIAL_VERSION: &str = "v1.0";
pub const EMPTY_FILE_SIZE: &str = "0 KB";
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub title: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: ResumeType,
    pub target_role: String,
    #[serde(default)]
    pub company: Option<String>,
    pub last_modified: NaiveDate,
    #[serde(default)]
    pub status: ResumeStatus,
    #[serde(default)]
    pub feedback: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub download_count: u32,
    pub file_size: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ats_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ats_analysis: Option<AtsAnalysis>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResume {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ResumeType>,
    pub target_role: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResumeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResumeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Resume {
    /// Input for the on-demand "ATS Check": notes plus file metadata.
    pub fn check_input(&self) -> ScoreInput<'_> {
        ScoreInput {
            text: Some(self.notes.as_str()),
            declared_file_size: Some(self.file_size.as_str()),
            has_attachment: self.file_name.as_deref().is_some_and(|f| !f.is_empty()),
        }
    }

    /// Recomputes with the check rules and stores the result as the snapshot.
    pub fn refresh_ats(&mut self) {
        let analysis = AtsScorer::with_preset(AtsPreset::Check).analyze(&self.check_input());
        self.ats_score = Some(analysis.score);
        self.ats_analysis = Some(analysis);
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

impl Collection for Resume {
    const NAME: &'static str = "resumes";
    const ORDER: SortOrder = SortOrder::FieldDesc("lastModified");
    type Create = NewResume;
    type Patch = ResumePatch;

    fn from_create(input: Self::Create, today: NaiveDate) -> Result<Self, AppError> {
        let (Some(title), Some(kind), Some(target_role)) =
            (present(input.title), input.kind, present(input.target_role))
        else {
            return Err(AppError::Validation("Missing required fields".to_string()));
        };

        let notes = input.notes.unwrap_or_default();
        let analysis = AtsScorer::with_preset(AtsPreset::Creation).analyze(&ScoreInput {
            text: Some(notes.as_str()),
            ..Default::default()
        });

        Ok(Resume {
            title,
            version: INITIAL_VERSION.to_string(),
            kind,
            target_role,
            company: present(input.company),
            last_modified: today,
            status: ResumeStatus::Draft,
            feedback: Vec::new(),
            rating: 0.0,
            download_count: 0,
            file_size: EMPTY_FILE_SIZE.to_string(),
            notes,
            file_name: present(input.file_name),
            content_type: None,
            storage_key: None,
            ats_score: Some(analysis.score),
            ats_analysis: Some(analysis),
        })
    }

    fn normalize(&mut self) -> Result<(), AppError> {
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(AppError::Validation(format!(
                "Rating must be between 0 and {MAX_RATING}"
            )));
        }
        if self.title.trim().is_empty() || self.target_role.trim().is_empty() {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }
        Ok(())
    }

    fn touch(&mut self, today: NaiveDate) {
        self.last_modified = today;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ats::scorer::MSG_MISSING_CONTACT;
    use crate::tracker::collection::apply_patch;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    fn new_resume(notes: Option<&str>) -> NewResume {
        NewResume {
            title: Some("SDE Resume".to_string()),
            kind: Some(ResumeType::Tailored),
            target_role: Some("Software Engineer".to_string()),
            company: None,
            notes: notes.map(str::to_string),
            file_name: None,
        }
    }

    #[test]
    fn test_missing_required_fields() {
        let mut input = new_resume(None);
        input.target_role = Some("   ".to_string());
        assert!(matches!(
            Resume::from_create(input, today()),
            Err(AppError::Validation(msg)) if msg == "Missing required fields"
        ));

        let mut input = new_resume(None);
        input.kind = None;
        assert!(Resume::from_create(input, today()).is_err());
    }

    #[test]
    fn test_creation_defaults_and_snapshot() {
        let resume = Resume::from_create(new_resume(None), today()).unwrap();
        assert_eq!(resume.version, "v1.0");
        assert_eq!(resume.status, ResumeStatus::Draft);
        assert_eq!(resume.file_size, "0 KB");
        assert_eq!(resume.last_modified, today());
        assert_eq!(resume.download_count, 0);

        let analysis = resume.ats_analysis.as_ref().unwrap();
        assert_eq!(resume.ats_score, Some(analysis.score));
        assert_eq!(analysis.issues[0].message, MSG_MISSING_CONTACT);
    }

    #[test]
    fn test_check_counts_file_as_contact() {
        let mut resume = Resume::from_create(new_resume(None), today()).unwrap();
        resume.file_name = Some("resume.pdf".to_string());
        resume.file_size = "2.1 MB".to_string();
        resume.refresh_ats();

        let analysis = resume.ats_analysis.unwrap();
        assert!(analysis.formatting.has_contact_info);
        assert!(analysis.keywords.contains(&"contact_info".to_string()));
        assert_eq!(analysis.issues.len(), 1); // only the large-file warning
    }

    #[test]
    fn test_update_touches_last_modified_and_keeps_snapshot() {
        let mut resume = Resume::from_create(new_resume(Some("notes")), today()).unwrap();
        resume.last_modified = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let snapshot = resume.ats_score;

        let patch = ResumePatch {
            status: Some(ResumeStatus::Active),
            rating: Some(4.5),
            ..Default::default()
        };
        let updated = apply_patch(&resume, patch, today()).unwrap();
        assert_eq!(updated.status, ResumeStatus::Active);
        assert_eq!(updated.rating, 4.5);
        assert_eq!(updated.last_modified, today());
        assert_eq!(updated.ats_score, snapshot);
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let resume = Resume::from_create(new_resume(None), today()).unwrap();
        let patch = ResumePatch {
            rating: Some(7.0),
            ..Default::default()
        };
        assert!(apply_patch(&resume, patch, today()).is_err());
    }
}
