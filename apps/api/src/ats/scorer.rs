//! ATS heuristic scorer: rule-based compatibility check over resume notes.
//!
//! Scoring starts at 100 and each failed check subtracts a fixed penalty.
//! The two historical rule sets (resume creation vs. the on-demand "ATS Check")
//! are expressed as presets of one configurable `AtsScorer`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ats::file_size::leading_integer;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtsIssue {
    #[serde(rename = "type")]
    pub severity: IssueSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormattingFlags {
    pub has_simple_formatting: bool,
    pub has_standard_sections: bool,
    pub has_contact_info: bool,
    pub has_metrics: bool,
}

/// Full analysis returned to callers and persisted alongside a resume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtsAnalysis {
    pub score: u32, // 0 – 100
    pub issues: Vec<AtsIssue>,
    pub suggestions: Vec<String>,
    pub keywords: Vec<String>,
    pub formatting: FormattingFlags,
}

/// Per-call input. `text` of `None` is scored as empty text.
#[derive(Debug, Clone, Default)]
pub struct ScoreInput<'a> {
    pub text: Option<&'a str>,
    pub declared_file_size: Option<&'a str>,
    pub has_attachment: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AtsPreset {
    /// Snapshot taken when a resume record is created.
    Creation,
    /// Recomputation shown in the "ATS Check" view.
    #[default]
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionVerbHint {
    Short,
    WithExamples,
}

/// Toggles for the checks that differ between the creation and check rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtsRules {
    pub attachment_counts_as_contact: bool,
    pub tag_contact_info: bool,
    pub penalize_missing_tech: bool,
    pub check_file_size: bool,
    pub check_summary: bool,
    pub action_verb_hint: ActionVerbHint,
}

impl AtsRules {
    pub fn creation() -> Self {
        Self {
            attachment_counts_as_contact: false,
            tag_contact_info: false,
            penalize_missing_tech: false,
            check_file_size: false,
            check_summary: false,
            action_verb_hint: ActionVerbHint::Short,
        }
    }

    pub fn check() -> Self {
        Self {
            attachment_counts_as_contact: true,
            tag_contact_info: true,
            penalize_missing_tech: true,
            check_file_size: true,
            check_summary: true,
            action_verb_hint: ActionVerbHint::WithExamples,
        }
    }
}

impl From<AtsPreset> for AtsRules {
    fn from(preset: AtsPreset) -> Self {
        match preset {
            AtsPreset::Creation => AtsRules::creation(),
            AtsPreset::Check => AtsRules::check(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Vocabulary and penalties
// ────────────────────────────────────────────────────────────────────────────

const MISSING_CONTACT_PENALTY: u32 = 15;
const MISSING_METRICS_PENALTY: u32 = 10;
const MISSING_SECTIONS_PENALTY: u32 = 10;
const MISSING_TECH_PENALTY: u32 = 5;
const MISSING_VERBS_PENALTY: u32 = 5;
const LARGE_FILE_PENALTY: u32 = 5;
const MISSING_SUMMARY_PENALTY: u32 = 3;

/// Declared sizes whose leading number exceeds this are treated as large (KB).
const LARGE_FILE_THRESHOLD: i64 = 1000;

const STANDARD_SECTIONS: &[&str] = &["experience", "education", "skills", "projects"];

const TECH_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "react",
    "nodejs",
    "sql",
    "api",
    "aws",
    "git",
    "agile",
];

const ACTION_VERBS: &[&str] = &[
    "developed",
    "implemented",
    "designed",
    "led",
    "managed",
    "optimized",
    "engineered",
    "created",
    "built",
];

// ASCII classes only: `\d` is 0-9 and `\b` looks at ASCII word characters.
static METRICS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)\b\d+%|\$\d+|\d+x|improved|increased|decreased|reduced")
        .expect("valid metrics regex")
});

pub const MSG_MISSING_CONTACT: &str = "Missing contact information section";
pub const MSG_ADD_METRICS: &str =
    "Add quantifiable metrics and achievements (e.g., 'Improved performance by 40%')";
pub const MSG_ADD_SECTIONS: &str =
    "Ensure resume includes standard sections: Experience, Education, Skills, Projects";
pub const MSG_ADD_TECH: &str =
    "Add relevant technical keywords based on job description (Python, Java, React, AWS, etc.)";
pub const MSG_ACTION_VERBS: &str = "Use strong action verbs at the beginning of bullet points";
pub const MSG_LARGE_FILE: &str =
    "File size is large - keep resume under 1 MB for better ATS parsing";
pub const MSG_ADD_SUMMARY: &str = "Consider adding a Professional Summary or Objective section";

// ────────────────────────────────────────────────────────────────────────────
// Scorer
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic, side-effect free. Safe to share across request handlers.
#[derive(Debug, Clone, Copy)]
pub struct AtsScorer {
    rules: AtsRules,
}

impl AtsScorer {
    pub fn new(rules: AtsRules) -> Self {
        Self { rules }
    }

    pub fn with_preset(preset: AtsPreset) -> Self {
        Self::new(preset.into())
    }

    pub fn rules(&self) -> &AtsRules {
        &self.rules
    }

    pub fn analyze(&self, input: &ScoreInput<'_>) -> AtsAnalysis {
        let rules = &self.rules;
        let raw = input.text.unwrap_or_default();
        let text = raw.to_lowercase();

        let mut issues = Vec::new();
        let mut suggestions = Vec::new();
        let mut keywords: Vec<String> = Vec::new();
        let mut penalty: u32 = 0;

        // 1. Contact information
        let has_contact_info =
            !raw.is_empty() || (rules.attachment_counts_as_contact && input.has_attachment);
        if !has_contact_info {
            issues.push(AtsIssue {
                severity: IssueSeverity::Error,
                message: MSG_MISSING_CONTACT.to_string(),
            });
            penalty += MISSING_CONTACT_PENALTY;
        } else if rules.tag_contact_info {
            keywords.push("contact_info".to_string());
        }

        // 2. Quantified achievements
        let has_metrics = METRICS_RE.is_match(&text);
        if has_metrics {
            keywords.push("metrics".to_string());
        } else {
            suggestions.push(MSG_ADD_METRICS.to_string());
            penalty += MISSING_METRICS_PENALTY;
        }

        // 3. Standard sections
        let has_standard_sections = STANDARD_SECTIONS.iter().any(|s| text.contains(s));
        if has_standard_sections {
            keywords.push("standard_sections".to_string());
        } else {
            suggestions.push(MSG_ADD_SECTIONS.to_string());
            penalty += MISSING_SECTIONS_PENALTY;
        }

        // 4. Technical vocabulary (substring match, so "java" also hits "javascript")
        let found_tech: Vec<&str> = TECH_KEYWORDS
            .iter()
            .copied()
            .filter(|kw| text.contains(kw))
            .collect();
        if found_tech.is_empty() && rules.penalize_missing_tech {
            suggestions.push(MSG_ADD_TECH.to_string());
            penalty += MISSING_TECH_PENALTY;
        }
        keywords.extend(found_tech.into_iter().map(str::to_string));

        // 5. Action verbs
        if !ACTION_VERBS.iter().any(|v| text.contains(v)) {
            let hint = match rules.action_verb_hint {
                ActionVerbHint::Short => MSG_ACTION_VERBS.to_string(),
                ActionVerbHint::WithExamples => {
                    format!("{MSG_ACTION_VERBS} (Developed, Implemented, Designed, etc.)")
                }
            };
            suggestions.push(hint);
            penalty += MISSING_VERBS_PENALTY;
        }

        // 6. Declared file size
        if rules.check_file_size && is_large_file(input.declared_file_size.unwrap_or_default()) {
            issues.push(AtsIssue {
                severity: IssueSeverity::Warning,
                message: MSG_LARGE_FILE.to_string(),
            });
            penalty += LARGE_FILE_PENALTY;
        }

        // 7. Summary / objective
        if rules.check_summary && !text.contains("objective") && !text.contains("summary") {
            suggestions.push(MSG_ADD_SUMMARY.to_string());
            penalty += MISSING_SUMMARY_PENALTY;
        }

        AtsAnalysis {
            score: 100u32.saturating_sub(penalty).min(100),
            issues,
            suggestions,
            keywords: dedup_preserving_order(keywords),
            formatting: FormattingFlags {
                has_simple_formatting: true,
                has_standard_sections,
                has_contact_info,
                has_metrics,
            },
        }
    }
}

fn is_large_file(declared: &str) -> bool {
    declared.contains("MB")
        || leading_integer(declared).is_some_and(|n| n > LARGE_FILE_THRESHOLD)
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
