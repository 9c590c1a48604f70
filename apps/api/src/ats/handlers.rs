use axum::Json;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::ats::scorer::{AtsAnalysis, AtsPreset, AtsScorer, ScoreInput};
use crate::auth::session::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Non-string values are scored as empty text.
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub file_size: Option<String>,
    #[serde(default)]
    pub has_attachment: bool,
    #[serde(default)]
    pub preset: AtsPreset,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

pub fn analyze_request(req: &AnalyzeRequest) -> AtsAnalysis {
    AtsScorer::with_preset(req.preset).analyze(&ScoreInput {
        text: req.text.as_deref(),
        declared_file_size: req.file_size.as_deref(),
        has_attachment: req.has_attachment,
    })
}

/// POST /api/v1/ats/analyze
/// Stateless scoring of caller-supplied text; nothing is persisted.
pub async fn handle_analyze(_auth: AuthUser, Json(req): Json<AnalyzeRequest>) -> Json<AtsAnalysis> {
    Json(analyze_request(&req))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_string_text_is_empty() {
        let req: AnalyzeRequest = serde_json::from_value(json!({ "text": 42 })).unwrap();
        assert_eq!(req.text, None);
        assert_eq!(req.preset, AtsPreset::Check);

        let analysis = analyze_request(&req);
        assert!(!analysis.formatting.has_contact_info);
    }

    #[test]
    fn test_preset_selects_rules() {
        let req: AnalyzeRequest = serde_json::from_value(json!({
            "text": "A friendly person.",
            "fileSize": "2.3 MB",
            "preset": "creation"
        }))
        .unwrap();
        let analysis = analyze_request(&req);
        // creation rules ignore file size and summary
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.score, 75);
    }
}
