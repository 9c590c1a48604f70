use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use bytes::BytesMut;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::ats::file_size::format_file_size;
use crate::ats::scorer::{AtsAnalysis, AtsPreset, AtsScorer};
use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::extract::Path;
use crate::resumes::models::{Resume, ResumeStatus, ResumeType};
use crate::state::AppState;
use crate::storage;
use crate::tracker::collection::{Collection, Document};
use crate::tracker::handlers::{load_all, load_one, save_existing};
use crate::tracker::stats::round1;
use crate::tracker::store;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const ACCEPTED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// GET /api/v1/resumes/:id/ats
/// Fresh analysis with the check rules; the stored snapshot is left as is.
pub async fn handle_ats_check(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AtsAnalysis>, AppError> {
    let doc = load_one::<Resume>(&state, auth.user_id, id).await?;
    let analysis = AtsScorer::with_preset(AtsPreset::Check).analyze(&doc.body.check_input());
    Ok(Json(analysis))
}

struct Upload {
    file_name: String,
    content_type: String,
    data: bytes::Bytes,
}

const MSG_TOO_LARGE: &str = "Please upload a file smaller than 5MB";

fn multipart_error(e: MultipartError) -> AppError {
    // body limit hits surface as multipart errors carrying 413
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(MSG_TOO_LARGE.to_string())
    } else {
        AppError::Validation(format!("Malformed upload: {e}"))
    }
}

/// Reads the `file` field, giving up as soon as it grows past `MAX_UPLOAD_BYTES`.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::PayloadTooLarge(MSG_TOO_LARGE.to_string()));
            }
            data.extend_from_slice(&chunk);
        }
        return Ok(Upload {
            file_name,
            content_type,
            data: data.freeze(),
        });
    }
    Err(AppError::Validation("Please upload a resume file.".to_string()))
}

fn validate_upload(upload: &Upload) -> Result<(), AppError> {
    if !ACCEPTED_CONTENT_TYPES.contains(&upload.content_type.as_str()) {
        return Err(AppError::Validation(
            "Please upload a PDF or Word document (.pdf, .doc, .docx)".to_string(),
        ));
    }
    if upload.data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(MSG_TOO_LARGE.to_string()));
    }
    Ok(())
}

/// POST /api/v1/resumes/:id/file
/// Stores the file, records its metadata and persists a check-rules analysis.
pub async fn handle_upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Document<Resume>>, AppError> {
    let mut resume = load_one::<Resume>(&state, auth.user_id, id).await?.body;

    let upload = read_upload(multipart).await?;
    validate_upload(&upload)?;

    let key = storage::resume_key(auth.user_id, id, &upload.file_name);
    let file_size = format_file_size(upload.data.len() as u64);
    storage::put_file(
        &state.s3,
        &state.config.s3_bucket,
        &key,
        &upload.content_type,
        upload.data,
    )
    .await?;

    resume.file_name = Some(upload.file_name);
    resume.content_type = Some(upload.content_type);
    resume.storage_key = Some(key);
    resume.file_size = file_size;
    resume.touch(Utc::now().date_naive());
    resume.refresh_ats();

    let doc = save_existing(&state, auth.user_id, id, &resume).await?;
    info!(
        "Resume {id} uploaded ({}), ATS score {}",
        doc.body.file_size,
        doc.body.ats_score.unwrap_or_default()
    );
    Ok(Json(doc))
}

/// GET /api/v1/resumes/:id/file
pub async fn handle_download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let resume = load_one::<Resume>(&state, auth.user_id, id).await?.body;
    let key = resume
        .storage_key
        .as_deref()
        .ok_or_else(|| AppError::NotFound(format!("No file uploaded for resume {id}")))?;

    let data = storage::get_file(&state.s3, &state.config.s3_bucket, key).await?;
    store::increment_field(&state.db, Resume::NAME, auth.user_id, id, "downloadCount").await?;

    let file_name = storage::sanitize_file_name(resume.file_name.as_deref().unwrap_or("resume"));
    Response::builder()
        .header(
            header::CONTENT_TYPE,
            resume
                .content_type
                .as_deref()
                .unwrap_or("application/octet-stream"),
        )
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(e.into()))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeStats {
    pub total: usize,
    pub active: usize,
    pub draft: usize,
    pub archived: usize,
    pub master: usize,
    pub tailored: usize,
    pub template: usize,
    pub avg_rating: f64,
    pub avg_ats_score: f64,
}

pub fn resume_stats<'a>(resumes: impl IntoIterator<Item = &'a Resume>) -> ResumeStats {
    let resumes: Vec<&Resume> = resumes.into_iter().collect();
    let with_status = |s: ResumeStatus| resumes.iter().filter(|r| r.status == s).count();
    let with_type = |t: ResumeType| resumes.iter().filter(|r| r.kind == t).count();
    let mean = |sum: f64| {
        if resumes.is_empty() {
            0.0
        } else {
            round1(sum / resumes.len() as f64)
        }
    };

    ResumeStats {
        total: resumes.len(),
        active: with_status(ResumeStatus::Active),
        draft: with_status(ResumeStatus::Draft),
        archived: with_status(ResumeStatus::Archived),
        master: with_type(ResumeType::Master),
        tailored: with_type(ResumeType::Tailored),
        template: with_type(ResumeType::Template),
        avg_rating: mean(resumes.iter().map(|r| r.rating).sum()),
        avg_ats_score: mean(
            resumes
                .iter()
                .map(|r| r.ats_score.unwrap_or_default() as f64)
                .sum(),
        ),
    }
}

/// GET /api/v1/resumes/stats
pub async fn handle_resume_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ResumeStats>, AppError> {
    let docs = load_all::<Resume>(&state, auth.user_id).await?;
    Ok(Json(resume_stats(docs.iter().map(|d| &d.body))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resumes::models::NewResume;
    use axum::extract::{DefaultBodyLimit, FromRequest};
    use axum::http::Request;
    use chrono::NaiveDate;
    use tower::ServiceExt;

    fn resume(kind: ResumeType, status: ResumeStatus, rating: f64, ats: Option<u32>) -> Resume {
        let mut r = Resume::from_create(
            NewResume {
                title: Some("r".to_string()),
                kind: Some(kind),
                target_role: Some("SDE".to_string()),
                company: None,
                notes: None,
                file_name: None,
            },
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        )
        .unwrap();
        r.status = status;
        r.rating = rating;
        r.ats_score = ats;
        r
    }

    #[test]
    fn test_resume_stats() {
        let resumes = vec![
            resume(ResumeType::Master, ResumeStatus::Active, 4.5, Some(85)),
            resume(ResumeType::Tailored, ResumeStatus::Active, 4.0, Some(92)),
            resume(ResumeType::Tailored, ResumeStatus::Draft, 0.0, None),
        ];
        let stats = resume_stats(&resumes);
        assert_eq!(stats.total, 3);
        assert_eq!((stats.active, stats.draft, stats.archived), (2, 1, 0));
        assert_eq!((stats.master, stats.tailored, stats.template), (1, 2, 0));
        assert_eq!(stats.avg_rating, 2.8); // 8.5 / 3
        assert_eq!(stats.avg_ats_score, 59.0); // 177 / 3
    }

    #[test]
    fn test_empty_resume_stats() {
        let stats = resume_stats(&Vec::<Resume>::new());
        assert_eq!(stats.avg_rating, 0.0);
        assert_eq!(stats.avg_ats_score, 0.0);
    }

    fn upload(content_type: &str, len: usize) -> Upload {
        Upload {
            file_name: "cv.pdf".to_string(),
            content_type: content_type.to_string(),
            data: bytes::Bytes::from(vec![0u8; len]),
        }
    }

    fn multipart_request(file_len: usize) -> Request<Body> {
        let boundary = "resume-boundary";
        let mut body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend(std::iter::repeat(b'a').take(file_len));
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::post("/api/v1/resumes/x/file")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn upload_from(req: Request<Body>) -> Result<Upload, AppError> {
        let multipart = Multipart::from_request(req, &()).await.unwrap();
        read_upload(multipart).await
    }

    #[tokio::test]
    async fn test_read_small_upload() {
        let upload = upload_from(multipart_request(2048)).await.unwrap();
        assert_eq!(upload.file_name, "cv.pdf");
        assert_eq!(upload.content_type, "application/pdf");
        assert_eq!(upload.data.len(), 2048);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_payload_too_large() {
        // just over the cap, and far beyond any body limit
        for len in [MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES * 3] {
            let result = upload_from(multipart_request(len)).await;
            assert!(
                matches!(result, Err(AppError::PayloadTooLarge(_))),
                "{len} bytes"
            );
        }
    }

    #[tokio::test]
    async fn test_body_limit_maps_to_payload_too_large() {
        let req = multipart_request(MAX_UPLOAD_BYTES * 3);
        let app = axum::Router::new()
            .route(
                "/api/v1/resumes/x/file",
                axum::routing::post(|multipart: Multipart| async move {
                    read_upload(multipart).await.map(|u| u.data.len().to_string())
                }),
            )
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES * 2));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_upload_validation() {
        assert!(validate_upload(&upload("application/pdf", 1024)).is_ok());
        assert!(matches!(
            validate_upload(&upload("image/png", 1024)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_upload(&upload("application/msword", MAX_UPLOAD_BYTES + 1)),
            Err(AppError::PayloadTooLarge(_))
        ));
    }
}
