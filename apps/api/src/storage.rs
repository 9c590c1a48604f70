use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Object key for an uploaded resume file.
pub fn resume_key(user_id: Uuid, resume_id: Uuid, file_name: &str) -> String {
    format!("resumes/{user_id}/{resume_id}/{}", sanitize_file_name(file_name))
}

/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

pub async fn put_file(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    content_type: &str,
    data: Bytes,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(data))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!("Uploaded resume file to s3://{}/{}", bucket, key);
    Ok(())
}

pub async fn get_file(s3: &aws_sdk_s3::Client, bucket: &str, key: &str) -> Result<Bytes, AppError> {
    let object = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("download of {key} failed: {e}")))?;

    let data = object
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("reading {key} failed: {e}")))?;
    Ok(data.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("My Resume (v2).pdf"), "My_Resume__v2_.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\cv.docx"), "cv.docx");
        assert_eq!(sanitize_file_name(".."), "resume");
        assert_eq!(sanitize_file_name(""), "resume");
    }

    #[test]
    fn test_resume_key_layout() {
        let user = Uuid::nil();
        let resume = Uuid::nil();
        assert_eq!(
            resume_key(user, resume, "cv.pdf"),
            format!("resumes/{user}/{resume}/cv.pdf")
        );
    }
}
