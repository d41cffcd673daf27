//! Common utilities for the upload handler

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::StatusCode;
use qrdrop_core::constants::{PDF_CONTENT_TYPE, UPLOAD_FIELD_NAME};
use qrdrop_core::AppError;

use crate::services::publish::UploadedFile;

/// Extract the file part named `pdf` from a multipart form.
///
/// Only parts carrying a filename count as files. Plain text fields are
/// ignored, so a form without a `pdf` file yields `Ok(None)`, as does a body
/// that ends before its first part. A file under any other name, or a second
/// `pdf` file, is rejected.
pub async fn extract_pdf_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, AppError> {
    let mut upload: Option<UploadedFile> = None;
    let mut seen_part = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) if !seen_part && err.status() != StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::debug!(error = %err.body_text(), "Multipart body has no parts");
                return Ok(None);
            }
            Err(err) => return Err(multipart_error(err)),
        };
        seen_part = true;

        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name != UPLOAD_FIELD_NAME {
            return Err(AppError::BadRequest(format!(
                "Unexpected file field '{}'; send the document in a field named '{}'.",
                field_name, UPLOAD_FIELD_NAME
            )));
        }
        if upload.is_some() {
            return Err(AppError::BadRequest(format!(
                "Multiple files are not allowed; send exactly one field named '{}'.",
                UPLOAD_FIELD_NAME
            )));
        }

        let content_type = field.content_type().map(|s| s.to_string());
        let data = field.bytes().await.map_err(multipart_error)?;

        upload = Some(UploadedFile {
            data: data.to_vec(),
            filename: Some(filename),
            content_type,
        });
    }

    Ok(upload)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart body: {}", err.body_text()))
    }
}

/// A request the multipart extractor refused (no body, wrong content type,
/// missing boundary) carries no file.
pub fn rejected_multipart(rejection: MultipartRejection) -> Option<UploadedFile> {
    tracing::debug!(error = %rejection.body_text(), "Upload request is not multipart");
    None
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size {} exceeds maximum allowed size of {} bytes",
            file_size, max_size
        )));
    }
    Ok(())
}

/// Normalize MIME type by stripping parameters (e.g. "application/pdf; name=a.pdf" -> "application/pdf").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Accept only a declared `application/pdf`. The bytes themselves are not inspected.
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), AppError> {
    let declared = content_type.unwrap_or_default();
    if normalize_mime_type(declared).eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
        Ok(())
    } else {
        Err(AppError::InvalidFileType(declared.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_accepts_pdf_variants() {
        assert!(validate_content_type(Some("application/pdf")).is_ok());
        assert!(validate_content_type(Some("Application/PDF")).is_ok());
        assert!(validate_content_type(Some("application/pdf; name=report.pdf")).is_ok());
    }

    #[test]
    fn test_content_type_rejects_everything_else() {
        for declared in [
            Some("image/png"),
            Some("application/octet-stream"),
            Some("application/pdfx"),
            Some(""),
            None,
        ] {
            let err = validate_content_type(declared).unwrap_err();
            assert!(matches!(err, AppError::InvalidFileType(_)), "{:?}", declared);
        }
    }

    #[test]
    fn test_file_size_limit_is_inclusive() {
        assert!(validate_file_size(1024, 1024).is_ok());
        assert!(matches!(
            validate_file_size(1025, 1024),
            Err(AppError::PayloadTooLarge(_))
        ));
    }
}
