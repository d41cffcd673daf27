//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Every error renders as a plain
//! text body holding the client message of its [`AppError`]; internal causes
//! are logged and never sent back.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qrdrop_core::{AppError, ErrorMetadata, LogLevel};
use qrdrop_processing::ProcessingError;
use qrdrop_storage::StorageError;

use crate::services::publish::{PublishError, PublishStage};

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from qrdrop-core)
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    /// Publish stage that failed, when the error came out of the pipeline.
    pub stage: Option<PublishStage>,
}

impl From<AppError> for HttpAppError {
    fn from(error: AppError) -> Self {
        HttpAppError { error, stage: None }
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError::from(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError::from(from_storage_error(err))
    }
}

impl From<PublishError> for HttpAppError {
    fn from(err: PublishError) -> Self {
        HttpAppError {
            error: err.source,
            stage: Some(err.stage),
        }
    }
}

pub fn from_storage_error(err: StorageError) -> AppError {
    AppError::Storage(err.to_string())
}

pub fn from_processing_error(err: ProcessingError) -> AppError {
    if err.is_qr_error() {
        AppError::QrEncoding(err.to_string())
    } else {
        AppError::PdfProcessing(err.to_string())
    }
}

fn log_error(error: &AppError, stage: Option<PublishStage>) {
    let error_type = error.error_type();
    let stage = stage.map(|s| s.as_str());
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, stage = ?stage, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, stage = ?stage, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type = error_type,
                code = error.error_code(),
                stage = ?stage,
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.error, self.stage);

        (status, self.error.client_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrdrop_core::constants::{MSG_INVALID_TYPE, MSG_NO_FILE, MSG_PROCESSING_FAILED};

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_validation_errors_render_as_400_text() {
        let response = HttpAppError::from(AppError::MissingFile).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, MSG_NO_FILE);

        let response =
            HttpAppError::from(AppError::InvalidFileType("image/png".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, MSG_INVALID_TYPE);
    }

    #[tokio::test]
    async fn test_storage_error_hides_cause() {
        let err = HttpAppError::from(StorageError::UploadFailed(
            "bucket pdf_files: access denied for key sk_live_123".to_string(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert_eq!(body, MSG_PROCESSING_FAILED);
        assert!(!body.contains("sk_live_123"));
    }

    #[test]
    fn test_publish_error_keeps_failed_stage() {
        let err = HttpAppError::from(PublishError {
            stage: PublishStage::Persisted,
            source: AppError::Storage("bucket unavailable".to_string()),
        });
        assert_eq!(err.stage, Some(PublishStage::Persisted));
        assert!(matches!(err.error, AppError::Storage(_)));
    }

    #[test]
    fn test_processing_errors_split_by_origin() {
        assert!(matches!(
            from_processing_error(ProcessingError::QrEncoding("data too long".to_string())),
            AppError::QrEncoding(_)
        ));
        assert!(matches!(
            from_processing_error(ProcessingError::NoPages),
            AppError::PdfProcessing(_)
        ));
    }
}
