//! Error types module
//!
//! Every failure in the publish pipeline is expressed as an [`AppError`]. The
//! [`ErrorMetadata`] trait decides how the error is presented to the client and
//! how loudly it is logged. Internal causes never reach the response body.

use std::io;

use crate::constants::{MSG_INVALID_TYPE, MSG_NO_FILE, MSG_PROCESSING_FAILED, MSG_TOO_LARGE};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether resubmitting the same request could succeed
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether the internal message must stay out of responses
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("QR encoding error: {0}")]
    QrEncoding(String),

    #[error("PDF processing error: {0}")]
    PdfProcessing(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// (status, code, recoverable, sensitive, log level)
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::MissingFile => (400, "MISSING_FILE", false, false, LogLevel::Debug),
        AppError::InvalidFileType(_) => (400, "INVALID_FILE_TYPE", false, false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Warn),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, false, LogLevel::Debug),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, true, LogLevel::Error),
        AppError::QrEncoding(_) => (500, "QR_ENCODING_ERROR", false, true, LogLevel::Error),
        AppError::PdfProcessing(_) => (500, "PDF_PROCESSING_ERROR", false, true, LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", false, true, LogLevel::Error)
        }
    }
}

impl AppError {
    /// Get the error type name for log records
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MissingFile => "MissingFile",
            AppError::InvalidFileType(_) => "InvalidFileType",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::BadRequest(_) => "BadRequest",
            AppError::Storage(_) => "Storage",
            AppError::QrEncoding(_) => "QrEncoding",
            AppError::PdfProcessing(_) => "PdfProcessing",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MissingFile => MSG_NO_FILE.to_string(),
            AppError::InvalidFileType(_) => MSG_INVALID_TYPE.to_string(),
            AppError::PayloadTooLarge(_) => MSG_TOO_LARGE.to_string(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::Storage(_)
            | AppError::QrEncoding(_)
            | AppError::PdfProcessing(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => MSG_PROCESSING_FAILED.to_string(),
        }
    }
}
