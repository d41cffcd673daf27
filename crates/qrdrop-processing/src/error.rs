use thiserror::Error;

/// Failures of the QR encoder and the PDF stamper
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("QR encoding failed: {0}")]
    QrEncoding(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Failed to parse PDF: {0}")]
    PdfParse(String),

    #[error("PDF is encrypted")]
    Encrypted,

    #[error("PDF has no pages")]
    NoPages,

    #[error("Malformed page: {0}")]
    MalformedPage(String),

    #[error("Failed to write PDF: {0}")]
    PdfWrite(String),
}

impl ProcessingError {
    /// True for failures of the QR encoder rather than of the document.
    pub fn is_qr_error(&self) -> bool {
        matches!(self, ProcessingError::QrEncoding(_))
    }
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;
