//! Shared constants for the publish pipeline.

/// Media type every accepted upload must declare.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Multipart field carrying the uploaded document.
pub const UPLOAD_FIELD_NAME: &str = "pdf";

/// Namespace for processed documents inside the bucket.
pub const PROCESSED_PREFIX: &str = "processed";

/// File extension of processed documents.
pub const PDF_EXTENSION: &str = "pdf";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BUCKET: &str = "pdf_files";
pub const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 10;
pub const DEFAULT_QR_MODULE_SIZE: u32 = 4;
pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 1024;
pub const DEFAULT_LOCAL_STORAGE_PATH: &str = "./storage";
pub const DEFAULT_LOCAL_STORAGE_BASE_URL: &str = "http://localhost:3000/files";

/// Route under which the local backend's files are served.
pub const LOCAL_FILES_ROUTE: &str = "/files";

/// Client-facing messages. Bodies are plain text.
pub const MSG_NO_FILE: &str = "No file uploaded.";
pub const MSG_INVALID_TYPE: &str = "Invalid file type. Please upload a PDF.";
pub const MSG_TOO_LARGE: &str = "File too large.";
pub const MSG_PROCESSING_FAILED: &str = "An error occurred while processing your file.";
pub const MSG_SERVER_RUNNING: &str = "Server is running";
