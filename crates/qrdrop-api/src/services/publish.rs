//! Publish pipeline
//!
//! Turns one uploaded PDF into a stored, QR-stamped document whose QR code
//! encodes the document's own public URL. Stages run strictly in order:
//!
//! `Received → Validated → IdentityAllocated → UrlPredicted → QrEncoded →
//! DocumentMutated → Persisted → Responded`
//!
//! The first failure moves the request to `Failed` and nothing after it runs.
//! The upload is the only durable side effect, so there is nothing to undo.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use qrdrop_core::constants::PDF_CONTENT_TYPE;
use qrdrop_core::{AppError, Config, PublishRecord, PublishResponse};
use qrdrop_processing::{PdfStamper, ProcessingResult, QrEncoder};
use qrdrop_storage::{generate_storage_key, Storage, WriteMode};
use uuid::Uuid;

use crate::error::{from_processing_error, from_storage_error};
use crate::utils::upload::{validate_content_type, validate_file_size};

/// A file part received from the client, held fully in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    Received,
    Validated,
    IdentityAllocated,
    UrlPredicted,
    QrEncoded,
    DocumentMutated,
    Persisted,
    Responded,
    Failed,
}

impl PublishStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStage::Received => "received",
            PublishStage::Validated => "validated",
            PublishStage::IdentityAllocated => "identity_allocated",
            PublishStage::UrlPredicted => "url_predicted",
            PublishStage::QrEncoded => "qr_encoded",
            PublishStage::DocumentMutated => "document_mutated",
            PublishStage::Persisted => "persisted",
            PublishStage::Responded => "responded",
            PublishStage::Failed => "failed",
        }
    }

    /// Successor on the happy path. Terminal stages have none.
    pub fn next(&self) -> Option<PublishStage> {
        match self {
            PublishStage::Received => Some(PublishStage::Validated),
            PublishStage::Validated => Some(PublishStage::IdentityAllocated),
            PublishStage::IdentityAllocated => Some(PublishStage::UrlPredicted),
            PublishStage::UrlPredicted => Some(PublishStage::QrEncoded),
            PublishStage::QrEncoded => Some(PublishStage::DocumentMutated),
            PublishStage::DocumentMutated => Some(PublishStage::Persisted),
            PublishStage::Persisted => Some(PublishStage::Responded),
            PublishStage::Responded | PublishStage::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed publish. `stage` is the stage the pipeline was trying to reach.
#[derive(Debug, thiserror::Error)]
#[error("publish failed before reaching {stage}: {source}")]
pub struct PublishError {
    pub stage: PublishStage,
    #[source]
    pub source: AppError,
}

/// Per-request stage tracker. Only moves forward, one stage at a time.
struct StageTracker {
    current: PublishStage,
    file_id: Option<Uuid>,
}

impl StageTracker {
    fn new() -> Self {
        StageTracker {
            current: PublishStage::Received,
            file_id: None,
        }
    }

    fn advance<T>(&mut self, result: Result<T, AppError>) -> Result<T, PublishError> {
        let Some(target) = self.current.next() else {
            return Err(PublishError {
                stage: self.current,
                source: AppError::Internal(format!(
                    "publish pipeline already finished at {}",
                    self.current
                )),
            });
        };

        match result {
            Ok(value) => {
                tracing::debug!(
                    from = %self.current,
                    stage = %target,
                    file_id = ?self.file_id,
                    "Publish stage reached"
                );
                self.current = target;
                Ok(value)
            }
            Err(source) => {
                // Reported once at the HTTP boundary, which carries the stage.
                tracing::debug!(
                    stage = %target,
                    last_completed = %self.current,
                    file_id = ?self.file_id,
                    error = %source,
                    "Publish pipeline stopped"
                );
                self.current = PublishStage::Failed;
                Err(PublishError {
                    stage: target,
                    source,
                })
            }
        }
    }
}

/// Runs the publish pipeline against one storage backend.
#[derive(Clone)]
pub struct PublishService {
    storage: Arc<dyn Storage>,
    qr: QrEncoder,
    stamper: PdfStamper,
    max_upload_size_bytes: usize,
}

impl PublishService {
    pub fn new(
        storage: Arc<dyn Storage>,
        qr: QrEncoder,
        stamper: PdfStamper,
        max_upload_size_bytes: usize,
    ) -> Self {
        PublishService {
            storage,
            qr,
            stamper,
            max_upload_size_bytes,
        }
    }

    pub fn from_config(config: &Config, storage: Arc<dyn Storage>) -> Self {
        PublishService::new(
            storage,
            QrEncoder::new(config.qr_module_size()),
            PdfStamper::default(),
            config.max_upload_size_bytes(),
        )
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_bytes
    }

    pub async fn publish(
        &self,
        upload: Option<UploadedFile>,
    ) -> Result<PublishResponse, PublishError> {
        let start = Instant::now();
        let mut stages = StageTracker::new();

        let upload = stages.advance(self.validate(upload))?;
        let size_bytes = upload.data.len();

        let file_id = Uuid::new_v4();
        let storage_key = generate_storage_key(file_id);
        stages.file_id = Some(file_id);
        stages.advance(Ok(()))?;

        let public_url = stages.advance(
            self.storage
                .public_url(&storage_key)
                .map_err(from_storage_error),
        )?;
        let record = PublishRecord {
            file_id,
            storage_key,
            public_url,
        };

        let qr = self.qr.clone();
        let text = record.public_url.clone();
        let payload = stages.advance(run_blocking(move || qr.encode(&text)).await)?;

        let stamper = self.stamper.clone();
        let png = payload.png.clone();
        let stamped = stages.advance(
            run_blocking(move || stamper.stamp_first_page(&upload.data, &png)).await,
        )?;
        tracing::debug!(
            file_id = %record.file_id,
            page_width = stamped.page_width,
            page_height = stamped.page_height,
            x = stamped.rect.x,
            y = stamped.rect.y,
            "QR code drawn on first page"
        );

        let stored_bytes = stamped.bytes.len();
        stages.advance(
            self.storage
                .upload(
                    &record.storage_key,
                    stamped.bytes,
                    PDF_CONTENT_TYPE,
                    WriteMode::Create,
                )
                .await
                .map_err(from_storage_error),
        )?;

        let response = PublishResponse {
            download_url: record.public_url,
            qr_code_data_url: payload.data_uri,
        };
        stages.advance(Ok(()))?;

        tracing::info!(
            file_id = %record.file_id,
            storage_key = %record.storage_key,
            size_bytes = size_bytes,
            stored_bytes = stored_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "PDF published"
        );

        Ok(response)
    }

    fn validate(&self, upload: Option<UploadedFile>) -> Result<UploadedFile, AppError> {
        let upload = upload.ok_or(AppError::MissingFile)?;
        validate_content_type(upload.content_type.as_deref())?;
        validate_file_size(upload.data.len(), self.max_upload_size_bytes)?;
        Ok(upload)
    }
}

/// Run CPU-bound processing off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> ProcessingResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Processing task failed: {}", e)))?
        .map_err(from_processing_error)
}
