use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Successful response of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    /// Public URL of the stamped document. Also the text encoded in the QR code.
    #[schema(example = "https://example.supabase.co/storage/v1/object/public/pdf_files/processed/0b6c2f0e-3d7c-4b59-9a57-1f4f0e2f8c11.pdf")]
    pub download_url: String,
    /// PNG rendering of the QR code as a `data:` URI.
    #[schema(example = "data:image/png;base64,iVBORw0KGgo...")]
    pub qr_code_data_url: String,
}

/// Identity of one published document, fixed before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRecord {
    pub file_id: Uuid,
    pub storage_key: String,
    pub public_url: String,
}
