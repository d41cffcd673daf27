//! Supabase Storage backend
//!
//! Talks to the Storage REST API with the project's service key:
//!
//! - upload: `POST {url}/storage/v1/object/{bucket}/{key}` with `x-upsert`
//! - exists: `HEAD {url}/storage/v1/object/{bucket}/{key}`
//! - public URL: `{url}/storage/v1/object/public/{bucket}/{key}` (the bucket must be public)

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult, WriteMode};
use crate::StorageBackend;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode};

/// Characters left untouched inside a single path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Supabase Storage implementation
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    project_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// Create a new SupabaseStorage instance
    ///
    /// # Arguments
    /// * `project_url` - Project URL, e.g. "https://abcd.supabase.co"
    /// * `service_key` - Service role key; never exposed to clients
    /// * `bucket` - Storage bucket name
    pub fn new(project_url: String, service_key: String, bucket: String) -> StorageResult<Self> {
        if project_url.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "SUPABASE_URL not configured".to_string(),
            ));
        }
        if service_key.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "SUPABASE_SERVICE_KEY not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(SupabaseStorage {
            client,
            project_url: project_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        })
    }

    fn encoded_path(&self, key: &str) -> String {
        let key = key
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", utf8_percent_encode(&self.bucket, SEGMENT), key)
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}",
            self.project_url,
            self.encoded_path(key)
        )
    }

    fn generate_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}",
            self.project_url,
            self.encoded_path(key)
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }
}

/// Supabase reports a taken key as HTTP 409, or as 400 with a `Duplicate` body.
fn is_duplicate(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::CONFLICT {
        return true;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            let code = value.get("statusCode").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
            let error = value.get("error").and_then(|v| v.as_str()).unwrap_or("");
            code.as_deref() == Some("409") || error.eq_ignore_ascii_case("duplicate")
        }
        Err(_) => false,
    }
}

#[async_trait]
impl Storage for SupabaseStorage {
    fn public_url(&self, storage_key: &str) -> StorageResult<String> {
        validate_key(storage_key)?;
        Ok(self.generate_url(storage_key))
    }

    async fn upload(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
        mode: WriteMode,
    ) -> StorageResult<()> {
        validate_key(storage_key)?;
        let size = data.len();
        let upsert = matches!(mode, WriteMode::Overwrite);
        let start = std::time::Instant::now();

        let response = self
            .authorized(self.client.post(self.object_url(storage_key)))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(data)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    size_bytes = size,
                    "Supabase upload request failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if !upsert && is_duplicate(status, &body) {
                tracing::warn!(
                    bucket = %self.bucket,
                    key = %storage_key,
                    "Supabase upload refused, object already exists"
                );
                return Err(StorageError::AlreadyExists(storage_key.to_string()));
            }
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Supabase upload failed"
            );
            return Err(StorageError::UploadFailed(format!(
                "Supabase returned {}: {}",
                status, body
            )));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Supabase upload successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        let response = self
            .authorized(self.client.head(self.object_url(storage_key)))
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            s => Err(StorageError::BackendError(format!(
                "Supabase returned {} for HEAD",
                s
            ))),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path as AxumPath, State};
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::Router;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Objects = Arc<Mutex<HashMap<String, Vec<u8>>>>;

    /// Minimal stand-in for the Storage REST API upload route.
    async fn spawn_fake_supabase() -> (String, Objects) {
        let objects: Objects = Arc::new(Mutex::new(HashMap::new()));

        async fn put_object(
            State(objects): State<Objects>,
            AxumPath((bucket, key)): AxumPath<(String, String)>,
            headers: HeaderMap,
            body: axum::body::Bytes,
        ) -> (axum::http::StatusCode, String) {
            if headers.get("apikey").is_none() {
                return (axum::http::StatusCode::UNAUTHORIZED, String::new());
            }
            let upsert = headers
                .get("x-upsert")
                .and_then(|v| v.to_str().ok())
                .map(|v| v == "true")
                .unwrap_or(false);
            let id = format!("{}/{}", bucket, key);
            let mut objects = objects.lock().unwrap();
            if objects.contains_key(&id) && !upsert {
                return (
                    axum::http::StatusCode::BAD_REQUEST,
                    r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#
                        .to_string(),
                );
            }
            objects.insert(id, body.to_vec());
            (axum::http::StatusCode::OK, format!(r#"{{"Key":"{}/{}"}}"#, bucket, key))
        }

        let app = Router::new()
            .route("/storage/v1/object/{bucket}/{*key}", post(put_object))
            .with_state(objects.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), objects)
    }

    #[test]
    fn test_public_url_format() {
        let storage = SupabaseStorage::new(
            "https://abcd.supabase.co/".to_string(),
            "service-key".to_string(),
            "pdf_files".to_string(),
        )
        .unwrap();
        assert_eq!(
            storage.public_url("processed/a.pdf").unwrap(),
            "https://abcd.supabase.co/storage/v1/object/public/pdf_files/processed/a.pdf"
        );
    }

    #[test]
    fn test_missing_credentials_rejected() {
        assert!(SupabaseStorage::new(
            "https://abcd.supabase.co".to_string(),
            "".to_string(),
            "pdf_files".to_string()
        )
        .is_err());
    }

    #[test]
    fn test_is_duplicate() {
        assert!(is_duplicate(StatusCode::CONFLICT, ""));
        assert!(is_duplicate(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#
        ));
        assert!(!is_duplicate(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":"400","error":"InvalidKey"}"#
        ));
        assert!(!is_duplicate(StatusCode::INTERNAL_SERVER_ERROR, "oops"));
    }

    #[tokio::test]
    async fn test_upload_without_upsert_refuses_existing_key() {
        let (url, objects) = spawn_fake_supabase().await;
        let storage =
            SupabaseStorage::new(url, "service-key".to_string(), "pdf_files".to_string()).unwrap();

        storage
            .upload("processed/a.pdf", b"first".to_vec(), "application/pdf", WriteMode::Create)
            .await
            .unwrap();
        let err = storage
            .upload("processed/a.pdf", b"second".to_vec(), "application/pdf", WriteMode::Create)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::AlreadyExists(_)));
        assert_eq!(
            objects.lock().unwrap().get("pdf_files/processed/a.pdf").unwrap(),
            b"first"
        );
    }
}
