//! Shared set-up for API integration tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use qrdrop_api::setup::routes;
use qrdrop_api::AppState;
use qrdrop_core::Config;
use qrdrop_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_BASE_URL: &str = "http://localhost:3000/files";

pub struct TestApp {
    pub server: TestServer,
    pub config: Config,
    _temp_dir: TempDir,
}

pub fn create_test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.local_storage_path = temp_dir.path().to_string_lossy().to_string();
    config.storage.local_storage_base_url = TEST_BASE_URL.to_string();
    config
}

pub async fn local_storage(temp_dir: &TempDir) -> Arc<LocalStorage> {
    Arc::new(
        LocalStorage::new(temp_dir.path(), TEST_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    )
}

/// App backed by local storage in a fresh temp directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}, |storage| storage).await
}

/// App whose config and storage can be adjusted before the router is built.
///
/// `wrap` receives the temp-dir local storage and returns the backend the app uses.
pub async fn setup_test_app_with<C, W>(configure: C, wrap: W) -> TestApp
where
    C: FnOnce(&mut Config),
    W: FnOnce(Arc<dyn Storage>) -> Arc<dyn Storage>,
{
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let mut config = create_test_config(&temp_dir);
    configure(&mut config);

    let local: Arc<dyn Storage> = local_storage(&temp_dir).await;
    let storage = wrap(local);
    let state = Arc::new(AppState::new(config.clone(), storage));

    let app = routes::setup_routes(&config, state)
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        config,
        _temp_dir: temp_dir,
    }
}

/// App backed by local storage behind a [`storage::RecordingStorage`].
pub async fn setup_recording_app<C>(configure: C) -> (TestApp, Arc<storage::RecordingStorage>)
where
    C: FnOnce(&mut Config),
{
    let mut recorder = None;
    let app = setup_test_app_with(configure, |inner| {
        let recording = storage::RecordingStorage::new(inner);
        recorder = Some(recording.clone());
        let storage: Arc<dyn Storage> = recording;
        storage
    })
    .await;
    (app, recorder.expect("storage wrapper was not called"))
}

pub fn pdf_form(data: Vec<u8>) -> MultipartForm {
    file_form("pdf", data, "document.pdf", "application/pdf")
}

pub fn file_form(field: &str, data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name)
        .mime_type(mime_type);
    MultipartForm::new().add_part(field.to_string(), part)
}

pub async fn upload(app: &TestApp, form: MultipartForm) -> TestResponse {
    app.server.post("/upload").multipart(form).await
}
