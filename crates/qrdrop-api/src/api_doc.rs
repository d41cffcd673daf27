//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers;
use qrdrop_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "QRDrop API",
        version = "0.1.0",
        description = "Upload a PDF and get it back stamped with a QR code that links to its own public download URL."
    ),
    paths(
        handlers::pdf_upload::upload_pdf,
        handlers::health::root,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(
        schemas(
            models::PublishResponse,
            handlers::health::HealthResponse,
            handlers::health::ReadinessResponse,
        )
    ),
    tags(
        (name = "upload", description = "PDF upload and QR stamping"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;
