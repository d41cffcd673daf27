//! Route configuration and setup

use crate::handlers::{health, pdf_upload};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use qrdrop_core::constants::LOCAL_FILES_ROUTE;
use qrdrop_core::{Config, StorageBackend};
use qrdrop_infra::{request_id_middleware, security_headers_middleware, SecurityHeaders};
use std::path::Path;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Browser upload page shipped with the crate.
const BUNDLED_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    let body_limit = config
        .max_upload_size_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    tracing::info!(
        http_concurrency_limit,
        body_limit,
        "HTTP limits configured"
    );

    let mut routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/upload", post(pdf_upload::upload_pdf))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"));

    if config.storage_backend() == StorageBackend::Local {
        tracing::info!(
            route = LOCAL_FILES_ROUTE,
            path = %config.storage.local_storage_path,
            "Serving local storage directory"
        );
        routes = routes.nest_service(
            LOCAL_FILES_ROUTE,
            ServeDir::new(&config.storage.local_storage_path),
        );
    }

    let static_dir = config.static_dir().unwrap_or(BUNDLED_STATIC_DIR);
    if Path::new(static_dir).is_dir() {
        tracing::info!(path = %static_dir, "Serving upload page");
        routes = routes.fallback_service(ServeDir::new(static_dir));
    } else {
        tracing::warn!(path = %static_dir, "Static directory not found, upload page disabled");
    }

    let app = routes
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            SecurityHeaders {
                hsts: config.is_production(),
            },
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
