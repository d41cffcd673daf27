//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a servable router.

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use qrdrop_core::Config;
use qrdrop_infra::LogFormat;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let log_format = config
        .log_format()
        .parse::<LogFormat>()
        .map_err(|e| anyhow::anyhow!(e))?;
    qrdrop_infra::init_telemetry(env!("CARGO_PKG_NAME"), config.environment(), log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), storage));

    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
