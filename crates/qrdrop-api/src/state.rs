use qrdrop_core::Config;
use qrdrop_storage::Storage;
use std::sync::Arc;

use crate::services::publish::PublishService;

/// Shared, read-only application state. Nothing here is mutated per request.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub publisher: PublishService,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let publisher = PublishService::from_config(&config, storage.clone());
        AppState {
            config,
            storage,
            publisher,
        }
    }
}
