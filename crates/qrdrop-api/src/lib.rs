//! QRDrop API Library
//!
//! HTTP surface of the service: routes, handlers, the publish pipeline and
//! application setup.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::HttpAppError;
pub use services::publish::{PublishError, PublishService, PublishStage, UploadedFile};
pub use state::AppState;
