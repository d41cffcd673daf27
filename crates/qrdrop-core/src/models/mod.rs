pub mod publish;

pub use publish::{PublishRecord, PublishResponse};
