//! Tracing initialization
//!
//! Logs go to stdout through `tracing_subscriber`, filtered by `RUST_LOG`.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, LogFormat};
