//! Telemetry initialization
//!
//! Structured logging through `tracing-subscriber`. Metrics and trace exporters are
//! not part of this crate.

mod init_basic;

pub use init_basic::{init_telemetry, DEFAULT_FILTER};
