//! Resizer Infrastructure Library
//!
//! Shared infrastructure for the resizer binaries:
//! - Telemetry initialization (structured logging)
//! - Error reporting

pub mod error;
pub mod telemetry;

pub use error::{report_error, ErrorReport};
pub use telemetry::init_telemetry;
