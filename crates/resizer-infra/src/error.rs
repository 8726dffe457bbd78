//! Error reporting
//!
//! Turns a [`ResizeError`] into a log event at the level its metadata asks for,
//! and into a serializable report for invocation responses.

use resizer_core::{ErrorMetadata, LogLevel, ResizeError};
use serde::Serialize;

/// Serializable summary of a failed invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub error_code: &'static str,
    pub recoverable: bool,
}

impl From<&ResizeError> for ErrorReport {
    fn from(err: &ResizeError) -> Self {
        Self {
            error: err.to_string(),
            error_code: err.error_code(),
            recoverable: err.is_recoverable(),
        }
    }
}

/// Log `err` with its error code, at its own log level.
pub fn report_error(err: &ResizeError) -> ErrorReport {
    let report = ErrorReport::from(err);
    match err.log_level() {
        LogLevel::Warn => tracing::warn!(
            error = %report.error,
            error_code = report.error_code,
            recoverable = report.recoverable,
            "Invocation failed"
        ),
        LogLevel::Error => tracing::error!(
            error = %report.error,
            error_code = report.error_code,
            recoverable = report.recoverable,
            "Invocation failed"
        ),
    }
    report
}
