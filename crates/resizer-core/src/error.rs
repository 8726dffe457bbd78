//! Error types module
//!
//! Every failure the pipeline can surface is a [`ResizeError`]. Errors are never
//! recovered locally: they travel unchanged to the invocation caller, which decides
//! whether the notification is redelivered.

use std::time::Duration;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Warning level - for input that cannot be processed, including malformed keys
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be reported by the caller
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "SIZE_LIMIT_EXCEEDED")
    fn error_code(&self) -> &'static str;

    /// Whether redelivering the same notification may succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResizeError {
    #[error("object size {size} bytes exceeds the limit of {limit} bytes")]
    SizeLimitExceeded { size: u64, limit: u64 },

    /// Storage failure other than a timeout. The message is the client's own.
    #[error("{0}")]
    Transport(String),

    #[error("{operation} did not complete within {timeout:?}")]
    DeadlineExceeded {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("format error: {0}")]
    Format(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for pipeline operations
pub type ResizeResult<T> = Result<T, ResizeError>;

/// Static metadata for each variant: (error_code, recoverable, log_level).
fn resize_error_static_metadata(err: &ResizeError) -> (&'static str, bool, LogLevel) {
    match err {
        ResizeError::SizeLimitExceeded { .. } => ("SIZE_LIMIT_EXCEEDED", false, LogLevel::Warn),
        ResizeError::Transport(_) => ("TRANSPORT_ERROR", true, LogLevel::Error),
        ResizeError::DeadlineExceeded { .. } => ("DEADLINE_EXCEEDED", true, LogLevel::Error),
        ResizeError::Format(_) => ("FORMAT_ERROR", false, LogLevel::Warn),
        ResizeError::Decode(_) => ("DECODE_ERROR", false, LogLevel::Warn),
        ResizeError::Encode(_) => ("ENCODE_ERROR", false, LogLevel::Error),
        ResizeError::Internal(_) => ("INTERNAL_ERROR", true, LogLevel::Error),
        ResizeError::Config(_) => ("CONFIG_ERROR", false, LogLevel::Error),
    }
}

impl ErrorMetadata for ResizeError {
    fn error_code(&self) -> &'static str {
        resize_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        resize_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        resize_error_static_metadata(self).2
    }
}

impl From<anyhow::Error> for ResizeError {
    fn from(err: anyhow::Error) -> Self {
        ResizeError::Config(format!("{:#}", err))
    }
}
