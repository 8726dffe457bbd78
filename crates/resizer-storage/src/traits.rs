//! Storage abstraction trait
//!
//! This module defines the [`StorageClient`] trait that all storage backends must
//! implement, and the errors they report.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use resizer_core::{ObjectMetadata, ResizeError};
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// A gateway call did not complete before its own deadline.
    #[error("{operation} did not complete within {timeout:?}")]
    DeadlineExceeded {
        operation: &'static str,
        timeout: Duration,
    },

    /// Service or transport failure, carrying the client's message verbatim.
    #[error("{0}")]
    Transport(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object body as a stream of chunks. It can be consumed exactly once.
pub type ObjectBody = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

impl From<StorageError> for ResizeError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DeadlineExceeded { operation, timeout } => {
                ResizeError::DeadlineExceeded { operation, timeout }
            }
            StorageError::Transport(message)
            | StorageError::NotFound(message)
            | StorageError::InvalidKey(message) => ResizeError::Transport(message),
            StorageError::IoError(err) => ResizeError::Transport(err.to_string()),
            StorageError::ConfigError(message) => ResizeError::Config(message),
        }
    }
}

/// Storage client trait
///
/// The raw object operations of a backend. Implementations are shared by every
/// concurrent task of an invocation, so they must be safe for simultaneous calls.
/// They do not apply deadlines or retries: see [`crate::StorageGateway`].
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Fetch object metadata without the body
    async fn head_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata>;

    /// Open the object body as a stream
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectBody>;

    /// Write `body` to `key`, replacing any existing object
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Delete an object. Deleting a missing object succeeds.
    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
