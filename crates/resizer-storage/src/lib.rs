//! Resizer Storage Library
//!
//! This crate provides the storage client abstraction, the timeout-bounded
//! [`StorageGateway`] the pipeline talks to, and client implementations for S3 and
//! the local filesystem.
//!
//! # Objects
//!
//! Every object is addressed by `(bucket, key)`. The local backend maps that pair to
//! `{base_path}/{bucket}/{key}`. Keys must not contain `..` or a leading `/`.
//!
//! # Deadlines
//!
//! Clients never enforce timeouts or retries themselves. The gateway wraps each
//! call in its own deadline, and retry policy belongs to whatever redelivers the
//! notification.

pub mod factory;
pub mod gateway;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage_client;
pub use gateway::{CallTimeout, StorageGateway};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use resizer_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Client;
pub use traits::{ObjectBody, StorageClient, StorageError, StorageResult};
