//! Resizer Core Library
//!
//! This crate provides the domain model, the size catalog, key derivation, error
//! types and configuration shared by every resizer component. It performs no I/O
//! beyond reading the process environment at start-up.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod keys;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use catalog::{OutputSpec, SizeCatalog};
pub use config::{LogFormat, ResizerConfig};
pub use error::{ErrorMetadata, LogLevel, ResizeError, ResizeResult};
pub use keys::KeyTransform;
pub use models::{Derivative, NotificationRecord, ObjectMetadata};
pub use storage_types::StorageBackend;
