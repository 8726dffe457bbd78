//! Data model of one pipeline invocation.

use serde::{Deserialize, Serialize};

/// One inbound notification naming the stored object that triggered the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub bucket: String,
    pub key: String,
}

impl NotificationRecord {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Object metadata returned by a head request. Never cached across invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub content_length: u64,
}

/// A derivative written to storage by one resize task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivative {
    pub name: String,
    pub key: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}
