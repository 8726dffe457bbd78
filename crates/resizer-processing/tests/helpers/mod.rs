#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use bytes::Bytes;
use resizer_core::ObjectMetadata;
use resizer_storage::{ObjectBody, StorageBackend, StorageClient, StorageError, StorageResult};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// A storage call as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub bucket: String,
    pub key: String,
}

/// In-memory storage client with failure injection
///
/// Objects are keyed by `(bucket, key)`. Every call is recorded before any
/// injected failure or hang applies, so tests can assert what was attempted.
#[derive(Default)]
pub struct MockStorageClient {
    objects: Mutex<HashMap<(String, String), Bytes>>,
    content_types: Mutex<HashMap<(String, String), String>>,
    calls: Mutex<Vec<RecordedCall>>,
    failing_puts: Mutex<HashMap<String, String>>,
    hanging: Mutex<HashSet<&'static str>>,
    reported_length: Mutex<Option<u64>>,
}

impl MockStorageClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, bucket: &str, key: &str, body: impl Into<Bytes>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body.into());
        self
    }

    /// Make every put to `key` fail with a transport error carrying `message`.
    pub fn with_failing_put(self, key: &str, message: &str) -> Self {
        self.failing_puts
            .lock()
            .unwrap()
            .insert(key.to_string(), message.to_string());
        self
    }

    /// Make every call of `operation` (e.g. "head_object") hang far beyond any test timeout.
    pub fn with_hanging(self, operation: &'static str) -> Self {
        self.hanging.lock().unwrap().insert(operation);
        self
    }

    /// Report this content length from head requests instead of the stored size.
    pub fn with_reported_length(self, length: u64) -> Self {
        *self.reported_length.lock().unwrap() = Some(length);
        self
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.content_types
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, operation: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.operation == operation)
            .collect()
    }

    async fn enter(&self, operation: &'static str, bucket: &str, key: &str) {
        self.calls.lock().unwrap().push(RecordedCall {
            operation,
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        let hang = self.hanging.lock().unwrap().contains(operation);
        if hang {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    }

    fn stored(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        self.object(bucket, key)
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, key)))
    }
}

#[async_trait]
impl StorageClient for MockStorageClient {
    async fn head_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata> {
        self.enter("head_object", bucket, key).await;
        let body = self.stored(bucket, key)?;
        let reported = *self.reported_length.lock().unwrap();
        Ok(ObjectMetadata {
            content_length: reported.unwrap_or(body.len() as u64),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectBody> {
        self.enter("get_object", bucket, key).await;
        let body = self.stored(bucket, key)?;

        // Hand the body back in two chunks, like a real network transfer would.
        let split = body.len() / 2;
        let chunks: Vec<StorageResult<Bytes>> =
            vec![Ok(body.slice(..split)), Ok(body.slice(split..))];
        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        self.enter("put_object", bucket, key).await;

        let failure = self.failing_puts.lock().unwrap().get(key).cloned();
        if let Some(message) = failure {
            return Err(StorageError::Transport(message));
        }

        let id = (bucket.to_string(), key.to_string());
        self.content_types
            .lock()
            .unwrap()
            .insert(id.clone(), content_type.to_string());
        self.objects.lock().unwrap().insert(id, body);
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.enter("delete_object", bucket, key).await;
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
