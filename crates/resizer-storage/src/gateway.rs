//! Storage gateway
//!
//! Thin wrapper over an injected [`StorageClient`] that gives every call its own
//! deadline. Expiry surfaces as [`StorageError::DeadlineExceeded`]; any other
//! failure is returned exactly as the client reported it. No retries happen here.

use crate::traits::{StorageClient, StorageError, StorageResult};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use resizer_core::ObjectMetadata;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Per-call timeout, optionally capped by the deadline of the whole invocation.
///
/// Each call to [`CallTimeout::next`] yields a fresh budget, so consecutive calls
/// never share one deadline.
#[derive(Debug, Clone, Copy)]
pub struct CallTimeout {
    per_call: Duration,
    invocation_deadline: Option<Instant>,
}

impl CallTimeout {
    pub fn new(per_call: Duration) -> Self {
        Self {
            per_call,
            invocation_deadline: None,
        }
    }

    pub fn with_invocation_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.invocation_deadline = deadline;
        self
    }

    pub fn per_call(&self) -> Duration {
        self.per_call
    }

    /// Timeout for the next call: the per-call timeout, or whatever remains of the
    /// invocation if that is shorter.
    pub fn next(&self) -> Duration {
        match self.invocation_deadline {
            Some(deadline) => self
                .per_call
                .min(deadline.saturating_duration_since(Instant::now())),
            None => self.per_call,
        }
    }
}

/// Timeout-bounded access to object storage
#[derive(Clone)]
pub struct StorageGateway {
    client: Arc<dyn StorageClient>,
}

impl StorageGateway {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }

    pub async fn head(
        &self,
        bucket: &str,
        key: &str,
        timeout: Duration,
    ) -> StorageResult<ObjectMetadata> {
        bounded(
            "head_object",
            bucket,
            key,
            timeout,
            self.client.head_object(bucket, key),
        )
        .await
    }

    /// Fetch the object and buffer its body. The deadline covers both the request
    /// and the transfer of every chunk.
    pub async fn get(&self, bucket: &str, key: &str, timeout: Duration) -> StorageResult<Bytes> {
        bounded("get_object", bucket, key, timeout, async {
            let mut body = self.client.get_object(bucket, key).await?;
            let mut buffer = BytesMut::new();
            while let Some(chunk) = body.next().await {
                buffer.extend_from_slice(&chunk?);
            }
            Ok(buffer.freeze())
        })
        .await
    }

    pub async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
        timeout: Duration,
    ) -> StorageResult<()> {
        bounded(
            "put_object",
            bucket,
            key,
            timeout,
            self.client.put_object(bucket, key, body, content_type),
        )
        .await
    }

    pub async fn delete(&self, bucket: &str, key: &str, timeout: Duration) -> StorageResult<()> {
        bounded(
            "delete_object",
            bucket,
            key,
            timeout,
            self.client.delete_object(bucket, key),
        )
        .await
    }
}

async fn bounded<T, F>(
    operation: &'static str,
    bucket: &str,
    key: &str,
    timeout: Duration,
    call: F,
) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation = operation,
                bucket = %bucket,
                key = %key,
                timeout_ms = timeout.as_millis() as u64,
                "Storage call exceeded its deadline"
            );
            Err(StorageError::DeadlineExceeded { operation, timeout })
        }
    }
}
