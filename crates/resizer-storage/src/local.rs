use crate::traits::{ObjectBody, StorageClient, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use resizer_core::ObjectMetadata;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

/// Local filesystem storage implementation
///
/// Objects live at `{base_path}/{bucket}/{key}`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/resizer")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a bucket and key to a filesystem path, rejecting anything that could
    /// escape the base directory.
    fn key_to_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        for (label, part) in [("bucket", bucket), ("key", key)] {
            if part.is_empty() {
                return Err(StorageError::InvalidKey(format!("{} is empty", label)));
            }
            if part.starts_with('/') || part.contains('\\') || part.split('/').any(|s| s == "..")
            {
                return Err(StorageError::InvalidKey(format!(
                    "{} contains invalid path components: {}",
                    label, part
                )));
            }
        }
        if bucket.contains('/') {
            return Err(StorageError::InvalidKey(format!(
                "bucket must not contain '/': {}",
                bucket
            )));
        }

        Ok(self.base_path.join(bucket).join(key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

fn not_found(err: std::io::Error, bucket: &str, key: &str) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound(format!("{}/{}", bucket, key))
    } else {
        StorageError::IoError(err)
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn head_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata> {
        let path = self.key_to_path(bucket, key)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| not_found(e, bucket, key))?;

        if !metadata.is_file() {
            return Err(StorageError::NotFound(format!("{}/{}", bucket, key)));
        }

        Ok(ObjectMetadata {
            content_length: metadata.len(),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectBody> {
        let path = self.key_to_path(bucket, key)?;
        let file = fs::File::open(&path)
            .await
            .map_err(|e| not_found(e, bucket, key))?;

        tracing::debug!(
            path = %path.display(),
            "Opened local object for reading"
        );

        let stream = ReaderStream::new(file).map(|chunk| chunk.map_err(StorageError::from));
        Ok(Box::pin(stream))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        _content_type: &str,
    ) -> StorageResult<()> {
        let path = self.key_to_path(bucket, key)?;
        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await?;
        file.write_all(&body).await?;
        file.flush().await?;

        tracing::info!(
            path = %path.display(),
            size_bytes = body.len(),
            "Local object written"
        );

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(bucket, key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Local object deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
