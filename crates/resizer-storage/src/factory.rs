#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Client;
use crate::{StorageBackend, StorageClient, StorageError, StorageResult};
use resizer_core::ResizerConfig;
use std::sync::Arc;

/// Create a storage client based on configuration
pub async fn create_storage_client(config: &ResizerConfig) -> StorageResult<Arc<dyn StorageClient>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let client =
                S3Client::new(config.s3_region.clone(), config.s3_endpoint.clone()).await?;
            tracing::info!(
                region = %config.s3_region,
                endpoint = ?config.s3_endpoint,
                "S3 storage client initialized"
            );
            Ok(Arc::new(client))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path).await?;
            tracing::info!(
                base_path = %storage.base_path().display(),
                "Local storage client initialized"
            );
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_local_client() {
        let temp_dir = TempDir::new().unwrap();
        let vars: HashMap<&str, String> = HashMap::from([
            ("STORAGE_BACKEND", "local".to_string()),
            (
                "LOCAL_STORAGE_PATH",
                temp_dir.path().to_string_lossy().into_owned(),
            ),
        ]);
        let config = ResizerConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();

        let client = create_storage_client(&config).await.unwrap();
        assert_eq!(client.backend_type(), StorageBackend::Local);
    }
}
