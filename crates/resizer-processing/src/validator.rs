use resizer_core::{ObjectMetadata, ResizeError, ResizeResult};

/// Source object validator
///
/// Checks reported metadata before any body is fetched, so oversized objects are
/// rejected without being downloaded.
#[derive(Debug, Clone, Copy)]
pub struct SourceValidator {
    max_object_size: u64,
}

impl SourceValidator {
    pub fn new(max_object_size: u64) -> Self {
        Self { max_object_size }
    }

    pub fn max_object_size(&self) -> u64 {
        self.max_object_size
    }

    /// An object exactly at the limit is accepted.
    pub fn validate_size(&self, metadata: &ObjectMetadata) -> ResizeResult<()> {
        if metadata.content_length > self.max_object_size {
            return Err(ResizeError::SizeLimitExceeded {
                size: metadata.content_length,
                limit: self.max_object_size,
            });
        }
        Ok(())
    }
}
