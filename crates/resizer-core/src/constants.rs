//! Default values for the pipeline configuration.

use std::time::Duration;

/// Key prefix every source object must carry.
pub const DEFAULT_SRC_KEY_PREFIX: &str = "original";

/// Key prefix under which derivatives are written.
pub const DEFAULT_DST_KEY_PREFIX: &str = "resized";

/// Object suffix handled by the pipeline.
pub const DEFAULT_KEY_SUFFIX: &str = ".jpg";

/// Largest object accepted for decoding (10 MiB).
pub const DEFAULT_MAX_OBJECT_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Per-call storage timeout.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Quality used when encoding derivatives.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Content type of every derivative.
pub const DERIVATIVE_CONTENT_TYPE: &str = "image/jpeg";

/// Region used when neither `S3_REGION` nor `AWS_REGION` is set.
pub const DEFAULT_REGION: &str = "ap-northeast-1";
