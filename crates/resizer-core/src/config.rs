//! Configuration module
//!
//! Process-level configuration for the resizer, read once at start-up from the
//! environment (and an optional `.env` file). Every value has a default matching
//! the documented key naming contract, so an empty environment yields a working
//! S3 configuration.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::catalog::SizeCatalog;
use crate::constants::{
    DEFAULT_DST_KEY_PREFIX, DEFAULT_JPEG_QUALITY, DEFAULT_KEY_SUFFIX,
    DEFAULT_MAX_OBJECT_SIZE_BYTES, DEFAULT_REGION, DEFAULT_SRC_KEY_PREFIX,
    DEFAULT_STORAGE_TIMEOUT,
};
use crate::keys::KeyTransform;
use crate::storage_types::StorageBackend;

const DEFAULT_DERIVATIVE_SIZES: &str = "small:300x200,medium:500x400,large:800x600";

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(anyhow!("Invalid log format: {}", s)),
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Resizer configuration
#[derive(Clone, Debug)]
pub struct ResizerConfig {
    pub environment: String,
    pub log_format: LogFormat,
    // Key naming contract
    pub src_key_prefix: String,
    pub dst_key_prefix: String,
    pub key_suffix: String,
    // Pipeline limits
    pub max_object_size_bytes: u64,
    pub storage_timeout: Duration,
    pub catalog: SizeCatalog,
    pub jpeg_quality: u8,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
}

impl ResizerConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());
        let is_production = is_production_env(&environment);

        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None if is_production => LogFormat::Json,
            None => LogFormat::Pretty,
        };

        let max_object_size_bytes = lookup("MAX_OBJECT_SIZE_BYTES")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map_err(|_| anyhow!("MAX_OBJECT_SIZE_BYTES must be a valid number"))
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_OBJECT_SIZE_BYTES);

        let storage_timeout = lookup("STORAGE_TIMEOUT_SECS")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| anyhow!("STORAGE_TIMEOUT_SECS must be a valid number"))
            })
            .transpose()?
            .unwrap_or(DEFAULT_STORAGE_TIMEOUT);

        let catalog = SizeCatalog::parse(
            &lookup("DERIVATIVE_SIZES").unwrap_or_else(|| DEFAULT_DERIVATIVE_SIZES.to_string()),
        )
        .map_err(|e| anyhow!("DERIVATIVE_SIZES is invalid: {}", e))?;

        let jpeg_quality = lookup("JPEG_QUALITY")
            .map(|v| {
                v.trim()
                    .parse::<u8>()
                    .map_err(|_| anyhow!("JPEG_QUALITY must be a number between 1 and 100"))
            })
            .transpose()?
            .unwrap_or(DEFAULT_JPEG_QUALITY);

        let storage_backend = lookup("STORAGE_BACKEND")
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or_default();

        let config = ResizerConfig {
            environment,
            log_format,
            src_key_prefix: lookup("SRC_KEY_PREFIX")
                .unwrap_or_else(|| DEFAULT_SRC_KEY_PREFIX.to_string()),
            dst_key_prefix: lookup("DST_KEY_PREFIX")
                .unwrap_or_else(|| DEFAULT_DST_KEY_PREFIX.to_string()),
            key_suffix: lookup("KEY_SUFFIX").unwrap_or_else(|| DEFAULT_KEY_SUFFIX.to_string()),
            max_object_size_bytes,
            storage_timeout,
            catalog,
            jpeg_quality,
            storage_backend,
            s3_region: lookup("S3_REGION")
                .or_else(|| lookup("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            s3_endpoint: lookup("S3_ENDPOINT").filter(|s| !s.trim().is_empty()),
            local_storage_path: lookup("LOCAL_STORAGE_PATH").filter(|s| !s.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.src_key_prefix.is_empty() || self.dst_key_prefix.is_empty() {
            return Err(anyhow!("SRC_KEY_PREFIX and DST_KEY_PREFIX must not be empty"));
        }
        if self.src_key_prefix.ends_with('/') || self.dst_key_prefix.ends_with('/') {
            return Err(anyhow!("Key prefixes must not end with '/'"));
        }
        if !self.key_suffix.starts_with('.') || self.key_suffix.len() < 2 {
            return Err(anyhow!("KEY_SUFFIX must look like '.jpg'"));
        }
        if self.max_object_size_bytes == 0 {
            return Err(anyhow!("MAX_OBJECT_SIZE_BYTES must be greater than zero"));
        }
        if self.storage_timeout.is_zero() {
            return Err(anyhow!("STORAGE_TIMEOUT_SECS must be greater than zero"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }
        self.catalog
            .validate()
            .map_err(|e| anyhow!("DERIVATIVE_SIZES is invalid: {}", e))?;
        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            return Err(anyhow!(
                "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local"
            ));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.environment)
    }

    pub fn key_transform(&self) -> KeyTransform {
        KeyTransform::new(self.src_key_prefix.clone(), self.dst_key_prefix.clone())
    }
}

fn is_production_env(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ResizerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ResizerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.src_key_prefix, "original");
        assert_eq!(config.dst_key_prefix, "resized");
        assert_eq!(config.key_suffix, ".jpg");
        assert_eq!(config.max_object_size_bytes, 10_485_760);
        assert_eq!(config.storage_timeout, Duration::from_secs(10));
        assert_eq!(config.catalog, SizeCatalog::default());
        assert_eq!(config.jpeg_quality, 75);
        assert_eq!(config.storage_backend, StorageBackend::S3);
        assert_eq!(config.s3_region, "ap-northeast-1");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("ENVIRONMENT", "production"),
            ("SRC_KEY_PREFIX", "uploads"),
            ("DST_KEY_PREFIX", "thumbs"),
            ("MAX_OBJECT_SIZE_BYTES", "1024"),
            ("STORAGE_TIMEOUT_SECS", "3"),
            ("DERIVATIVE_SIZES", "tiny:32x32"),
            ("AWS_REGION", "eu-west-1"),
        ])
        .unwrap();
        assert!(config.is_production());
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.max_object_size_bytes, 1024);
        assert_eq!(config.storage_timeout, Duration::from_secs(3));
        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.s3_region, "eu-west-1");
        assert_eq!(config.key_transform(), KeyTransform::new("uploads", "thumbs"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("MAX_OBJECT_SIZE_BYTES", "ten")]).is_err());
        assert!(config_from(&[("MAX_OBJECT_SIZE_BYTES", "0")]).is_err());
        assert!(config_from(&[("STORAGE_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("KEY_SUFFIX", "jpg")]).is_err());
        assert!(config_from(&[("SRC_KEY_PREFIX", "original/")]).is_err());
        assert!(config_from(&[("JPEG_QUALITY", "0")]).is_err());
        assert!(config_from(&[("DERIVATIVE_SIZES", "a:1x1,a:2x2")]).is_err());
        assert!(config_from(&[("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_local_backend_requires_path() {
        assert!(config_from(&[("STORAGE_BACKEND", "local")]).is_err());
        let config = config_from(&[
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/resizer"),
        ])
        .unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert_eq!(config.local_storage_path.as_deref(), Some("/tmp/resizer"));
    }
}
