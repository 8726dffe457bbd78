//! Derivative key generation.
//!
//! Key format: a source `{src_prefix}/{rest}{suffix}` maps to
//! `{dst_prefix}/{rest}/{derivative_name}{suffix}`. Keys that do not match the
//! source layout are rejected so no derivative is ever written for them.

use crate::constants::{DEFAULT_DST_KEY_PREFIX, DEFAULT_SRC_KEY_PREFIX};
use crate::error::{ResizeError, ResizeResult};

/// Source and destination prefixes used to derive derivative keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTransform {
    src_prefix: String,
    dst_prefix: String,
}

impl KeyTransform {
    pub fn new(src_prefix: impl Into<String>, dst_prefix: impl Into<String>) -> Self {
        Self {
            src_prefix: src_prefix.into(),
            dst_prefix: dst_prefix.into(),
        }
    }

    /// Derive the destination key of `derivative_name` for `source_key`.
    pub fn derive_key(
        &self,
        source_key: &str,
        derivative_name: &str,
        suffix: &str,
    ) -> ResizeResult<String> {
        let rest = source_key
            .strip_suffix(suffix)
            .and_then(|stem| stem.strip_prefix(self.src_prefix.as_str()))
            .and_then(|stem| stem.strip_prefix('/'))
            .ok_or_else(|| {
                ResizeError::Format(format!(
                    "key '{}' does not match '{}/<path>{}'",
                    source_key, self.src_prefix, suffix
                ))
            })?;

        Ok([
            self.dst_prefix.as_str(),
            rest,
            &format!("{}{}", derivative_name, suffix),
        ]
        .join("/"))
    }
}

impl Default for KeyTransform {
    fn default() -> Self {
        Self::new(DEFAULT_SRC_KEY_PREFIX, DEFAULT_DST_KEY_PREFIX)
    }
}
