//! Size catalog
//!
//! The fixed list of named target dimensions produced for every source image.

use serde::{Deserialize, Serialize};

/// One derivative to produce: a name and exact target dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl OutputSpec {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Parse a spec from `name:WxH`, e.g. `small:300x200`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (name, dims) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("Invalid size entry '{}'. Expected: name:WxH", s))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(format!("Missing derivative name in '{}'", s));
        }

        let (width, height) = dims
            .trim()
            .split_once('x')
            .ok_or_else(|| format!("Invalid dimensions '{}'. Expected: WxH", dims))?;

        let width = width
            .parse::<u32>()
            .map_err(|_| format!("Invalid width: {}", width))?;
        let height = height
            .parse::<u32>()
            .map_err(|_| format!("Invalid height: {}", height))?;

        if width == 0 || height == 0 {
            return Err(format!("Dimensions must be non-zero in '{}'", s));
        }

        Ok(Self::new(name, width, height))
    }
}

/// Immutable list of output specs, shared read-only by every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCatalog {
    specs: Vec<OutputSpec>,
}

impl SizeCatalog {
    pub fn new(specs: Vec<OutputSpec>) -> Self {
        Self { specs }
    }

    /// Parse a comma-separated list of `name:WxH` entries.
    pub fn parse(s: &str) -> Result<Self, String> {
        let specs = s
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(OutputSpec::parse)
            .collect::<Result<Vec<_>, _>>()?;
        let catalog = Self::new(specs);
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog must be non-empty and derivative names must be unique, since
    /// the name is part of every derivative key.
    pub fn validate(&self) -> Result<(), String> {
        if self.specs.is_empty() {
            return Err("Size catalog is empty".to_string());
        }
        for (i, spec) in self.specs.iter().enumerate() {
            if spec.width == 0 || spec.height == 0 {
                return Err(format!("Derivative '{}' has a zero dimension", spec.name));
            }
            if self.specs[..i].iter().any(|other| other.name == spec.name) {
                return Err(format!("Duplicate derivative name '{}'", spec.name));
            }
        }
        Ok(())
    }

    pub fn specs(&self) -> &[OutputSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputSpec> {
        self.specs.iter()
    }
}

impl Default for SizeCatalog {
    /// small(300×200), medium(500×400), large(800×600)
    fn default() -> Self {
        Self::new(vec![
            OutputSpec::new("small", 300, 200),
            OutputSpec::new("medium", 500, 400),
            OutputSpec::new("large", 800, 600),
        ])
    }
}
