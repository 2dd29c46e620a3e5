//! # Drop Configuration
//!
//! A YAML file selecting how records become leaves:
//!
//! ```yaml
//! schema: whitelist          # preset name, or a custom schema object
//! leaf: double               # single | double
//! hash: keccak256            # keccak256 | sha256
//! ```
//!
//! A custom schema lists its fields in encoding order:
//!
//! ```yaml
//! schema:
//!   packing: packed
//!   fields:
//!     - { name: address, type: address }
//!     - { name: amount, type: uint256 }
//! ```
//!
//! Command-line flags override file values. Unset values fall back to the
//! preset's leaf scheme (custom schemas default to `double`) and to
//! Keccak-256.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use merkledrop_core::{HashAlgorithm, LeafEncoding, LeafScheme, RecordSchema, SchemaPreset};

/// Where the record schema comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SchemaSource {
    /// A built-in schema by name.
    Preset(SchemaPreset),
    /// An explicit field list.
    Custom(RecordSchema),
}

/// Contents of a drop configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DropConfig {
    /// Record schema; required here or via `--schema`.
    #[serde(default)]
    pub schema: Option<SchemaSource>,
    /// Leaf scheme; defaults to the schema's own default.
    #[serde(default)]
    pub leaf: Option<LeafScheme>,
    /// Hash algorithm; defaults to Keccak-256.
    #[serde(default)]
    pub hash: Option<HashAlgorithm>,
}

/// Encoding choices given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodingOverrides {
    /// `--schema`: replaces any configured schema with a preset.
    pub schema: Option<SchemaPreset>,
    /// `--leaf`
    pub leaf: Option<LeafScheme>,
    /// `--hash`
    pub hash: Option<HashAlgorithm>,
}

/// Keys that artifacts and proof output place next to record fields.
pub const RESERVED_FIELD_NAMES: [&str; 2] = ["proof", "root"];

impl DropConfig {
    /// Load a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("failed to parse config YAML: {}", path.display()))
    }

    /// Parse a configuration from YAML text. An empty document is an empty
    /// configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(mut self, overrides: &EncodingOverrides) -> Self {
        if let Some(preset) = overrides.schema {
            self.schema = Some(SchemaSource::Preset(preset));
        }
        if overrides.leaf.is_some() {
            self.leaf = overrides.leaf;
        }
        if overrides.hash.is_some() {
            self.hash = overrides.hash;
        }
        self
    }

    /// Resolve the complete leaf encoding.
    pub fn resolve(&self) -> Result<LeafEncoding> {
        let (schema, default_leaf) = match &self.schema {
            Some(SchemaSource::Preset(preset)) => (preset.schema(), preset.default_leaf_scheme()),
            Some(SchemaSource::Custom(schema)) => {
                check_custom_schema(schema)?;
                (schema.clone(), LeafScheme::Double)
            }
            None => bail!("no record schema: pass --schema or set `schema` in --config"),
        };
        let encoding = LeafEncoding::new(
            self.hash.unwrap_or_default(),
            self.leaf.unwrap_or(default_leaf),
            schema,
        );
        tracing::debug!(
            hash = %encoding.hash,
            leaf = %encoding.leaf,
            fields = encoding.schema.fields.len(),
            "resolved leaf encoding"
        );
        Ok(encoding)
    }
}

fn check_custom_schema(schema: &RecordSchema) -> Result<()> {
    if schema.fields.is_empty() {
        bail!("custom schema must declare at least one field");
    }
    let mut seen = HashSet::new();
    for field in &schema.fields {
        if RESERVED_FIELD_NAMES.contains(&field.name.as_str()) {
            bail!(
                "custom schema field `{}` collides with a reserved artifact key",
                field.name
            );
        }
        if !seen.insert(field.name.as_str()) {
            bail!("custom schema declares field `{}` twice", field.name);
        }
    }
    Ok(())
}
