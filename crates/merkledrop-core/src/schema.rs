//! # Record Schemas and Leaf Encodings
//!
//! A record is a JSON object. A `RecordSchema` names which of its fields
//! are committed, in which order, with which type, and whether they are
//! packed (`abi.encodePacked`) or word-aligned (`abi.encode`).
//!
//! `LeafEncoding` adds the hash algorithm and leaf scheme. Together they
//! fully determine how a record becomes a leaf digest, so this is the
//! structure published next to every root.
//!
//! ## Built-in Presets
//!
//! | Preset       | Fields                         | Packing  | Leaf   |
//! |--------------|--------------------------------|----------|--------|
//! | `addresses`  | address                        | packed   | single |
//! | `allocation` | address, amount (uint256)      | packed   | single |
//! | `whitelist`  | index (uint256), address       | standard | double |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::digest::{decode_fixed_hex, Digest, HashAlgorithm};
use crate::error::EncodingError;
use crate::field::{describe, Address, FieldValue, Uint256};

/// A record as it arrives from a snapshot: field name to JSON value.
pub type Record = serde_json::Map<String, Value>;

/// Declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 20-byte Ethereum address.
    Address,
    /// Unsigned 256-bit integer, big-endian.
    Uint256,
    /// Opaque 32-byte word.
    Bytes32,
}

impl FieldType {
    /// Returns the Solidity type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Uint256 => "uint256",
            Self::Bytes32 => "bytes32",
        }
    }

    /// Parse and width-check a JSON value as this type.
    pub fn parse(&self, value: &Value) -> Result<FieldValue, EncodingError> {
        match self {
            Self::Address => Address::from_json(value).map(FieldValue::Address),
            Self::Uint256 => Uint256::from_json(value).map(FieldValue::Uint256),
            Self::Bytes32 => match value {
                Value::String(s) => decode_fixed_hex::<32>(s)
                    .map(|b| FieldValue::Bytes32(Digest::new(b))),
                other => Err(EncodingError::UnexpectedValue {
                    expected: "bytes32",
                    found: describe(other),
                }),
            },
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How field encodings are concatenated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packing {
    /// Each field at its natural width (`abi.encodePacked`).
    #[default]
    Packed,
    /// Each field left-padded to a 32-byte word (`abi.encode`).
    Standard,
}

/// How a leaf digest is derived from encoded record bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafScheme {
    /// `leaf = hash(encode(record))`.
    Single,
    /// `leaf = hash(hash(encode(record)))`. Keeps leaf preimages out of the
    /// 64-byte internal-node domain.
    Double,
}

impl LeafScheme {
    /// Returns the scheme identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for LeafScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeafScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            other => Err(format!(
                "unknown leaf scheme {other:?} (expected single or double)"
            )),
        }
    }
}

/// One named, typed field of a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Key of the field in the JSON record.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl FieldSpec {
    /// Create a field spec.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Ordered field layout of the records committed to by one tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Concatenation mode.
    #[serde(default)]
    pub packing: Packing,
    /// Fields in encoding order.
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// Create a schema from a packing mode and ordered fields.
    pub fn new(packing: Packing, fields: Vec<FieldSpec>) -> Self {
        Self { packing, fields }
    }

    /// Extract and type-check every schema field of `record`, in schema order.
    ///
    /// Keys not named by the schema are ignored.
    pub fn parse_record(&self, record: &Record) -> Result<Vec<FieldValue>, EncodingError> {
        self.fields
            .iter()
            .map(|field| {
                let value = record
                    .get(&field.name)
                    .ok_or_else(|| EncodingError::MissingField(field.name.clone()))?;
                field.ty.parse(value).map_err(|e| e.in_field(&field.name))
            })
            .collect()
    }
}

/// Named record layouts reproducing the classic airdrop generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaPreset {
    /// A bare participant list.
    Addresses,
    /// `(address, uint256 amount)` token allocations.
    Allocation,
    /// `(uint256 index, address)` mint whitelist.
    Whitelist,
}

impl SchemaPreset {
    /// Returns the preset identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Addresses => "addresses",
            Self::Allocation => "allocation",
            Self::Whitelist => "whitelist",
        }
    }

    /// The field layout of this preset.
    pub fn schema(&self) -> RecordSchema {
        match self {
            Self::Addresses => RecordSchema::new(
                Packing::Packed,
                vec![FieldSpec::new("address", FieldType::Address)],
            ),
            Self::Allocation => RecordSchema::new(
                Packing::Packed,
                vec![
                    FieldSpec::new("address", FieldType::Address),
                    FieldSpec::new("amount", FieldType::Uint256),
                ],
            ),
            Self::Whitelist => RecordSchema::new(
                Packing::Standard,
                vec![
                    FieldSpec::new("index", FieldType::Uint256),
                    FieldSpec::new("address", FieldType::Address),
                ],
            ),
        }
    }

    /// The leaf scheme the preset uses unless told otherwise.
    pub fn default_leaf_scheme(&self) -> LeafScheme {
        match self {
            Self::Addresses | Self::Allocation => LeafScheme::Single,
            Self::Whitelist => LeafScheme::Double,
        }
    }
}

impl fmt::Display for SchemaPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "addresses" => Ok(Self::Addresses),
            "allocation" => Ok(Self::Allocation),
            "whitelist" => Ok(Self::Whitelist),
            other => Err(format!(
                "unknown schema preset {other:?} (expected addresses, allocation, or whitelist)"
            )),
        }
    }
}

/// Everything a verifier needs to recompute a leaf from raw record fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeafEncoding {
    /// Hash algorithm for leaves and nodes.
    #[serde(default)]
    pub hash: HashAlgorithm,
    /// Single or double leaf hashing.
    pub leaf: LeafScheme,
    /// Record layout.
    #[serde(flatten)]
    pub schema: RecordSchema,
}

impl LeafEncoding {
    /// Create an encoding from its parts.
    pub fn new(hash: HashAlgorithm, leaf: LeafScheme, schema: RecordSchema) -> Self {
        Self { hash, leaf, schema }
    }

    /// A preset with its default leaf scheme and Keccak-256.
    pub fn preset(preset: SchemaPreset) -> Self {
        Self::new(
            HashAlgorithm::default(),
            preset.default_leaf_scheme(),
            preset.schema(),
        )
    }
}
