//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - `EncodingError` is scoped to a single record. Callers that process a
//!   batch skip the offending record and keep going.
//! - `TreeError` covers building and addressing a tree.
//! - A failed verification is not an error. Verifiers return `false`.

use thiserror::Error;

use crate::digest::Digest;

/// Top-level error type for merkledrop.
#[derive(Error, Debug)]
pub enum MerkleDropError {
    /// A record field could not be canonically encoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Tree construction or proof addressing failed.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// JSON serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A record field violates its declared type or width.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The record has no value for a schema field.
    #[error("missing field `{0}`")]
    MissingField(String),

    /// The JSON value has the wrong shape for the field type.
    #[error("expected {expected}, got {found}")]
    UnexpectedValue {
        /// The declared field type.
        expected: &'static str,
        /// A short description of the value that was supplied.
        found: String,
    },

    /// A fixed-width hex value has the wrong number of digits.
    #[error("expected {expected} hex digits, got {found}")]
    HexLength {
        /// Required number of hex digits (without `0x`).
        expected: usize,
        /// Number of hex digits supplied.
        found: usize,
    },

    /// A hex value contains a non-hex character.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// An unsigned field was given a negative value.
    #[error("negative value not allowed: {0}")]
    Negative(String),

    /// A numeric value does not fit in 256 bits.
    #[error("value exceeds 2^256 - 1: {0}")]
    Overflow(String),

    /// A string is not a valid unsigned integer literal.
    #[error("invalid unsigned integer: {0:?}")]
    InvalidInteger(String),

    /// Wraps another encoding error with the name of the offending field.
    #[error("field `{field}`: {source}")]
    Field {
        /// Schema name of the field.
        field: String,
        /// The underlying failure.
        #[source]
        source: Box<EncodingError>,
    },
}

impl EncodingError {
    /// Attach a field name to this error.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }
}

/// Errors from building a tree or addressing its leaves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// `build` was called with no leaves.
    #[error("cannot build a Merkle tree from zero leaves")]
    Empty,

    /// A proof was requested for a position past the last leaf.
    #[error("leaf index {index} out of range for tree with {leaf_count} leaves")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of leaves in the tree.
        leaf_count: usize,
    },

    /// A proof was requested for a leaf digest the tree does not contain.
    #[error("leaf {0} is not present in the tree")]
    LeafNotFound(Digest),
}
