//! # merkledrop-core — Foundational Types for Merkle Drops
//!
//! This crate defines the value types every other `merkledrop-*` crate
//! operates on. It performs no hashing itself; it only fixes what a digest,
//! a record field, and a leaf encoding *are*.
//!
//! ## Key Design Principles
//!
//! 1. **`Digest` is always 32 bytes.** The newtype wraps `[u8; 32]`, orders
//!    byte-lexicographically, and renders as `0x`-prefixed lowercase hex.
//!
//! 2. **Validated field primitives.** `Address` and `Uint256` can only be
//!    constructed through parsers that enforce width and sign, so a leaf
//!    encoder never sees an out-of-range value.
//!
//! 3. **The leaf encoding is data.** `LeafEncoding` bundles the hash
//!    algorithm, the leaf scheme, and the record schema. It is written into
//!    every exported artifact so independent verifiers can reproduce leaves
//!    bit-for-bit.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `merkledrop-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod field;
pub mod schema;

// Re-export primary types for ergonomic imports.
pub use digest::{Digest, HashAlgorithm};
pub use error::{EncodingError, MerkleDropError, TreeError};
pub use field::{Address, FieldValue, Uint256};
pub use schema::{
    FieldSpec, FieldType, LeafEncoding, LeafScheme, Packing, Record, RecordSchema, SchemaPreset,
};
