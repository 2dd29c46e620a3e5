//! # merkledrop-tree — Merkle Commitment Engine
//!
//! Builds a binary hash tree over a record set, publishes its root as a
//! compact commitment, and issues per-record inclusion proofs that any third
//! party can check against the root alone.
//!
//! ## Data Flow
//!
//! ```text
//! records ─► leaf (encode + hash) ─► tree::build ─► MerkleTree
//!                                                     │
//!                        proof::proof_for ◄───────────┤
//!                        artifact::export ◄───────────┘
//!
//! (leaf, proof, root) ─► proof::verify ─► bool        no tree needed
//! ```
//!
//! [`pipeline::commit`] runs the whole flow for JSON records.
//!
//! ## Security Invariant
//!
//! The builder and the verifier share one combine function,
//! [`hash::pair_hash`], which sorts its two inputs before hashing. A
//! verifier folding with any other combine rejects honest proofs; a
//! builder using any other combine publishes roots no Ethereum-side
//! verifier can check.
//!
//! ## Crate Policy
//!
//! - The tree is immutable once built. `build`, `proof_for`, and `verify`
//!   are free functions taking it explicitly.
//! - All operations are synchronous, CPU-bound, and free of global state.
//! - No `unsafe` code.

pub mod artifact;
pub mod hash;
pub mod leaf;
pub mod pipeline;
pub mod proof;
pub mod tree;

pub use artifact::{export, Artifact, ProofEntry};
pub use hash::{hash, pair_hash};
pub use leaf::{encode_fields, hash_leaf, leaf_digest, RecordEncoder, SchemaEncoder};
pub use pipeline::{commit, Commitment, RejectedRecord};
pub use proof::{proof_for, proof_for_leaf, verify, verify_record};
#[cfg(feature = "parallel")]
pub use tree::par_build;
pub use tree::{build, MerkleTree};
