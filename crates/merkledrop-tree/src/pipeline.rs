//! # Commitment Pipeline
//!
//! `records → validate/encode → leaves → tree → artifact`.
//!
//! Records that fail to encode are reported and skipped; they never reach
//! the tree. Surviving records keep their relative input order, and their
//! leaf position is their position among survivors.

use merkledrop_core::{EncodingError, LeafEncoding, MerkleDropError, Record, TreeError};

use crate::artifact::{export, identity_fields, Artifact};
use crate::leaf::{leaf_digest, SchemaEncoder};
use crate::tree::MerkleTree;

/// A record excluded from the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Zero-based position in the input.
    pub position: usize,
    /// Why the record was rejected.
    pub error: EncodingError,
}

/// The result of committing a record set.
#[derive(Debug, Clone)]
pub struct Commitment {
    /// The built tree.
    pub tree: MerkleTree,
    /// The exportable artifact for [`Commitment::tree`].
    pub artifact: Artifact,
    /// Records that did not encode, in input order.
    pub rejected: Vec<RejectedRecord>,
}

/// Encode `records` under `encoding`, build the tree, and export proofs.
///
/// # Errors
///
/// Returns [`TreeError::Empty`] (wrapped) when no record survives
/// validation. Individual invalid records are not errors; they are listed
/// in [`Commitment::rejected`].
pub fn commit(encoding: &LeafEncoding, records: &[Record]) -> Result<Commitment, MerkleDropError> {
    let schema = &encoding.schema;
    let mut leaves = Vec::with_capacity(records.len());
    let mut identities = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    let encoder = SchemaEncoder::new(schema.clone());

    for (position, record) in records.iter().enumerate() {
        // The leaf goes through the encoder; the parsed values only shape
        // the artifact's identity fields.
        let parsed = leaf_digest(&encoder, record, encoding.leaf, encoding.hash)
            .and_then(|leaf| schema.parse_record(record).map(|values| (leaf, values)));
        match parsed {
            Ok((leaf, values)) => {
                leaves.push(leaf);
                identities.push(identity_fields(schema, record, &values));
            }
            Err(error) => {
                tracing::warn!(position, error = %error, "skipping invalid record");
                rejected.push(RejectedRecord { position, error });
            }
        }
    }

    if leaves.is_empty() {
        return Err(TreeError::Empty.into());
    }

    let tree = build_tree(encoding, leaves)?;
    let artifact = export(encoding, &tree, identities)?;

    tracing::info!(
        root = %tree.root(),
        leaves = tree.leaf_count(),
        rejected = rejected.len(),
        hash = %encoding.hash,
        leaf = %encoding.leaf,
        "committed record set"
    );

    Ok(Commitment {
        tree,
        artifact,
        rejected,
    })
}

#[cfg(not(feature = "parallel"))]
fn build_tree(
    encoding: &LeafEncoding,
    leaves: Vec<merkledrop_core::Digest>,
) -> Result<MerkleTree, TreeError> {
    crate::tree::build(encoding.hash, leaves)
}

#[cfg(feature = "parallel")]
fn build_tree(
    encoding: &LeafEncoding,
    leaves: Vec<merkledrop_core::Digest>,
) -> Result<MerkleTree, TreeError> {
    crate::tree::par_build(encoding.hash, leaves)
}
