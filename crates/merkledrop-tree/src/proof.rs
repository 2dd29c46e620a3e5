//! # Inclusion Proofs
//!
//! Generation walks a built [`MerkleTree`]; verification needs only a leaf,
//! its sibling path, and the published root.
//!
//! ## Proof Shape
//!
//! A proof lists one sibling per layer in which the leaf's ancestor had a
//! sibling. A node carried up from an odd layer contributes nothing for
//! that layer. Because [`pair_hash`] sorts its inputs, a proof carries no
//! left/right flags.
//!
//! ## Security Invariant
//!
//! [`verify`] folds with the same [`pair_hash`] the builder uses. Any other
//! combine (e.g. positional concatenation) would reject every honest proof.

use merkledrop_core::{Digest, HashAlgorithm, LeafScheme, TreeError};

use crate::hash::pair_hash;
use crate::leaf::{leaf_digest, RecordEncoder};
use crate::tree::MerkleTree;

/// Sibling path for the leaf at `index`, from the leaf layer upward.
///
/// # Errors
///
/// Returns [`TreeError::IndexOutOfRange`] if `index >= tree.leaf_count()`.
pub fn proof_for(tree: &MerkleTree, index: usize) -> Result<Vec<Digest>, TreeError> {
    let leaf_count = tree.leaf_count();
    if index >= leaf_count {
        return Err(TreeError::IndexOutOfRange { index, leaf_count });
    }

    let layers = tree.layers();
    let mut proof = Vec::with_capacity(tree.depth());
    let mut pos = index;
    // The root layer has no siblings.
    for layer in &layers[..layers.len() - 1] {
        if let Some(sibling) = layer.get(pos ^ 1) {
            proof.push(*sibling);
        }
        // A carried odd node is appended after all pairs, so it also lands
        // at `pos / 2` in the next layer.
        pos /= 2;
    }
    Ok(proof)
}

/// Sibling path for the first leaf equal to `leaf`.
///
/// # Errors
///
/// Returns [`TreeError::LeafNotFound`] if the tree has no such leaf.
pub fn proof_for_leaf(tree: &MerkleTree, leaf: &Digest) -> Result<Vec<Digest>, TreeError> {
    let index = tree
        .position_of(leaf)
        .ok_or(TreeError::LeafNotFound(*leaf))?;
    proof_for(tree, index)
}

/// Check that `proof` links `leaf` to `root`.
///
/// Pure and total. A forged, stale, or malformed proof yields `false`.
pub fn verify(algorithm: HashAlgorithm, leaf: &Digest, proof: &[Digest], root: &Digest) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |current, sibling| pair_hash(algorithm, &current, sibling));
    computed == *root
}

/// Recompute the leaf from raw record fields and verify it.
///
/// This is the check an independent verifier performs: it never trusts a
/// precomputed leaf. Records that fail to encode are not members.
pub fn verify_record<E: RecordEncoder>(
    encoder: &E,
    record: &E::Record,
    scheme: LeafScheme,
    algorithm: HashAlgorithm,
    proof: &[Digest],
    root: &Digest,
) -> bool {
    match leaf_digest(encoder, record, scheme, algorithm) {
        Ok(leaf) => verify(algorithm, &leaf, proof, root),
        Err(e) => {
            tracing::debug!(error = %e, "record does not encode; treating as non-member");
            false
        }
    }
}
