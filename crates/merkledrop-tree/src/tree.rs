//! # Merkle Tree Construction
//!
//! Builds an immutable layered tree over an ordered sequence of leaf
//! digests.
//!
//! ## Algorithm
//!
//! ```text
//! layer[0]   = leaves (input order, positions are proof addresses)
//! layer[k+1] = pair_hash(layer[k][2i], layer[k][2i+1]) for each full pair
//!              ++ layer[k][last]  if layer[k] has odd length
//! root       = the single digest of the last layer
//! ```
//!
//! An unpaired node is carried up unchanged: it is neither hashed with
//! itself nor padded. This fixes both the root and the proof shape for
//! leaf counts that are not powers of two, and matches `merkletreejs` with
//! `sortPairs: true`.
//!
//! ## Concurrency
//!
//! Layers are built strictly in sequence. Within one layer every pair is
//! independent; with the `parallel` feature, [`par_build`] hashes large
//! layers on the rayon pool and produces a tree identical to [`build`].

use merkledrop_core::{Digest, HashAlgorithm, TreeError};

use crate::hash::pair_hash;

/// Layers shorter than this are combined sequentially by [`par_build`].
#[cfg(feature = "parallel")]
pub const PARALLEL_CUTOFF: usize = 2048;

/// An immutable Merkle tree.
///
/// Holds every layer from the leaves up to the root. There is no mutating
/// API; a changed record set means building a new tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    algorithm: HashAlgorithm,
    layers: Vec<Vec<Digest>>,
    root: Digest,
}

impl MerkleTree {
    /// The root digest committing to every leaf.
    pub fn root(&self) -> Digest {
        self.root
    }

    /// The hash algorithm used for internal nodes.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// All layers, leaves first, root layer last.
    pub fn layers(&self) -> &[Vec<Digest>] {
        &self.layers
    }

    /// The leaf layer in original order.
    pub fn leaves(&self) -> &[Digest] {
        // `build` never produces a tree without a leaf layer.
        self.layers.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Number of layers above the leaves (0 for a single-leaf tree).
    pub fn depth(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }

    /// Position of the first leaf equal to `leaf`.
    pub fn position_of(&self, leaf: &Digest) -> Option<usize> {
        self.leaves().iter().position(|l| l == leaf)
    }

    fn from_layers(algorithm: HashAlgorithm, layers: Vec<Vec<Digest>>) -> Result<Self, TreeError> {
        let root = layers
            .last()
            .and_then(|top| top.first())
            .copied()
            .ok_or(TreeError::Empty)?;
        Ok(Self {
            algorithm,
            layers,
            root,
        })
    }
}

/// Build a tree over `leaves` with sorted-pair hashing.
///
/// # Errors
///
/// Returns [`TreeError::Empty`] if `leaves` is empty.
pub fn build(algorithm: HashAlgorithm, leaves: Vec<Digest>) -> Result<MerkleTree, TreeError> {
    build_with(algorithm, leaves, next_layer)
}

/// Build a tree over `leaves`, combining large layers in parallel.
///
/// Produces exactly the tree [`build`] produces.
///
/// # Errors
///
/// Returns [`TreeError::Empty`] if `leaves` is empty.
#[cfg(feature = "parallel")]
pub fn par_build(algorithm: HashAlgorithm, leaves: Vec<Digest>) -> Result<MerkleTree, TreeError> {
    build_with(algorithm, leaves, |algorithm, layer| {
        if layer.len() < PARALLEL_CUTOFF {
            next_layer(algorithm, layer)
        } else {
            par_next_layer(algorithm, layer)
        }
    })
}

fn build_with(
    algorithm: HashAlgorithm,
    leaves: Vec<Digest>,
    combine: impl Fn(HashAlgorithm, &[Digest]) -> Vec<Digest>,
) -> Result<MerkleTree, TreeError> {
    if leaves.is_empty() {
        return Err(TreeError::Empty);
    }
    let mut layers = vec![leaves];
    while let Some(current) = layers.last().filter(|layer| layer.len() > 1) {
        let next = combine(algorithm, current);
        tracing::debug!(layer = layers.len(), nodes = next.len(), "built layer");
        layers.push(next);
    }
    MerkleTree::from_layers(algorithm, layers)
}

/// Combine one layer into the next, carrying an odd tail node up unchanged.
fn next_layer(algorithm: HashAlgorithm, layer: &[Digest]) -> Vec<Digest> {
    let mut next = Vec::with_capacity(layer.len().div_ceil(2));
    let mut pairs = layer.chunks_exact(2);
    for pair in &mut pairs {
        next.push(pair_hash(algorithm, &pair[0], &pair[1]));
    }
    if let [odd] = pairs.remainder() {
        next.push(*odd);
    }
    next
}

#[cfg(feature = "parallel")]
fn par_next_layer(algorithm: HashAlgorithm, layer: &[Digest]) -> Vec<Digest> {
    use rayon::prelude::*;

    let mut next: Vec<Digest> = layer
        .par_chunks_exact(2)
        .map(|pair| pair_hash(algorithm, &pair[0], &pair[1]))
        .collect();
    if layer.len() % 2 == 1 {
        next.extend(layer.last().copied());
    }
    next
}
