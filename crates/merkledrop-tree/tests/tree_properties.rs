//! # Tree and Proof Properties
//!
//! Property tests over arbitrary leaf sets: determinism, soundness of every
//! generated proof, tamper sensitivity, leaf-scheme isolation, and
//! non-membership under random and adversarial proof search.

use merkledrop_core::{Digest, HashAlgorithm, LeafScheme};
use merkledrop_tree::{build, hash, hash_leaf, proof_for, verify};
use proptest::prelude::*;

const K: HashAlgorithm = HashAlgorithm::Keccak256;

fn digests(max: usize) -> impl Strategy<Value = Vec<Digest>> {
    prop::collection::vec(any::<[u8; 32]>().prop_map(Digest::new), 1..max)
}

fn algorithm() -> impl Strategy<Value = HashAlgorithm> {
    prop_oneof![Just(HashAlgorithm::Keccak256), Just(HashAlgorithm::Sha256)]
}

proptest! {
    /// The same ordered leaves always produce the same root.
    #[test]
    fn root_is_deterministic(leaves in digests(64), alg in algorithm()) {
        let a = build(alg, leaves.clone()).unwrap();
        let b = build(alg, leaves).unwrap();
        prop_assert_eq!(a.root(), b.root());
        prop_assert_eq!(a, b);
    }

    /// Every leaf verifies against the root with its own proof.
    #[test]
    fn every_leaf_verifies(leaves in digests(48), alg in algorithm()) {
        let tree = build(alg, leaves.clone()).unwrap();
        for (i, leaf) in leaves.iter().enumerate() {
            let proof = proof_for(&tree, i).unwrap();
            prop_assert!(proof.len() <= tree.depth());
            prop_assert!(verify(alg, leaf, &proof, &tree.root()));
        }
    }

    /// Flipping any single bit of any proof entry breaks verification.
    #[test]
    fn bit_flip_in_proof_is_rejected(
        leaves in digests(40),
        pick in any::<prop::sample::Index>(),
        entry in any::<prop::sample::Index>(),
        bit in 0usize..256,
    ) {
        let tree = build(K, leaves.clone()).unwrap();
        let i = pick.index(leaves.len());
        let mut proof = proof_for(&tree, i).unwrap();
        prop_assume!(!proof.is_empty());
        let e = entry.index(proof.len());
        let mut bytes = proof[e].into_bytes();
        bytes[bit / 8] ^= 1 << (bit % 8);
        proof[e] = Digest::new(bytes);
        prop_assert!(!verify(K, &leaves[i], &proof, &tree.root()));
    }

    /// Swapping two distinct proof entries breaks verification.
    #[test]
    fn swapped_proof_entries_are_rejected(
        leaves in digests(40),
        pick in any::<prop::sample::Index>(),
    ) {
        let tree = build(K, leaves.clone()).unwrap();
        let i = pick.index(leaves.len());
        let mut proof = proof_for(&tree, i).unwrap();
        prop_assume!(proof.len() >= 2 && proof[0] != proof[1]);
        proof.swap(0, 1);
        prop_assert!(!verify(K, &leaves[i], &proof, &tree.root()));
    }

    /// A leaf derived under one scheme never verifies as the other.
    #[test]
    fn leaf_schemes_are_isolated(
        records in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..80), 1..24),
        pick in any::<prop::sample::Index>(),
    ) {
        for (built, checked) in [
            (LeafScheme::Double, LeafScheme::Single),
            (LeafScheme::Single, LeafScheme::Double),
        ] {
            let leaves: Vec<Digest> = records.iter().map(|r| hash_leaf(K, built, r)).collect();
            let tree = build(K, leaves).unwrap();
            let i = pick.index(records.len());
            let proof = proof_for(&tree, i).unwrap();
            let wrong = hash_leaf(K, checked, &records[i]);
            prop_assert!(!verify(K, &wrong, &proof, &tree.root()));
        }
    }

    /// A foreign leaf does not verify with any member's proof, nor with
    /// sibling paths stitched together from arbitrary tree nodes.
    #[test]
    fn foreign_leaf_never_verifies(
        leaves in digests(16),
        foreign in any::<[u8; 32]>().prop_map(Digest::new),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        prop_assume!(!leaves.contains(&foreign));
        let tree = build(K, leaves.clone()).unwrap();
        let root = tree.root();

        for i in 0..leaves.len() {
            let proof = proof_for(&tree, i).unwrap();
            prop_assert!(!verify(K, &foreign, &proof, &root));
        }

        let nodes: Vec<Digest> = tree.layers().iter().flatten().copied().collect();
        let forged: Vec<Digest> = picks.iter().map(|p| nodes[p.index(nodes.len())]).collect();
        prop_assert!(!verify(K, &foreign, &forged, &root));
    }
}

#[test]
fn odd_sizes_verify_and_carry() {
    for n in [1usize, 3, 5, 7] {
        let leaves: Vec<Digest> = (0..n).map(|i| hash(K, &[i as u8])).collect();
        let tree = build(K, leaves.clone()).unwrap();
        for (i, leaf) in leaves.iter().enumerate() {
            let proof = proof_for(&tree, i).unwrap();
            assert!(verify(K, leaf, &proof, &tree.root()), "n={n} i={i}");
        }
        // The last leaf of an odd layer is carried, so the first layer above
        // the leaves ends with it unchanged.
        if n > 1 {
            assert_eq!(tree.layers()[1].last(), leaves.last());
        }
    }
}

#[test]
fn worked_example() {
    let l: Vec<Digest> = [&b"a"[..], b"b", b"c", b"d"].iter().map(|x| hash(K, x)).collect();
    let tree = build(K, l.clone()).unwrap();
    let proof = proof_for(&tree, 2).unwrap();
    assert_eq!(proof, vec![l[3], tree.layers()[1][0]]);
    assert!(verify(K, &l[2], &proof, &tree.root()));
}
