//! # Hash Primitive
//!
//! `hash` maps bytes to a 32-byte [`Digest`] under the selected
//! [`HashAlgorithm`]. `pair_hash` combines two child digests into their
//! parent:
//!
//! ```text
//! pair_hash(a, b) = hash(min(a, b) || max(a, b))
//! ```
//!
//! Sorting the children makes the combine commutative, so a proof needs no
//! left/right flags and verification folds siblings in order.

use merkledrop_core::{Digest, HashAlgorithm};
use sha2::Digest as _;
use sha2::Sha256;
use sha3::Keccak256;

/// Hash arbitrary bytes to a digest.
pub fn hash(algorithm: HashAlgorithm, data: &[u8]) -> Digest {
    let bytes: [u8; 32] = match algorithm {
        HashAlgorithm::Keccak256 => Keccak256::digest(data).into(),
        HashAlgorithm::Sha256 => Sha256::digest(data).into(),
    };
    Digest::new(bytes)
}

/// Combine two child digests into their parent using sorted-pair ordering.
pub fn pair_hash(algorithm: HashAlgorithm, a: &Digest, b: &Digest) -> Digest {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo.as_bytes());
    buf[32..].copy_from_slice(hi.as_bytes());
    hash(algorithm, &buf)
}
