//! # 32-Byte Digests and Hash Algorithm Tags
//!
//! Defines `Digest`, the unit the whole engine operates on, and
//! `HashAlgorithm`, the tag recording which one-way function produced it.
//!
//! ## Text Form
//!
//! Digests render as `0x` followed by 64 lowercase hex characters, the form
//! Ethereum tooling and on-chain verifiers consume. Parsing accepts either
//! case, with or without the prefix, and rejects every other length.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;

/// The hash function used for leaves and internal nodes.
///
/// The algorithm is a per-tree setting. It is recorded in exported
/// artifacts because verification must replicate it exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Keccak-256 as used by the EVM (not NIST SHA3-256).
    #[default]
    Keccak256,
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keccak256 => "keccak256",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keccak256" | "keccak" => Ok(Self::Keccak256),
            "sha256" => Ok(Self::Sha256),
            other => Err(format!(
                "unknown hash algorithm {other:?} (expected keccak256 or sha256)"
            )),
        }
    }
}

/// A 32-byte digest: a leaf, an internal node, or a root.
///
/// Ordering is byte-lexicographic, which is the order the sorted-pair
/// combine uses.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Digest width in bytes.
    pub const LEN: usize = 32;

    /// Wrap raw digest bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Access the raw digest bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Consume the digest, returning its bytes.
    pub const fn into_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Render as `0x` + 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse a 64-digit hex string, with or without `0x`.
    pub fn from_hex(input: &str) -> Result<Self, EncodingError> {
        decode_fixed_hex::<32>(input).map(Self)
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Strip an optional `0x`/`0X` prefix.
pub(crate) fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decode exactly `N` bytes of hex, with or without `0x`.
pub(crate) fn decode_fixed_hex<const N: usize>(input: &str) -> Result<[u8; N], EncodingError> {
    let digits = strip_hex_prefix(input.trim());
    if digits.len() != N * 2 {
        return Err(EncodingError::HexLength {
            expected: N * 2,
            found: digits.len(),
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out)
        .map_err(|e| EncodingError::InvalidHex(format!("{input:?}: {e}")))?;
    Ok(out)
}
