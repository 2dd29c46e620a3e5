//! # Field Primitives
//!
//! Validated newtypes for the values records are made of: 20-byte
//! Ethereum addresses and 256-bit unsigned integers. Both parse from the
//! loose forms found in snapshot files (JSON numbers, decimal strings, hex
//! strings) and reject anything that would not survive a fixed-width
//! encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::digest::{decode_fixed_hex, strip_hex_prefix, Digest};
use crate::error::EncodingError;

/// A 20-byte Ethereum address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Address width in bytes.
    pub const LEN: usize = 20;

    /// Wrap raw address bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Access the raw address bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Render as `0x` + 40 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse a JSON value holding a hex address string.
    pub fn from_json(value: &Value) -> Result<Self, EncodingError> {
        match value {
            Value::String(s) => s.parse(),
            other => Err(EncodingError::UnexpectedValue {
                expected: "address",
                found: describe(other),
            }),
        }
    }
}

impl FromStr for Address {
    type Err = EncodingError;

    /// Parses exactly 40 hex digits, with or without `0x`. Mixed-case
    /// (checksummed) input is accepted but the checksum is not enforced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex::<20>(s).map(Self)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An unsigned 256-bit integer, stored big-endian.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint256([u8; 32]);

impl Uint256 {
    /// Zero.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Construct from big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The 32-byte big-endian representation.
    pub const fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the value as `u64` if it fits.
    pub fn as_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(low))
    }

    /// Render in base 10.
    pub fn to_decimal_string(&self) -> String {
        let mut n = self.0;
        let mut digits: Vec<u8> = Vec::new();
        loop {
            let mut rem: u16 = 0;
            for byte in n.iter_mut() {
                let cur = (rem << 8) | u16::from(*byte);
                *byte = (cur / 10) as u8;
                rem = cur % 10;
            }
            digits.push(b'0' + rem as u8);
            if n.iter().all(|b| *b == 0) {
                break;
            }
        }
        digits.iter().rev().map(|d| char::from(*d)).collect()
    }

    /// Parse a JSON value: a non-negative integer, a decimal string, or a
    /// `0x` hex string.
    pub fn from_json(value: &Value) -> Result<Self, EncodingError> {
        match value {
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(Self::from(u))
                } else if n.as_i64().is_some() || n.as_f64().is_some_and(|f| f < 0.0) {
                    Err(EncodingError::Negative(n.to_string()))
                } else {
                    // Non-integral, or too large for serde_json's integer
                    // representation. Amounts beyond u64 must be strings.
                    Err(EncodingError::UnexpectedValue {
                        expected: "uint256",
                        found: format!("number {n}"),
                    })
                }
            }
            Value::String(s) => s.parse(),
            other => Err(EncodingError::UnexpectedValue {
                expected: "uint256",
                found: describe(other),
            }),
        }
    }

    fn parse_decimal(digits: &str) -> Result<Self, EncodingError> {
        let mut out = [0u8; 32];
        for c in digits.bytes() {
            if !c.is_ascii_digit() {
                return Err(EncodingError::InvalidInteger(digits.to_string()));
            }
            let mut carry = u16::from(c - b'0');
            for byte in out.iter_mut().rev() {
                let v = u16::from(*byte) * 10 + carry;
                *byte = (v & 0xff) as u8;
                carry = v >> 8;
            }
            if carry != 0 {
                return Err(EncodingError::Overflow(digits.to_string()));
            }
        }
        Ok(Self(out))
    }

    fn parse_hex(input: &str, digits: &str) -> Result<Self, EncodingError> {
        if digits.is_empty() {
            return Err(EncodingError::InvalidInteger(input.to_string()));
        }
        let significant = digits.trim_start_matches('0');
        if significant.len() > 64 {
            return Err(EncodingError::Overflow(input.to_string()));
        }
        let padded = format!("{significant:0>64}");
        let mut out = [0u8; 32];
        hex::decode_to_slice(&padded, &mut out)
            .map_err(|e| EncodingError::InvalidHex(format!("{input:?}: {e}")))?;
        Ok(Self(out))
    }
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        let mut out = [0u8; 32];
        out[24..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }
}

impl FromStr for Uint256 {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('-') {
            return Err(EncodingError::Negative(trimmed.to_string()));
        }
        if trimmed.is_empty() {
            return Err(EncodingError::InvalidInteger(s.to_string()));
        }
        let digits = strip_hex_prefix(trimmed);
        if digits.len() != trimmed.len() {
            Self::parse_hex(trimmed, digits)
        } else {
            Self::parse_decimal(trimmed)
        }
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint256({})", self.to_decimal_string())
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

/// A parsed, width-checked record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// 20-byte address.
    Address(Address),
    /// 256-bit unsigned integer.
    Uint256(Uint256),
    /// Opaque 32-byte word.
    Bytes32(Digest),
}

impl FieldValue {
    /// Normalized JSON form: lowercase `0x` hex for byte values, a decimal
    /// string for integers.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Address(a) => Value::String(a.to_hex()),
            Self::Uint256(u) => Value::String(u.to_decimal_string()),
            Self::Bytes32(d) => Value::String(d.to_hex()),
        }
    }
}

/// Short description of a JSON value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
