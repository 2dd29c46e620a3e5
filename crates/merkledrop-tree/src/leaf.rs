//! # Leaf Encoding
//!
//! Turns a record into the bytes that are hashed into a leaf, then into the
//! leaf digest itself.
//!
//! ## Canonical Encoding
//!
//! Fields are written in schema order. In [`Packing::Packed`] mode each
//! field takes its natural width (address: 20 bytes, uint256/bytes32: 32
//! bytes big-endian), matching Solidity `abi.encodePacked`. In
//! [`Packing::Standard`] mode every field occupies a 32-byte word with
//! addresses left-padded, matching `abi.encode`. Every field type has a
//! fixed width, so field boundaries are unambiguous in both modes.
//!
//! ## Leaf Schemes
//!
//! - [`LeafScheme::Single`]: `hash(encode(record))`
//! - [`LeafScheme::Double`]: `hash(hash(encode(record)))`
//!
//! The scheme must be recorded with the root. A verifier that recomputes a
//! leaf under the other scheme rejects every proof.

use merkledrop_core::{
    Digest, EncodingError, FieldValue, HashAlgorithm, LeafScheme, Packing, Record, RecordSchema,
};

use crate::hash::hash;

/// Canonical serialization of one record type.
pub trait RecordEncoder {
    /// The record type this encoder accepts.
    type Record: ?Sized;

    /// Serialize `record` to its canonical bytes.
    ///
    /// Fails when a field violates its declared width or type.
    fn encode(&self, record: &Self::Record) -> Result<Vec<u8>, EncodingError>;
}

/// Encoder for JSON records driven by a [`RecordSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEncoder {
    schema: RecordSchema,
}

impl SchemaEncoder {
    /// Create an encoder for `schema`.
    pub fn new(schema: RecordSchema) -> Self {
        Self { schema }
    }

    /// The schema this encoder follows.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }
}

impl RecordEncoder for SchemaEncoder {
    type Record = Record;

    fn encode(&self, record: &Record) -> Result<Vec<u8>, EncodingError> {
        let values = self.schema.parse_record(record)?;
        Ok(encode_fields(self.schema.packing, &values))
    }
}

/// Concatenate already-validated field values.
pub fn encode_fields(packing: Packing, values: &[FieldValue]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 32);
    for value in values {
        match value {
            FieldValue::Address(a) => {
                if packing == Packing::Standard {
                    out.extend_from_slice(&[0u8; 12]);
                }
                out.extend_from_slice(a.as_bytes());
            }
            FieldValue::Uint256(u) => out.extend_from_slice(&u.to_be_bytes()),
            FieldValue::Bytes32(d) => out.extend_from_slice(d.as_bytes()),
        }
    }
    out
}

/// Derive a leaf digest from canonical record bytes.
pub fn hash_leaf(algorithm: HashAlgorithm, scheme: LeafScheme, encoded: &[u8]) -> Digest {
    let once = hash(algorithm, encoded);
    match scheme {
        LeafScheme::Single => once,
        LeafScheme::Double => hash(algorithm, once.as_bytes()),
    }
}

/// Encode `record` and derive its leaf digest.
pub fn leaf_digest<E: RecordEncoder>(
    encoder: &E,
    record: &E::Record,
    scheme: LeafScheme,
    algorithm: HashAlgorithm,
) -> Result<Digest, EncodingError> {
    let encoded = encoder.encode(record)?;
    Ok(hash_leaf(algorithm, scheme, &encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use merkledrop_core::SchemaPreset;
    use serde_json::{json, Value};

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn packed_allocation_layout() {
        let enc = SchemaEncoder::new(SchemaPreset::Allocation.schema());
        let bytes = enc
            .encode(&record(json!({
                "address": "0x0000000000000000000000000000000000000001",
                "amount": "100000000000000000"
            })))
            .unwrap();
        assert_eq!(bytes.len(), 20 + 32);
        assert_eq!(bytes[19], 0x01);
        // 0.1 ether = 0x016345785d8a0000
        assert_eq!(&bytes[44..], &[0x01, 0x63, 0x45, 0x78, 0x5d, 0x8a, 0x00, 0x00]);
    }

    #[test]
    fn standard_whitelist_layout() {
        let enc = SchemaEncoder::new(SchemaPreset::Whitelist.schema());
        let bytes = enc
            .encode(&record(json!({
                "index": 2,
                "address": "0x0000000000000000000000000000000000000003"
            })))
            .unwrap();
        assert_eq!(bytes.len(), 64);
        assert_eq!(bytes[31], 2);
        assert_eq!(&bytes[32..44], &[0u8; 12]);
        assert_eq!(bytes[63], 3);
    }

    #[test]
    fn address_leaf_matches_evm_keccak() {
        // keccak256(abi.encodePacked(address(1)))
        let enc = SchemaEncoder::new(SchemaPreset::Addresses.schema());
        let leaf = leaf_digest(
            &enc,
            &record(json!({"address": "0x0000000000000000000000000000000000000001"})),
            LeafScheme::Single,
            HashAlgorithm::Keccak256,
        )
        .unwrap();
        assert_eq!(
            leaf.to_hex(),
            "0x1468288056310c82aa4c01a7e12a10f8111a0560e72b700555479031b86c357d"
        );
    }

    #[test]
    fn allocation_leaf_vector() {
        let enc = SchemaEncoder::new(SchemaPreset::Allocation.schema());
        let leaf = leaf_digest(
            &enc,
            &record(json!({
                "address": "0x0000000000000000000000000000000000000001",
                "amount": "100000000000000000"
            })),
            LeafScheme::Single,
            HashAlgorithm::Keccak256,
        )
        .unwrap();
        assert_eq!(
            leaf.to_hex(),
            "0x240c0142747739356492934ed072a311047b0b65f6cfa134e240ee5e16e0bb1a"
        );
    }

    #[test]
    fn whitelist_double_hash_vector() {
        let enc = SchemaEncoder::new(SchemaPreset::Whitelist.schema());
        let leaf = leaf_digest(
            &enc,
            &record(json!({
                "index": 0,
                "address": "0x0000000000000000000000000000000000000001"
            })),
            LeafScheme::Double,
            HashAlgorithm::Keccak256,
        )
        .unwrap();
        assert_eq!(
            leaf.to_hex(),
            "0x0eb5be412f275a18f6e4d622aee4ff40b21467c926224771b782d4c095d1444b"
        );
    }

    #[test]
    fn double_is_hash_of_single() {
        let bytes = b"record";
        let single = hash_leaf(HashAlgorithm::Sha256, LeafScheme::Single, bytes);
        let double = hash_leaf(HashAlgorithm::Sha256, LeafScheme::Double, bytes);
        assert_ne!(single, double);
        assert_eq!(double, hash(HashAlgorithm::Sha256, single.as_bytes()));
    }

    #[test]
    fn invalid_field_is_an_encoding_error() {
        let enc = SchemaEncoder::new(SchemaPreset::Allocation.schema());
        let err = leaf_digest(
            &enc,
            &record(json!({"address": "0x01", "amount": 1})),
            LeafScheme::Single,
            HashAlgorithm::Keccak256,
        )
        .unwrap_err();
        assert!(matches!(err, EncodingError::Field { ref field, .. } if field == "address"));
    }

    struct RawBytes;

    impl RecordEncoder for RawBytes {
        type Record = [u8];

        fn encode(&self, record: &[u8]) -> Result<Vec<u8>, EncodingError> {
            Ok(record.to_vec())
        }
    }

    #[test]
    fn custom_encoders_plug_in() {
        let leaf = leaf_digest(&RawBytes, &b"abc"[..], LeafScheme::Single, HashAlgorithm::Keccak256)
            .unwrap();
        assert_eq!(leaf, hash(HashAlgorithm::Keccak256, b"abc"));
    }
}
