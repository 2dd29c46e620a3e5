//! # Commitment Artifact
//!
//! The persisted output of a drop: the root, the leaf encoding that
//! produced it, and one proof per committed record.
//!
//! ```json
//! {
//!   "root": "0x…",
//!   "encoding": { "hash": "keccak256", "leaf": "double", "packing": "standard",
//!                 "fields": [{ "name": "index", "type": "uint256" }, …] },
//!   "proofs": [ { "index": 0, "address": "0x…", "proof": ["0x…", …] }, … ]
//! }
//! ```
//!
//! Record-identifying fields are flattened into each proof entry in schema
//! order. Claim processors and on-chain verifiers recompute the leaf from
//! those raw fields and the published `encoding`; they never receive a
//! precomputed leaf.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use merkledrop_core::{
    Digest, FieldValue, LeafEncoding, MerkleDropError, Record, RecordSchema, TreeError,
};

use crate::leaf::SchemaEncoder;
use crate::proof::{proof_for, verify_record};
use crate::tree::MerkleTree;

/// Root, encoding, and per-record proofs of one commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// The published root.
    pub root: Digest,
    /// How leaves were derived from records.
    pub encoding: LeafEncoding,
    /// One entry per committed record, in leaf order.
    pub proofs: Vec<ProofEntry>,
}

/// A record's identifying fields and its inclusion proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofEntry {
    /// Schema fields of the record, normalized.
    #[serde(flatten)]
    pub fields: Record,
    /// Sibling path to the root.
    pub proof: Vec<Digest>,
}

/// Assemble an artifact from a built tree.
///
/// `identities[i]` are the identifying fields of leaf `i`.
///
/// # Errors
///
/// Returns [`TreeError::IndexOutOfRange`] if there are more identities than
/// leaves.
pub fn export(
    encoding: &LeafEncoding,
    tree: &MerkleTree,
    identities: Vec<Record>,
) -> Result<Artifact, TreeError> {
    let proofs = identities
        .into_iter()
        .enumerate()
        .map(|(i, fields)| {
            Ok(ProofEntry {
                fields,
                proof: proof_for(tree, i)?,
            })
        })
        .collect::<Result<Vec<_>, TreeError>>()?;

    Ok(Artifact {
        root: tree.root(),
        encoding: encoding.clone(),
        proofs,
    })
}

/// The identifying fields of a record as they appear in an artifact.
///
/// Keys follow schema order. Addresses become lowercase `0x` hex; integers
/// supplied as JSON numbers stay numbers, other integers become decimal
/// strings.
pub fn identity_fields(schema: &RecordSchema, record: &Record, values: &[FieldValue]) -> Record {
    schema
        .fields
        .iter()
        .zip(values)
        .map(|(spec, value)| {
            let json = match (record.get(&spec.name), value) {
                (Some(n @ Value::Number(_)), FieldValue::Uint256(_)) => n.clone(),
                _ => value.to_json(),
            };
            (spec.name.clone(), json)
        })
        .collect()
}

impl Artifact {
    /// An encoder for this artifact's record schema.
    pub fn encoder(&self) -> SchemaEncoder {
        SchemaEncoder::new(self.encoding.schema.clone())
    }

    /// The entry whose identifying fields equal those of `record`.
    ///
    /// Fields are compared after parsing, so `"0xABC…"` matches `"0xabc…"`
    /// and `7` matches `"7"`.
    pub fn find_entry(&self, record: &Record) -> Option<&ProofEntry> {
        self.find_entry_by(&self.encoding.schema, record)
    }

    /// Like [`Artifact::find_entry`], comparing fields under `schema`
    /// instead of the published one.
    pub fn find_entry_by(&self, schema: &RecordSchema, record: &Record) -> Option<&ProofEntry> {
        let wanted = schema.parse_record(record).ok()?;
        self.proofs
            .iter()
            .find(|entry| {
                schema
                    .parse_record(&entry.fields)
                    .is_ok_and(|values| values == wanted)
            })
    }

    /// Verify `record` against this artifact's root with an explicit proof.
    pub fn verify_record(&self, record: &Record, proof: &[Digest]) -> bool {
        verify_record(
            &self.encoder(),
            record,
            self.encoding.leaf,
            self.encoding.hash,
            proof,
            &self.root,
        )
    }

    /// Verify one of this artifact's own entries.
    pub fn verify_entry(&self, entry: &ProofEntry) -> bool {
        self.verify_record(&entry.fields, &entry.proof)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, MerkleDropError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load an artifact from a JSON file.
    pub fn read(path: &Path) -> Result<Self, MerkleDropError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the artifact as pretty JSON, replacing `path` atomically.
    pub fn write(&self, path: &Path) -> Result<(), MerkleDropError> {
        write_file_atomic(path, &self.to_json_pretty()?)
    }
}

/// Write `contents` to a uniquely named temp file beside `path`, then
/// persist it over `path`. The temp file is removed if any step fails.
pub fn write_file_atomic(path: &Path, contents: &str) -> Result<(), MerkleDropError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(parent)?;
    file.write_all(contents.as_bytes())?;
    file.write_all(b"\n")?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::{encode_fields, hash_leaf};
    use crate::tree::build;
    use merkledrop_core::SchemaPreset;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    fn whitelist_artifact() -> Artifact {
        let encoding = LeafEncoding::preset(SchemaPreset::Whitelist);
        let records: Vec<Record> = (0..3u64)
            .map(|i| {
                record(json!({
                    "index": i,
                    "address": format!("0x{:040x}", i + 1)
                }))
            })
            .collect();
        let mut leaves = Vec::new();
        let mut identities = Vec::new();
        for r in &records {
            let values = encoding.schema.parse_record(r).unwrap();
            leaves.push(hash_leaf(
                encoding.hash,
                encoding.leaf,
                &encode_fields(encoding.schema.packing, &values),
            ));
            identities.push(identity_fields(&encoding.schema, r, &values));
        }
        let tree = build(encoding.hash, leaves).unwrap();
        export(&encoding, &tree, identities).unwrap()
    }

    #[test]
    fn whitelist_root_vector() {
        let artifact = whitelist_artifact();
        assert_eq!(
            artifact.root.to_hex(),
            "0x39092475463aae463e92de67d302be6719c1b5d1972acf32b4f3a34ddab56aaa"
        );
        assert_eq!(
            artifact.proofs[2].proof,
            vec![Digest::from_hex(
                "0x1db846c695640bfaf8f98f8c93e9be9817926fa81509e53b2f7926eb0bf24d02"
            )
            .unwrap()]
        );
    }

    #[test]
    fn json_shape() {
        let artifact = whitelist_artifact();
        let v = serde_json::to_value(&artifact).unwrap();
        let root = v["root"].as_str().unwrap();
        assert!(root.starts_with("0x") && root.len() == 66);
        assert_eq!(v["encoding"]["leaf"], json!("double"));
        let entry = &v["proofs"][0];
        assert_eq!(entry["index"], json!(0));
        assert_eq!(
            entry["address"],
            json!("0x0000000000000000000000000000000000000001")
        );
        assert!(entry["proof"].is_array());

        let keys: Vec<&String> = entry.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["index", "address", "proof"]);
    }

    #[test]
    fn json_roundtrip_preserves_entries() {
        let artifact = whitelist_artifact();
        let text = artifact.to_json_pretty().unwrap();
        let back: Artifact = serde_json::from_str(&text).unwrap();
        assert_eq!(back, artifact);
    }

    #[test]
    fn every_entry_verifies() {
        let artifact = whitelist_artifact();
        for entry in &artifact.proofs {
            assert!(artifact.verify_entry(entry));
        }
    }

    #[test]
    fn find_entry_normalizes_fields() {
        let artifact = whitelist_artifact();
        let query = record(json!({
            "index": "1",
            "address": "0x0000000000000000000000000000000000000002"
        }));
        let entry = artifact.find_entry(&query).unwrap();
        assert_eq!(entry.fields["index"], json!(1));
        assert!(artifact.verify_record(&query, &entry.proof));

        let stranger = record(json!({
            "index": 1,
            "address": "0x0000000000000000000000000000000000000009"
        }));
        assert!(artifact.find_entry(&stranger).is_none());
    }

    #[test]
    fn find_entry_by_compares_under_given_schema() {
        let artifact = whitelist_artifact();
        let by_address = record(json!({
            "address": "0x0000000000000000000000000000000000000002"
        }));
        assert!(artifact.find_entry(&by_address).is_none());

        let addresses = SchemaPreset::Addresses.schema();
        let entry = artifact.find_entry_by(&addresses, &by_address).unwrap();
        assert_eq!(entry.fields["index"], json!(1));
    }

    #[test]
    fn tampered_record_fails() {
        let artifact = whitelist_artifact();
        let entry = &artifact.proofs[1];
        let mut forged = entry.fields.clone();
        forged.insert("index".into(), json!(2));
        assert!(!artifact.verify_record(&forged, &entry.proof));
    }

    #[test]
    fn large_amounts_are_exported_as_decimal_strings() {
        let schema = SchemaPreset::Allocation.schema();
        let r = record(json!({
            "address": "0x000000000000000000000000000000000000000A",
            "amount": "0x2b5e3af16b1880000"
        }));
        let values = schema.parse_record(&r).unwrap();
        let ids = identity_fields(&schema, &r, &values);
        assert_eq!(
            ids["address"],
            json!("0x000000000000000000000000000000000000000a")
        );
        assert_eq!(ids["amount"], json!("50000000000000000000"));
    }

    #[test]
    fn export_rejects_surplus_identities() {
        let encoding = LeafEncoding::preset(SchemaPreset::Addresses);
        let tree = build(encoding.hash, vec![Digest::new([1; 32])]).unwrap();
        let err = export(&encoding, &tree, vec![Record::new(), Record::new()]).unwrap_err();
        assert!(matches!(err, TreeError::IndexOutOfRange { index: 1, .. }));
    }

    #[test]
    fn write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merkle.json");
        let artifact = whitelist_artifact();
        artifact.write(&path).unwrap();
        assert_eq!(Artifact::read(&path).unwrap(), artifact);
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn write_leaves_neighbouring_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merkle.json");
        let neighbour = dir.path().join("merkle.tmp");
        fs::write(&neighbour, "[]").unwrap();

        whitelist_artifact().write(&path).unwrap();
        assert_eq!(fs::read_to_string(&neighbour).unwrap(), "[]");
    }

    #[test]
    fn write_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("absent").join("merkle.json");
        assert!(matches!(
            whitelist_artifact().write(&missing_dir),
            Err(MerkleDropError::Io(_))
        ));
        assert!(!dir.path().join("absent").exists());
    }
}
