//! # Verify Subcommand
//!
//! Checks a claim the way an on-chain verifier would: the leaf is
//! recomputed from raw record fields under the artifact's published
//! encoding, then folded with the proof and compared to the root. The
//! artifact's stored proofs are a lookup convenience only; no precomputed
//! leaf is ever trusted.
//!
//! Exit code `0` means valid, `1` means invalid or not found.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use merkledrop_core::{Digest, LeafEncoding, Record};
use merkledrop_tree::artifact::Artifact;
use merkledrop_tree::leaf::SchemaEncoder;
use merkledrop_tree::proof::verify_record;

use crate::config::EncodingOverrides;
use crate::input::record_from_value;
use crate::GlobalOptions;

/// Arguments for `merkledrop verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Artifact written by `merkledrop build`.
    #[arg(long, value_name = "FILE")]
    pub artifact: PathBuf,

    /// The claimed record as JSON (an object, or a bare address string).
    #[arg(long, value_name = "JSON")]
    pub record: String,

    /// Sibling digests, comma-separated. Defaults to the artifact's entry
    /// for the record. Pass `--proof` with no value for an empty proof.
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub proof: Option<Vec<Digest>>,

    /// Root to verify against. Defaults to the artifact's root.
    #[arg(long)]
    pub root: Option<Digest>,
}

/// Execute `merkledrop verify`.
pub fn run_verify(args: &VerifyArgs, opts: &GlobalOptions) -> Result<u8> {
    let artifact = Artifact::read(&args.artifact)
        .with_context(|| format!("failed to load artifact: {}", args.artifact.display()))?;

    let value: Value =
        serde_json::from_str(&args.record).context("--record is not valid JSON")?;
    let record = record_from_value(value).context("invalid --record")?;

    let encoding = apply_overrides(artifact.encoding.clone(), &opts.overrides);

    let Some(proof) = select_proof(args.proof.as_deref(), &artifact, &encoding, &record) else {
        println!("FAIL: record not found in artifact {}", args.artifact.display());
        return Ok(1);
    };

    let root = args.root.unwrap_or(artifact.root);
    let encoder = SchemaEncoder::new(encoding.schema.clone());

    if verify_record(&encoder, &record, encoding.leaf, encoding.hash, &proof, &root) {
        println!("OK: record is included under root {root}");
        Ok(0)
    } else {
        println!("FAIL: proof does not link record to root {root}");
        Ok(1)
    }
}

/// An explicit `--proof` wins; otherwise the artifact entry whose fields
/// match `record` under the encoding actually used for verification.
fn select_proof(
    explicit: Option<&[Digest]>,
    artifact: &Artifact,
    encoding: &LeafEncoding,
    record: &Record,
) -> Option<Vec<Digest>> {
    match explicit {
        Some(proof) => Some(proof.to_vec()),
        None => artifact
            .find_entry_by(&encoding.schema, record)
            .map(|entry| entry.proof.clone()),
    }
}

/// Command-line flags replace the artifact's published encoding. The
/// configuration file is not consulted: the artifact already records how
/// its leaves were built.
fn apply_overrides(mut encoding: LeafEncoding, overrides: &EncodingOverrides) -> LeafEncoding {
    if let Some(preset) = overrides.schema {
        encoding.schema = preset.schema();
    }
    if let Some(leaf) = overrides.leaf {
        encoding.leaf = leaf;
    }
    if let Some(hash) = overrides.hash {
        encoding.hash = hash;
    }
    if *overrides != EncodingOverrides::default() {
        tracing::warn!(
            hash = %encoding.hash,
            leaf = %encoding.leaf,
            "verifying with an encoding that differs from the artifact's"
        );
    }
    encoding
}

#[cfg(test)]
mod tests {
    use super::*;
    use merkledrop_core::{LeafScheme, SchemaPreset};

    #[test]
    fn overrides_replace_published_encoding() {
        let published = LeafEncoding::preset(SchemaPreset::Whitelist);
        let overrides = EncodingOverrides {
            leaf: Some(LeafScheme::Single),
            ..Default::default()
        };
        let enc = apply_overrides(published.clone(), &overrides);
        assert_eq!(enc.leaf, LeafScheme::Single);
        assert_eq!(enc.schema, published.schema);

        let unchanged = apply_overrides(published.clone(), &EncodingOverrides::default());
        assert_eq!(unchanged, published);
    }

    fn one_leaf_artifact() -> Artifact {
        let encoding = LeafEncoding::preset(SchemaPreset::Whitelist);
        let record: Record = serde_json::from_str(
            r#"{"index": 0, "address": "0x0000000000000000000000000000000000000001"}"#,
        )
        .unwrap();
        merkledrop_tree::pipeline::commit(&encoding, &[record])
            .unwrap()
            .artifact
    }

    #[test]
    fn empty_proof_can_be_given_explicitly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merkle.json");
        one_leaf_artifact().write(&path).unwrap();

        let args = VerifyArgs {
            artifact: path,
            record: r#"{"index": 0, "address": "0x0000000000000000000000000000000000000001"}"#
                .into(),
            proof: Some(Vec::new()),
            root: None,
        };
        assert_eq!(run_verify(&args, &GlobalOptions::default()).unwrap(), 0);
    }

    #[test]
    fn lookup_uses_overridden_schema() {
        let artifact = one_leaf_artifact();
        let record: Record =
            serde_json::from_str(r#"{"address": "0x0000000000000000000000000000000000000001"}"#)
                .unwrap();

        let published = artifact.encoding.clone();
        assert!(select_proof(None, &artifact, &published, &record).is_none());

        let overridden = apply_overrides(
            published,
            &EncodingOverrides {
                schema: Some(SchemaPreset::Addresses),
                ..Default::default()
            },
        );
        assert_eq!(
            select_proof(None, &artifact, &overridden, &record),
            Some(Vec::new())
        );
    }

    #[test]
    fn missing_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = VerifyArgs {
            artifact: dir.path().join("merkle.json"),
            record: "{}".into(),
            proof: None,
            root: None,
        };
        assert!(run_verify(&args, &GlobalOptions::default()).is_err());
    }
}
