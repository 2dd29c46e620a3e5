//! # Proof Subcommand
//!
//! Rebuilds the tree from the record file and prints one proof entry, in
//! the same shape as an entry of the artifact's `proofs` array, together
//! with the root it proves against.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use merkledrop_core::{Digest, TreeError};
use merkledrop_tree::artifact::ProofEntry;

use crate::build::commit_file;
use crate::GlobalOptions;

/// Arguments for `merkledrop proof`.
#[derive(Args, Debug)]
pub struct ProofArgs {
    /// JSON file with the committed records.
    #[arg(long, short, value_name = "FILE")]
    pub input: PathBuf,

    /// Leaf position of the record (skipped records take no position).
    #[arg(long)]
    pub index: usize,
}

#[derive(Serialize)]
struct ProofOutput<'a> {
    root: Digest,
    #[serde(flatten)]
    entry: &'a ProofEntry,
}

/// Execute `merkledrop proof`.
pub fn run_proof(args: &ProofArgs, opts: &GlobalOptions) -> Result<u8> {
    let encoding = opts.encoding()?;
    let commitment = commit_file(&args.input, &encoding)?;

    let leaf_count = commitment.tree.leaf_count();
    let entry = commitment
        .artifact
        .proofs
        .get(args.index)
        .ok_or(TreeError::IndexOutOfRange {
            index: args.index,
            leaf_count,
        })?;

    let output = ProofOutput {
        root: commitment.artifact.root,
        entry,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(0)
}
