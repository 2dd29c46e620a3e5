//! # Build and Root Subcommands
//!
//! `build` runs the full pipeline and writes the artifact; `root` runs the
//! same pipeline and prints only the root, for scripting.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use merkledrop_core::LeafEncoding;
use merkledrop_tree::pipeline::{commit, Commitment, RejectedRecord};

use crate::input::load_records;
use crate::GlobalOptions;

/// Arguments for `merkledrop build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// JSON file with the records to commit.
    #[arg(long, short, value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the root/proof artifact.
    #[arg(long, short, value_name = "FILE", default_value = "merkle.json")]
    pub output: PathBuf,
}

/// Arguments for `merkledrop root`.
#[derive(Args, Debug)]
pub struct RootArgs {
    /// JSON file with the records to commit.
    #[arg(long, short, value_name = "FILE")]
    pub input: PathBuf,
}

/// Execute `merkledrop build`.
pub fn run_build(args: &BuildArgs, opts: &GlobalOptions) -> Result<u8> {
    let encoding = opts.encoding()?;
    let commitment = commit_file(&args.input, &encoding)?;

    commitment
        .artifact
        .write(&args.output)
        .with_context(|| format!("failed to write artifact: {}", args.output.display()))?;

    println!(
        "OK: root={} leaves={} rejected={} artifact={}",
        commitment.artifact.root,
        commitment.tree.leaf_count(),
        commitment.rejected.len(),
        args.output.display()
    );
    Ok(0)
}

/// Execute `merkledrop root`.
pub fn run_root(args: &RootArgs, opts: &GlobalOptions) -> Result<u8> {
    let encoding = opts.encoding()?;
    let commitment = commit_file(&args.input, &encoding)?;
    println!("{}", commitment.artifact.root);
    Ok(0)
}

/// Load `input` and commit it under `encoding`, reporting skipped records.
pub(crate) fn commit_file(input: &Path, encoding: &LeafEncoding) -> Result<Commitment> {
    let records = load_records(input)?;
    let commitment = commit(encoding, &records)
        .with_context(|| format!("failed to build tree from {}", input.display()))?;
    report_rejected(&commitment.rejected);
    Ok(commitment)
}

fn report_rejected(rejected: &[RejectedRecord]) {
    for r in rejected {
        eprintln!("SKIPPED: record #{}: {}", r.position, r.error);
    }
}
