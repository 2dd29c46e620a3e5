//! # merkledrop CLI entry point
//!
//! Parses command-line arguments, initializes tracing, and dispatches to
//! subcommand handlers. Handlers return a process exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use merkledrop_cli::build::{run_build, run_root, BuildArgs, RootArgs};
use merkledrop_cli::config::EncodingOverrides;
use merkledrop_cli::proof::{run_proof, ProofArgs};
use merkledrop_cli::verify::{run_verify, VerifyArgs};
use merkledrop_cli::GlobalOptions;
use merkledrop_core::{HashAlgorithm, LeafScheme, SchemaPreset};

/// merkledrop: Merkle commitments for airdrops and whitelists.
///
/// Builds a sorted-pair Merkle tree over JSON records, exports the root and
/// one inclusion proof per record, and verifies claims against a published
/// root.
#[derive(Parser, Debug)]
#[command(name = "merkledrop", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML drop configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Built-in record schema (addresses, allocation, whitelist).
    #[arg(long, global = true, value_name = "PRESET")]
    schema: Option<SchemaPreset>,

    /// Leaf hashing scheme (single, double).
    #[arg(long, global = true, value_name = "SCHEME")]
    leaf: Option<LeafScheme>,

    /// Hash algorithm (keccak256, sha256).
    #[arg(long, global = true, value_name = "ALGORITHM")]
    hash: Option<HashAlgorithm>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the tree and write the root/proof artifact.
    Build(BuildArgs),

    /// Print the inclusion proof of one record.
    Proof(ProofArgs),

    /// Verify a record against an artifact's root.
    Verify(VerifyArgs),

    /// Print only the root of a record set.
    Root(RootArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("merkledrop CLI starting");

    let opts = GlobalOptions {
        config: cli.config,
        overrides: EncodingOverrides {
            schema: cli.schema,
            leaf: cli.leaf,
            hash: cli.hash,
        },
    };

    let result = match cli.command {
        Commands::Build(args) => run_build(&args, &opts),
        Commands::Proof(args) => run_proof(&args, &opts),
        Commands::Verify(args) => run_verify(&args, &opts),
        Commands::Root(args) => run_root(&args, &opts),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
