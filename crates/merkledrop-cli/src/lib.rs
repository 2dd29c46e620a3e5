//! # merkledrop-cli — Command-Line Shell for merkledrop
//!
//! A thin shell over `merkledrop-tree`: it reads records and configuration
//! from disk, runs the commitment pipeline, and writes or checks artifacts.
//!
//! ## Subcommands
//!
//! - `merkledrop build`: build the tree, write the root/proof artifact.
//! - `merkledrop proof`: print one record's proof entry.
//! - `merkledrop verify`: check a record against an artifact's root.
//! - `merkledrop root`: print only the root.
//!
//! ```bash
//! merkledrop --schema allocation build -i recipients.json -o merkle.json
//! merkledrop --config drop.yaml root -i whitelist_data.json
//! merkledrop verify --artifact merkle.json --record '{"index":0,"address":"0x…"}'
//! ```
//!
//! ## Exit Codes
//!
//! `0` success or valid proof, `1` invalid proof or record not found,
//! `2` operational error.

pub mod build;
pub mod config;
pub mod input;
pub mod proof;
pub mod verify;

use std::path::PathBuf;

use anyhow::Result;

use merkledrop_core::LeafEncoding;

use crate::config::{DropConfig, EncodingOverrides};

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// YAML drop configuration, if any.
    pub config: Option<PathBuf>,
    /// Command-line encoding flags; they win over the configuration file.
    pub overrides: EncodingOverrides,
}

impl GlobalOptions {
    /// Resolve the leaf encoding for building a tree.
    pub fn encoding(&self) -> Result<LeafEncoding> {
        let config = match &self.config {
            Some(path) => DropConfig::load(path)?,
            None => DropConfig::default(),
        };
        config.with_overrides(&self.overrides).resolve()
    }
}
