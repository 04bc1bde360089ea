//! Subcommand dispatch and argument parsing helpers.

use std::{fs, path::Path};

use anyhow::Context;
use auxpow_params::ConsensusParams;

use crate::{args::Subcommand, cmd};

/// Executes a subcommand.
pub(crate) fn exec_subc(subcommand: Subcommand) -> anyhow::Result<()> {
    match subcommand {
        Subcommand::CheckHeader(subc) => cmd::check_header::exec(subc),
        Subcommand::ExpectedIndex(subc) => cmd::expected_index::exec(subc),
        Subcommand::DecodeVersion(subc) => cmd::decode_version::exec(subc),
        Subcommand::DefaultParams(subc) => cmd::default_params::exec(subc),
    }
}

pub(crate) fn load_params(path: &Path) -> anyhow::Result<ConsensusParams> {
    ConsensusParams::load(path)
        .with_context(|| format!("failed to load params from {}", path.display()))
}

/// Parses a header version given in decimal, possibly negative, or as
/// 0x-prefixed hex of its 32 bits.
pub(crate) fn parse_version(s: &str) -> anyhow::Result<i32> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => {
            let bits = u32::from_str_radix(hex, 16)
                .with_context(|| format!("invalid hex version: {s}"))?;
            Ok(i32::from_le_bytes(bits.to_le_bytes()))
        }
        None => s
            .parse()
            .with_context(|| format!("invalid version: {s}")),
    }
}

/// Decodes a hex string, tolerating surrounding whitespace and a 0x prefix.
pub(crate) fn parse_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).context("invalid hex")
}

/// Writes `contents` to `output` if given, or to stdout.
pub(crate) fn write_output(output: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}
