//! Command line arguments for the `auxpow-tool` binary.

use std::path::PathBuf;

use argh::FromArgs;

/// Args.
#[derive(FromArgs)]
pub(crate) struct Args {
    #[argh(switch, description = "log at debug level", short = 'v')]
    pub(crate) verbose: bool,

    #[argh(switch, description = "emit logs as JSON")]
    pub(crate) json_logs: bool,

    #[argh(subcommand)]
    pub(crate) subc: Subcommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
pub(crate) enum Subcommand {
    CheckHeader(SubcCheckHeader),
    ExpectedIndex(SubcExpectedIndex),
    DecodeVersion(SubcDecodeVersion),
    DefaultParams(SubcDefaultParams),
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "check-header",
    description = "checks the proof-of-work of a hex-encoded header"
)]
pub(crate) struct SubcCheckHeader {
    #[argh(
        positional,
        description = "consensus-encoded header, followed by its auxpow if flagged"
    )]
    pub(crate) header: String,

    #[argh(
        option,
        description = "consensus params file, .json or .toml",
        short = 'p'
    )]
    pub(crate) params: PathBuf,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "expected-index",
    description = "computes the merge-mining slot of a chain"
)]
pub(crate) struct SubcExpectedIndex {
    #[argh(positional, description = "nonce from the parent coinbase")]
    pub(crate) nonce: u32,

    #[argh(positional, description = "chain id")]
    pub(crate) chain_id: u32,

    #[argh(positional, description = "merkle branch height")]
    pub(crate) height: u32,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "decode-version",
    description = "splits a header version into its fields"
)]
pub(crate) struct SubcDecodeVersion {
    #[argh(positional, description = "version, decimal or 0x-prefixed hex")]
    pub(crate) version: String,

    #[argh(
        option,
        description = "consensus params file to take the layout from (default layout)",
        short = 'p'
    )]
    pub(crate) params: Option<PathBuf>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "default-params",
    description = "prints default consensus params as TOML"
)]
pub(crate) struct SubcDefaultParams {
    #[argh(option, description = "chain id (default 1)", short = 'c')]
    pub(crate) chain_id: Option<u32>,

    #[argh(switch, description = "use the regtest pow limit")]
    pub(crate) regtest: bool,

    #[argh(
        option,
        description = "output file path (default stdout)",
        short = 'o'
    )]
    pub(crate) output: Option<PathBuf>,
}
