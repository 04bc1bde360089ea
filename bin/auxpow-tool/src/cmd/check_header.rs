//! `check-header` subcommand: checks a header's proof-of-work.

use anyhow::Context;
use auxpow_verification::{AuxBlockHeader, check_proof_of_work};
use tracing::*;

use crate::{
    args::SubcCheckHeader,
    util::{load_params, parse_hex},
};

/// Executes the `check-header` subcommand.
///
/// Prints the verdict and fails if the header is rejected.
pub(crate) fn exec(cmd: SubcCheckHeader) -> anyhow::Result<()> {
    let params = load_params(&cmd.params)?;
    let bytes = parse_hex(&cmd.header)?;
    let header = AuxBlockHeader::deserialize_with_layout(&bytes, &params.version_layout)
        .context("failed to decode header")?;

    let blkid = header.header.block_hash();
    debug!(%blkid, auxpow = header.auxpow().is_some(), "checking header");

    match check_proof_of_work(&header, &params) {
        Ok(()) => {
            println!("valid {blkid}");
            Ok(())
        }
        Err(reason) => {
            println!("rejected {blkid}: {reason}");
            anyhow::bail!("header rejected: {reason}")
        }
    }
}
