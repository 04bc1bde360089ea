//! `default-params` subcommand: prints a starting params file.

use auxpow_params::ConsensusParams;

use crate::{args::SubcDefaultParams, util::write_output};

/// Chain id used when none is given.
const DEFAULT_CHAIN_ID: u32 = 1;

pub(crate) fn exec(cmd: SubcDefaultParams) -> anyhow::Result<()> {
    let chain_id = cmd.chain_id.unwrap_or(DEFAULT_CHAIN_ID);
    let params = if cmd.regtest {
        ConsensusParams::regtest(chain_id)
    } else {
        ConsensusParams::new(chain_id)
    };
    params.validate()?;

    write_output(cmd.output.as_deref(), &params.to_toml_string()?)
}
