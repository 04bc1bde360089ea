//! `expected-index` subcommand.

use auxpow_primitives::expected_index;

use crate::args::SubcExpectedIndex;

pub(crate) fn exec(cmd: SubcExpectedIndex) -> anyhow::Result<()> {
    println!("{}", expected_index(cmd.nonce, cmd.chain_id, cmd.height));
    Ok(())
}
