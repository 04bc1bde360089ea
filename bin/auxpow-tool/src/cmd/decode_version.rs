//! `decode-version` subcommand: splits a version under a layout.

use auxpow_primitives::{VersionLayout, is_legacy};

use crate::{
    args::SubcDecodeVersion,
    util::{load_params, parse_version},
};

pub(crate) fn exec(cmd: SubcDecodeVersion) -> anyhow::Result<()> {
    let version = parse_version(&cmd.version)?;
    let layout = match cmd.params {
        Some(path) => load_params(&path)?.version_layout,
        None => VersionLayout::default(),
    };

    let fields = layout.decode(version);
    println!("version:      {version} ({version:#010x})");
    println!("base_version: {}", fields.base_version);
    println!("chain_id:     {}", fields.chain_id);
    println!("auxpow:       {}", fields.auxpow);
    println!("legacy:       {}", is_legacy(version));
    Ok(())
}
