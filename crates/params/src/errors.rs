use std::io;

use auxpow_primitives::{TargetError, VersionError};
use thiserror::Error;

/// Errors from loading or validating [`ConsensusParams`](crate::ConsensusParams).
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("invalid version layout: {0}")]
    Version(#[from] VersionError),

    #[error("max merkle height {height} exceeds supported maximum {max}")]
    MerkleHeightTooLarge { height: u32, max: u32 },

    #[error("invalid pow limit: {0}")]
    PowLimit(#[from] TargetError),

    #[error("parse toml: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("serialize toml: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("parse json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] io::Error),
}
