use std::{fs, path::Path};

use auxpow_primitives::{ChainId, PowAlgorithm, VersionLayout, decode_compact_target};
use bitcoin::CompactTarget;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{errors::ParamsError, serde_helpers::serde_compact_bits};

/// Default bound on the merge-mining tree height.
pub const DEFAULT_MAX_MERKLE_HEIGHT: u32 = 30;

/// Largest tree height a deployment may configure.
pub const MAX_SUPPORTED_MERKLE_HEIGHT: u32 = 30;

/// Bitcoin mainnet's proof-of-work limit.
pub const MAINNET_POW_LIMIT: u32 = 0x1d00_ffff;

/// Regtest proof-of-work limit, where roughly every other hash passes.
pub const REGTEST_POW_LIMIT: u32 = 0x207f_ffff;

/// Consensus rules the merged-mining checks run under.
///
/// Treated as an immutable snapshot for the duration of a check. Hosts that
/// need to swap parameters at runtime share them behind an `Arc` and replace
/// the whole value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ConsensusParams {
    /// Id of the chain these rules validate.
    pub chain_id: ChainId,

    /// Whether non-legacy headers must carry our chain id, and parent blocks
    /// must carry a different one.
    #[serde(default = "default_strict_chain_id")]
    pub strict_chain_id: bool,

    /// Maximum height of the chain merkle branch in an auxpow.
    #[serde(default = "default_max_merkle_height")]
    pub max_merkle_height: u32,

    #[serde(default)]
    pub pow_algorithm: PowAlgorithm,

    /// Easiest compact target a header may claim.
    #[serde(with = "serde_compact_bits", default = "default_pow_limit")]
    pub pow_limit: u32,

    #[serde(default)]
    pub version_layout: VersionLayout,
}

fn default_strict_chain_id() -> bool {
    true
}

fn default_max_merkle_height() -> u32 {
    DEFAULT_MAX_MERKLE_HEIGHT
}

fn default_pow_limit() -> u32 {
    MAINNET_POW_LIMIT
}

impl ConsensusParams {
    /// Mainnet-like parameters for `chain_id`.
    pub fn new(chain_id: u32) -> Self {
        Self {
            chain_id: ChainId::new(chain_id),
            strict_chain_id: default_strict_chain_id(),
            max_merkle_height: DEFAULT_MAX_MERKLE_HEIGHT,
            pow_algorithm: PowAlgorithm::default(),
            pow_limit: MAINNET_POW_LIMIT,
            version_layout: VersionLayout::default(),
        }
    }

    /// Parameters with a pow limit easy enough to mine headers in tests.
    pub fn regtest(chain_id: u32) -> Self {
        Self {
            pow_limit: REGTEST_POW_LIMIT,
            ..Self::new(chain_id)
        }
    }

    pub fn compact_pow_limit(&self) -> CompactTarget {
        CompactTarget::from_consensus(self.pow_limit)
    }

    /// Checks that the parameters are internally consistent.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_merkle_height > MAX_SUPPORTED_MERKLE_HEIGHT {
            return Err(ParamsError::MerkleHeightTooLarge {
                height: self.max_merkle_height,
                max: MAX_SUPPORTED_MERKLE_HEIGHT,
            });
        }

        // Our own blocks have to be able to carry the chain id.
        self.version_layout.with_base_version(0, self.chain_id)?;

        decode_compact_target(self.compact_pow_limit())?;
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ParamsError> {
        let params: Self = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ParamsError> {
        let params: Self = serde_json::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    /// Loads parameters from a file, parsed as JSON if the extension is
    /// `json` and as TOML otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ParamsError> {
        Ok(toml::to_string(self)?)
    }
}
