//! Consensus parameters for merged-mining verification.

mod errors;
mod params;
pub mod serde_helpers;

pub use errors::ParamsError;
pub use params::{
    ConsensusParams, DEFAULT_MAX_MERKLE_HEIGHT, MAINNET_POW_LIMIT, MAX_SUPPORTED_MERKLE_HEIGHT,
    REGTEST_POW_LIMIT,
};
