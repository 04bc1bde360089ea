//! Reasons a merged-mining proof is rejected.

use std::fmt;

use auxpow_primitives::{ChainId, PowError, TargetError};
use bitcoin::BlockHash;
use thiserror::Error;

use crate::commitment::Ambiguity;

/// Which merkle tree a proof failed to reach the expected root of.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProofTree {
    /// The parent block's transaction tree.
    ParentBlock,
    /// The merge-mining tree committed in the parent coinbase.
    ChainMerkle,
}

impl fmt::Display for ProofTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofTree::ParentBlock => f.write_str("parent block"),
            ProofTree::ChainMerkle => f.write_str("chain merkle"),
        }
    }
}

/// Why a header's proof-of-work was rejected.
///
/// Rejections come from untrusted input and are expected. None of them
/// indicates a bug in the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The auxpow's base transaction isn't the parent block's coinbase.
    #[error("auxpow base transaction is not a coinbase")]
    NotCoinbaseTransaction,

    /// The parent block claims the chain id of the chain it merge-mines.
    #[error("parent block carries our chain id {0}")]
    ChainIdCollision(ChainId),

    /// The chain merkle branch is taller than the consensus bound.
    #[error("chain merkle branch height {height} exceeds maximum {max}")]
    MerkleBranchTooLong {
        /// Height of the branch.
        height: usize,
        /// Configured maximum.
        max: u32,
    },

    /// The aux hash isn't at the slot derived from the nonce and chain id.
    #[error("chain index mismatch: expected {expected}, found {found}")]
    IndexMismatch { expected: u32, found: u32 },

    /// The coinbase doesn't commit to the root in exactly one unambiguous place.
    #[error("ambiguous coinbase commitment: {0}")]
    AmbiguousCoinbaseData(Ambiguity),

    /// A merkle proof doesn't lead to the root it has to.
    #[error("{0} merkle root mismatch")]
    MerkleRootMismatch(ProofTree),

    /// The committed tree size isn't `2^height` of the chain branch.
    #[error("committed tree size {found} doesn't match branch height {height}")]
    TreeSizeMismatch { height: u32, found: u32 },

    /// The commitment ends before its tree size and nonce.
    #[error("coinbase commitment is truncated")]
    TruncatedCommitment,

    /// The compact target can't be decoded into a usable target.
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] TargetError),

    /// The proof-of-work hash is above the target.
    #[error("pow hash {hash} doesn't meet target {bits:#010x}")]
    PowTargetNotMet { hash: BlockHash, bits: u32 },

    /// A non-legacy header carries a chain id other than ours.
    #[error("wrong chain id: expected {expected}, found {found}")]
    WrongChainId { expected: ChainId, found: ChainId },

    /// The version flags an auxpow but none is attached.
    #[error("auxpow flag set but no auxpow attached")]
    MissingAuxpowOnFlaggedBlock,

    /// An auxpow is attached but the version doesn't flag one.
    #[error("auxpow attached but flag not set")]
    UnexpectedAuxpowPresent,
}

impl From<PowError> for RejectReason {
    fn from(err: PowError) -> Self {
        match err {
            PowError::InvalidTarget(err) => RejectReason::InvalidTarget(err),
            PowError::TargetNotMet { hash, bits } => RejectReason::PowTargetNotMet { hash, bits },
        }
    }
}

/// Result of a merged-mining check.
pub type VerificationResult<T = ()> = Result<T, RejectReason>;
