//! Locating the merge-mining commitment in a parent coinbase script.
//!
//! The commitment is `[marker] root tree_size nonce`, where the marker is
//! optional. A script may contain arbitrary other bytes, including decoy
//! commitments, so the scan only accepts a root that can be read in exactly
//! one way:
//!
//! - with a marker, there must be exactly one marker and the root must start
//!   right after it;
//! - without a marker, the root must start in the leading bytes of the script.

use auxpow_primitives::Buf32;
use thiserror::Error;

use crate::errors::{ProofTree, RejectReason, VerificationResult};

/// Marker that may precede the committed root.
pub const MERGED_MINING_MARKER: [u8; 4] = [0xfa, 0xbe, b'm', b'm'];

/// Largest offset at which an unmarked root may start.
///
/// Leaves room for the push opcode, block height and extra nonce a miner puts
/// in front of it.
pub const MAX_HEADERLESS_ROOT_OFFSET: usize = 20;

/// Size of the tree size and nonce trailer following the root.
const TRAILER_LEN: usize = 8;

/// Ways a coinbase script can be read as committing to more than one thing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum Ambiguity {
    #[error("multiple merged-mining markers")]
    MultipleMarkers,

    #[error("root doesn't directly follow the merged-mining marker")]
    RootNotAfterMarker,

    #[error("unmarked root starts after byte {MAX_HEADERLESS_ROOT_OFFSET}")]
    RootTooLate,
}

/// Outcome of scanning a script for a root.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommitmentScan {
    /// The root doesn't appear anywhere.
    NotFound,

    /// The root appears unambiguously, starting at `offset`.
    Found { offset: usize },

    /// The root appears, but the script can be read another way.
    Ambiguous(Ambiguity),
}

/// A commitment read out of a coinbase script.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoinbaseCommitment {
    /// Root as it appears in the script.
    pub root: Buf32,
    pub tree_size: u32,
    pub nonce: u32,
    /// Offset of the root in the script.
    pub offset: usize,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Finds where `root` is committed in `script`.
pub fn scan_commitment(script: &[u8], root: &Buf32) -> CommitmentScan {
    let marker = find(script, &MERGED_MINING_MARKER);
    if let Some(pos) = marker {
        if find(&script[pos + 1..], &MERGED_MINING_MARKER).is_some() {
            return CommitmentScan::Ambiguous(Ambiguity::MultipleMarkers);
        }
    }

    let Some(offset) = find(script, root.as_ref()) else {
        return CommitmentScan::NotFound;
    };

    match marker {
        Some(pos) if pos + MERGED_MINING_MARKER.len() != offset => {
            CommitmentScan::Ambiguous(Ambiguity::RootNotAfterMarker)
        }
        None if offset > MAX_HEADERLESS_ROOT_OFFSET => {
            CommitmentScan::Ambiguous(Ambiguity::RootTooLate)
        }
        _ => CommitmentScan::Found { offset },
    }
}

/// Reads the commitment to `root` from `script` and checks its tree size
/// against a merge-mining tree of `height` levels.
pub fn extract_commitment(
    script: &[u8],
    root: &Buf32,
    height: u32,
) -> VerificationResult<CoinbaseCommitment> {
    let offset = match scan_commitment(script, root) {
        CommitmentScan::Found { offset } => offset,
        CommitmentScan::NotFound => {
            return Err(RejectReason::MerkleRootMismatch(ProofTree::ChainMerkle));
        }
        CommitmentScan::Ambiguous(kind) => return Err(RejectReason::AmbiguousCoinbaseData(kind)),
    };

    let trailer = &script[offset + Buf32::LEN..];
    if trailer.len() < TRAILER_LEN {
        return Err(RejectReason::TruncatedCommitment);
    }

    let tree_size = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    if 1u64.checked_shl(height) != Some(u64::from(tree_size)) {
        return Err(RejectReason::TreeSizeMismatch {
            height,
            found: tree_size,
        });
    }

    let nonce = u32::from_le_bytes([trailer[4], trailer[5], trailer[6], trailer[7]]);
    Ok(CoinbaseCommitment {
        root: *root,
        tree_size,
        nonce,
        offset,
    })
}
