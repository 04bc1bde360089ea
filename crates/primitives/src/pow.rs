//! Proof-of-work hashing and compact target checks.

use bitcoin::{BlockHash, CompactTarget, Target, block::Header};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::compute_block_hash;

/// Largest mantissa of a non-negative compact target.
const COMPACT_MANTISSA_MASK: u32 = 0x007f_ffff;

/// Sign bit of a compact target's mantissa.
const COMPACT_SIGN_BIT: u32 = 0x0080_0000;

/// Hash function a header's proof-of-work is measured with.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum PowAlgorithm {
    /// Double SHA-256 over the 80-byte header, as Bitcoin does.
    #[default]
    Sha256d,
}

impl PowAlgorithm {
    /// Returns the hash compared against the target.
    pub fn pow_hash(&self, header: &Header) -> BlockHash {
        match self {
            PowAlgorithm::Sha256d => compute_block_hash(header).into(),
        }
    }
}

/// Reasons a compact target can't be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("compact target {0:#010x} is negative")]
    Negative(u32),

    #[error("compact target {0:#010x} overflows 256 bits")]
    Overflow(u32),

    #[error("compact target {0:#010x} is zero")]
    Zero(u32),

    #[error("compact target {bits:#010x} is easier than pow limit {limit:#010x}")]
    AboveLimit { bits: u32, limit: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PowError {
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] TargetError),

    #[error("hash {hash} doesn't meet target {bits:#010x}")]
    TargetNotMet { hash: BlockHash, bits: u32 },
}

/// Decodes a compact target, rejecting the encodings that don't describe a
/// usable positive 256-bit target.
pub fn decode_compact_target(bits: CompactTarget) -> Result<Target, TargetError> {
    let raw = bits.to_consensus();
    let size = raw >> 24;
    let mut word = raw & COMPACT_MANTISSA_MASK;
    if size <= 3 {
        word >>= 8 * (3 - size);
    }

    if word == 0 {
        return Err(TargetError::Zero(raw));
    }

    if raw & COMPACT_SIGN_BIT != 0 {
        return Err(TargetError::Negative(raw));
    }

    if size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32) {
        return Err(TargetError::Overflow(raw));
    }

    Ok(Target::from_compact(bits))
}

/// Checks that `hash` meets the compact target `bits`, which may be no easier
/// than `pow_limit`.
pub fn check_pow(
    hash: BlockHash,
    bits: CompactTarget,
    pow_limit: CompactTarget,
) -> Result<(), PowError> {
    let target = decode_compact_target(bits)?;
    if target > Target::from_compact(pow_limit) {
        return Err(TargetError::AboveLimit {
            bits: bits.to_consensus(),
            limit: pow_limit.to_consensus(),
        }
        .into());
    }

    if !target.is_met_by(hash) {
        return Err(PowError::TargetNotMet {
            hash,
            bits: bits.to_consensus(),
        });
    }

    Ok(())
}
