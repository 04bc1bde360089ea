//! Block version packing.
//!
//! A merge-mined chain's 32-bit header version carries three things: the base
//! version, the chain id and the auxpow flag. Every read or write of those
//! fields goes through [`VersionLayout`], so flipping the flag and back always
//! reproduces the original version (and hence the original block hash).

use std::{fmt, io};

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Full version of headers that predate merge-mining.
pub const LEGACY_VERSION: i32 = 1;

/// Default bit position of the auxpow flag.
pub const DEFAULT_AUXPOW_FLAG_BIT: u8 = 8;

/// Default shift of the chain id.
pub const DEFAULT_CHAIN_ID_SHIFT: u8 = 16;

/// Identifies a merge-mined chain.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ChainId(u32);

impl ChainId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ChainId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u32 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Errors from packing version fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The layout's bit positions overlap or don't fit in 32 bits.
    #[error("invalid version layout (flag bit {flag_bit}, chain id shift {chain_id_shift})")]
    InvalidLayout { flag_bit: u8, chain_id_shift: u8 },

    /// The base version uses bits reserved for the flag or chain id.
    #[error("base version {base_version:#x} doesn't fit mask {mask:#x}")]
    BaseVersionOutOfRange { base_version: u32, mask: u32 },

    /// The chain id doesn't fit above the shift.
    #[error("chain id {chain_id} exceeds maximum {max}")]
    ChainIdOutOfRange { chain_id: u32, max: u32 },
}

/// Decoded fields of a header version.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionFields {
    pub base_version: u32,
    pub chain_id: ChainId,
    pub auxpow: bool,
}

/// Returns whether `version` is the pre-merge-mining legacy version.
pub fn is_legacy(version: i32) -> bool {
    version == LEGACY_VERSION
}

/// Bit positions of the auxpow flag and chain id in a header version.
///
/// The chain id takes every bit at and above `chain_id_shift`, the flag takes
/// bit `auxpow_flag_bit`, and the base version is every other bit below the
/// shift. Requires `auxpow_flag_bit < chain_id_shift < 32`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, BorshSerialize, Serialize, Deserialize)]
#[serde(try_from = "VersionLayoutRepr")]
pub struct VersionLayout {
    auxpow_flag_bit: u8,
    chain_id_shift: u8,
}

impl Default for VersionLayout {
    fn default() -> Self {
        Self {
            auxpow_flag_bit: DEFAULT_AUXPOW_FLAG_BIT,
            chain_id_shift: DEFAULT_CHAIN_ID_SHIFT,
        }
    }
}

impl VersionLayout {
    pub fn new(auxpow_flag_bit: u8, chain_id_shift: u8) -> Result<Self, VersionError> {
        if auxpow_flag_bit >= chain_id_shift || chain_id_shift >= 32 {
            return Err(VersionError::InvalidLayout {
                flag_bit: auxpow_flag_bit,
                chain_id_shift,
            });
        }
        Ok(Self {
            auxpow_flag_bit,
            chain_id_shift,
        })
    }

    pub fn auxpow_flag_bit(&self) -> u8 {
        self.auxpow_flag_bit
    }

    pub fn chain_id_shift(&self) -> u8 {
        self.chain_id_shift
    }

    fn flag_mask(&self) -> u32 {
        1 << self.auxpow_flag_bit
    }

    /// Bits available to the base version.
    pub fn base_version_mask(&self) -> u32 {
        ((1u32 << self.chain_id_shift) - 1) & !self.flag_mask()
    }

    /// Largest chain id the layout can carry.
    pub fn max_chain_id(&self) -> u32 {
        u32::MAX >> self.chain_id_shift
    }

    /// Splits a raw version into its fields. Total over all 32-bit values.
    pub fn decode(&self, version: i32) -> VersionFields {
        let raw = version as u32;
        VersionFields {
            base_version: raw & self.base_version_mask(),
            chain_id: ChainId(raw >> self.chain_id_shift),
            auxpow: raw & self.flag_mask() != 0,
        }
    }

    /// Packs fields into a raw version.
    pub fn encode(&self, fields: &VersionFields) -> Result<i32, VersionError> {
        let mask = self.base_version_mask();
        if fields.base_version & !mask != 0 {
            return Err(VersionError::BaseVersionOutOfRange {
                base_version: fields.base_version,
                mask,
            });
        }

        let max = self.max_chain_id();
        let chain_id = fields.chain_id.get();
        if chain_id > max {
            return Err(VersionError::ChainIdOutOfRange { chain_id, max });
        }

        let mut raw = fields.base_version | (chain_id << self.chain_id_shift);
        if fields.auxpow {
            raw |= self.flag_mask();
        }
        Ok(raw as i32)
    }

    pub fn chain_id(&self, version: i32) -> ChainId {
        self.decode(version).chain_id
    }

    pub fn is_auxpow(&self, version: i32) -> bool {
        self.decode(version).auxpow
    }

    /// Replaces the chain id, keeping the other fields.
    pub fn with_chain_id(&self, version: i32, chain_id: ChainId) -> Result<i32, VersionError> {
        let fields = VersionFields {
            chain_id,
            ..self.decode(version)
        };
        self.encode(&fields)
    }

    /// Sets or clears the auxpow flag, keeping the other fields.
    pub fn with_auxpow_flag(&self, version: i32, auxpow: bool) -> i32 {
        let raw = version as u32;
        let raw = if auxpow {
            raw | self.flag_mask()
        } else {
            raw & !self.flag_mask()
        };
        raw as i32
    }

    /// Builds a fresh version from a base version and chain id. The auxpow
    /// flag starts cleared.
    pub fn with_base_version(
        &self,
        base_version: u32,
        chain_id: ChainId,
    ) -> Result<i32, VersionError> {
        self.encode(&VersionFields {
            base_version,
            chain_id,
            auxpow: false,
        })
    }
}

impl BorshDeserialize for VersionLayout {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let auxpow_flag_bit = u8::deserialize_reader(reader)?;
        let chain_id_shift = u8::deserialize_reader(reader)?;
        Self::new(auxpow_flag_bit, chain_id_shift)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[derive(Deserialize)]
struct VersionLayoutRepr {
    #[serde(default = "default_auxpow_flag_bit")]
    auxpow_flag_bit: u8,
    #[serde(default = "default_chain_id_shift")]
    chain_id_shift: u8,
}

fn default_auxpow_flag_bit() -> u8 {
    DEFAULT_AUXPOW_FLAG_BIT
}

fn default_chain_id_shift() -> u8 {
    DEFAULT_CHAIN_ID_SHIFT
}

impl TryFrom<VersionLayoutRepr> for VersionLayout {
    type Error = VersionError;

    fn try_from(repr: VersionLayoutRepr) -> Result<Self, Self::Error> {
        Self::new(repr.auxpow_flag_bit, repr.chain_id_shift)
    }
}
