//! Primitive types and pure functions shared by the merged-mining verifier.
//!
//! Everything in here is deterministic and allocation-light: hashing, merkle
//! branch arithmetic, the chain index derivation, block version packing and
//! compact target decoding.

pub mod buf;
pub mod hash;
pub mod index;
pub mod merkle;
pub mod pow;
pub mod version;

pub use buf::Buf32;
pub use hash::{HEADER_SIZE, compute_block_hash, compute_txid, sha256d, sha256d_pair};
pub use index::expected_index;
pub use merkle::{MerkleBranch, build_branch};
pub use pow::{PowAlgorithm, PowError, TargetError, check_pow, decode_compact_target};
pub use version::{
    ChainId, LEGACY_VERSION, VersionError, VersionFields, VersionLayout, is_legacy,
};
