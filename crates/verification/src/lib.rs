//! Merged-mining (auxpow) verification.
//!
//! [`check_proof_of_work`] is the entry point a block acceptance pipeline
//! calls: it decides from the header version whether the header's own hash
//! or an attached [`AuxPow`] has to carry the work, and checks it.

pub mod auxpow;
pub mod commitment;
pub mod errors;
pub mod header;
pub mod pow;

pub use auxpow::AuxPow;
pub use commitment::{
    Ambiguity, CoinbaseCommitment, CommitmentScan, MAX_HEADERLESS_ROOT_OFFSET, MERGED_MINING_MARKER,
    extract_commitment, scan_commitment,
};
pub use errors::{ProofTree, RejectReason, VerificationResult};
pub use header::AuxBlockHeader;
pub use pow::{check_proof_of_work, has_valid_proof_of_work};
