//! Hashing primitives.

use bitcoin::{Transaction, block::Header, consensus::Encodable};
use sha2::{Digest, Sha256};

use crate::buf::Buf32;

/// Size of a consensus-encoded block header.
pub const HEADER_SIZE: usize = 80;

/// Double SHA-256 of `data`.
pub fn sha256d(data: &[u8]) -> Buf32 {
    let first = Sha256::digest(data);
    Buf32::new(Sha256::digest(first).into())
}

/// Double SHA-256 of the concatenation `left ‖ right`, the inner node hash of
/// every merkle tree handled here.
pub fn sha256d_pair(left: &Buf32, right: &Buf32) -> Buf32 {
    let mut combined = [0u8; 64];
    combined[..32].copy_from_slice(left.as_ref());
    combined[32..].copy_from_slice(right.as_ref());
    sha256d(&combined)
}

/// Returns the block hash.
///
/// Equivalent to [`block_hash`](Header::block_hash) but goes through
/// [`sha256d`], so the full encoded version (chain id and auxpow flag bits
/// included) is what gets committed.
pub fn compute_block_hash(header: &Header) -> Buf32 {
    let mut buf = [0u8; HEADER_SIZE];
    let mut writer = &mut buf[..];
    header
        .consensus_encode(&mut writer)
        .expect("engines don't error");
    sha256d(&buf)
}

/// Returns the txid of `tx` as a merkle leaf.
pub fn compute_txid(tx: &Transaction) -> Buf32 {
    tx.compute_txid().into()
}
