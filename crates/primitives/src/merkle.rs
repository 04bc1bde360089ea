//! Merkle branches: recomputing a root from a leaf and its cohashes.
//!
//! The same arithmetic serves both trees an auxpow proves membership in: the
//! parent block's transaction tree and the merge-mining chain tree.

use arbitrary::Arbitrary;
use bitcoin::{
    VarInt,
    consensus::{Decodable, Encodable, encode},
    io::{self, Read, Write},
};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{buf::Buf32, hash::sha256d_pair};

/// Sibling hashes from a leaf up to the root, plus the leaf's index.
///
/// Bit `i` of the index says on which side the running hash sits at level
/// `i`: a clear bit puts it on the left, a set bit on the right.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct MerkleBranch {
    hashes: Vec<Buf32>,
    index: u32,
}

impl MerkleBranch {
    pub fn new(hashes: Vec<Buf32>, index: u32) -> Self {
        Self { hashes, index }
    }

    pub fn hashes(&self) -> &[Buf32] {
        &self.hashes
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Number of levels the branch spans.
    pub fn height(&self) -> usize {
        self.hashes.len()
    }

    /// Recomputes the root the branch commits `leaf` to.
    ///
    /// Total: any height and index are accepted, a height-0 branch returns the
    /// leaf unchanged. Whether the index is in range for the height is for the
    /// caller to decide.
    pub fn compute_root(&self, leaf: Buf32) -> Buf32 {
        let mut index = self.index;
        let mut hash = leaf;
        for sibling in &self.hashes {
            hash = if index & 1 == 1 {
                sha256d_pair(sibling, &hash)
            } else {
                sha256d_pair(&hash, sibling)
            };
            index >>= 1;
        }
        hash
    }
}

impl Encodable for MerkleBranch {
    fn consensus_encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, io::Error> {
        let mut len = VarInt(self.hashes.len() as u64).consensus_encode(writer)?;
        for hash in &self.hashes {
            len += hash.0.consensus_encode(writer)?;
        }
        len += self.index.consensus_encode(writer)?;
        Ok(len)
    }
}

impl Decodable for MerkleBranch {
    fn consensus_decode_from_finite_reader<R: Read + ?Sized>(
        reader: &mut R,
    ) -> Result<Self, encode::Error> {
        let count = VarInt::consensus_decode_from_finite_reader(reader)?.0;
        // Grown as hashes arrive so a bogus count can't force a huge allocation.
        let mut hashes = Vec::new();
        for _ in 0..count {
            hashes.push(Buf32::new(<[u8; 32]>::consensus_decode_from_finite_reader(
                reader,
            )?));
        }
        let index = u32::consensus_decode_from_finite_reader(reader)?;
        Ok(Self { hashes, index })
    }
}

/// Computes the cohashes proving that `leaves[index]` is in the tree built
/// over `leaves`, along with the tree's root.
///
/// The tree is built the way Bitcoin builds transaction trees: a level with an
/// odd number of nodes pairs its last node with itself.
///
/// # Panics
///
/// If `index` is not a position in `leaves`.
pub fn build_branch(leaves: &[Buf32], index: u32) -> (MerkleBranch, Buf32) {
    assert!(
        (index as usize) < leaves.len(),
        "the leaf index should be within the leaves length"
    );
    let mut curr_level = leaves.to_vec();

    let mut curr_index = index as usize;
    let mut cohashes = vec![];
    while curr_level.len() > 1 {
        let mut next_level = Vec::with_capacity(curr_level.len().div_ceil(2));
        for pair in curr_level.chunks(2) {
            let left = pair[0];
            // duplicate last element if odd
            let right = pair.get(1).copied().unwrap_or(left);
            next_level.push(sha256d_pair(&left, &right));
        }

        let sibling = curr_index ^ 1;
        cohashes.push(
            curr_level
                .get(sibling)
                .copied()
                .unwrap_or(curr_level[curr_index]),
        );

        curr_index /= 2;
        curr_level = next_level;
    }

    (MerkleBranch::new(cohashes, index), curr_level[0])
}
