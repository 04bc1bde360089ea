//! The auxiliary proof-of-work attached to a merge-mined header.

use auxpow_params::ConsensusParams;
use auxpow_primitives::{
    Buf32, ChainId, MerkleBranch, PowAlgorithm, compute_txid, decode_compact_target,
    expected_index,
};
use bitcoin::{
    BlockHash, Transaction,
    block::Header,
    consensus::{Decodable, Encodable, encode},
    io::{self, Read, Write},
};

use crate::{
    commitment::extract_commitment,
    errors::{ProofTree, RejectReason, VerificationResult},
};

/// Proof that a child block hash was committed to by a mined parent block.
///
/// The chain of custody runs from the child hash up the chain branch to the
/// merge-mining root, from the root into the coinbase script, and from the
/// coinbase up the coinbase branch to the parent header's merkle root. The
/// parent header's own work then stands in for the child's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuxPow {
    /// The parent block's coinbase.
    pub coinbase_tx: Transaction,

    /// Hash of the parent block. Carried on the wire but never checked.
    pub parent_block_hash: BlockHash,

    /// Proves the coinbase is the parent block's first transaction.
    pub coinbase_branch: MerkleBranch,

    /// Proves the child hash's slot in the merge-mining tree.
    pub chain_branch: MerkleBranch,

    pub parent_header: Header,
}

impl AuxPow {
    /// Checks that this proof commits to `aux_hash`, the hash of a block on
    /// chain `chain_id`, and that the parent block meets its own target.
    pub fn check(
        &self,
        aux_hash: Buf32,
        chain_id: ChainId,
        params: &ConsensusParams,
    ) -> VerificationResult {
        if !self.coinbase_tx.is_coinbase() || self.coinbase_branch.index() != 0 {
            return Err(RejectReason::NotCoinbaseTransaction);
        }

        if params.strict_chain_id {
            let parent_chain_id = params
                .version_layout
                .chain_id(self.parent_header.version.to_consensus());
            if parent_chain_id == chain_id {
                return Err(RejectReason::ChainIdCollision(parent_chain_id));
            }
        }

        let height = self.chain_branch.height();
        if height > params.max_merkle_height as usize {
            return Err(RejectReason::MerkleBranchTooLong {
                height,
                max: params.max_merkle_height,
            });
        }
        // Bounded by the configured maximum just above.
        let height = height as u32;

        let chain_root = self.chain_branch.compute_root(aux_hash);

        let coinbase_root = self
            .coinbase_branch
            .compute_root(compute_txid(&self.coinbase_tx));
        if coinbase_root != Buf32::from(self.parent_header.merkle_root) {
            return Err(RejectReason::MerkleRootMismatch(ProofTree::ParentBlock));
        }

        let script = self
            .coinbase_tx
            .input
            .first()
            .map(|input| input.script_sig.as_bytes())
            .unwrap_or_default();
        let commitment = extract_commitment(script, &chain_root.reversed(), height)?;

        let expected = expected_index(commitment.nonce, chain_id.get(), height);
        if self.chain_branch.index() != expected {
            return Err(RejectReason::IndexMismatch {
                expected,
                found: self.chain_branch.index(),
            });
        }

        // The parent may come from a chain with an easier pow limit than ours.
        let target = decode_compact_target(self.parent_header.bits)?;
        let hash = self.parent_pow_hash(params.pow_algorithm);
        if !target.is_met_by(hash) {
            return Err(RejectReason::PowTargetNotMet {
                hash,
                bits: self.parent_header.bits.to_consensus(),
            });
        }

        Ok(())
    }

    pub fn is_valid(&self, aux_hash: Buf32, chain_id: ChainId, params: &ConsensusParams) -> bool {
        self.check(aux_hash, chain_id, params).is_ok()
    }

    /// Hash of the parent header that its work is measured by.
    pub fn parent_pow_hash(&self, algo: PowAlgorithm) -> BlockHash {
        algo.pow_hash(&self.parent_header)
    }
}

impl Encodable for AuxPow {
    fn consensus_encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, io::Error> {
        let mut len = self.coinbase_tx.consensus_encode(writer)?;
        len += self.parent_block_hash.consensus_encode(writer)?;
        len += self.coinbase_branch.consensus_encode(writer)?;
        len += self.chain_branch.consensus_encode(writer)?;
        len += self.parent_header.consensus_encode(writer)?;
        Ok(len)
    }
}

impl Decodable for AuxPow {
    fn consensus_decode_from_finite_reader<R: Read + ?Sized>(
        reader: &mut R,
    ) -> Result<Self, encode::Error> {
        Ok(Self {
            coinbase_tx: Transaction::consensus_decode_from_finite_reader(reader)?,
            parent_block_hash: BlockHash::consensus_decode_from_finite_reader(reader)?,
            coinbase_branch: MerkleBranch::consensus_decode_from_finite_reader(reader)?,
            chain_branch: MerkleBranch::consensus_decode_from_finite_reader(reader)?,
            parent_header: Header::consensus_decode_from_finite_reader(reader)?,
        })
    }
}
