use auxpow_params::REGTEST_POW_LIMIT;
use auxpow_primitives::{
    Buf32, ChainId, MerkleBranch, PowAlgorithm, VersionLayout, build_branch, compute_txid,
};
use auxpow_verification::{AuxPow, MERGED_MINING_MARKER};
use bitcoin::{
    BlockHash, CompactTarget, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxMerkleNode,
    Witness,
    absolute::LockTime,
    block::{Header, Version},
    hashes::Hash as _,
    transaction,
};

use crate::mining::mine_header;

/// Assembles auxpows around a parent block whose parts tests can tweak.
///
/// The usual flow is [`build_chain_branch`](Self::build_chain_branch) for the
/// child hash, [`build_coinbase_data`](Self::build_coinbase_data) for the
/// returned root, [`set_coinbase`](Self::set_coinbase) with a script carrying
/// that data, then [`get`](Self::get).
#[derive(Clone, Debug)]
pub struct AuxPowBuilder {
    /// Header of the parent block. The merkle root tracks `parent_txs`.
    pub parent_header: Header,

    /// Transactions of the parent block, coinbase first.
    pub parent_txs: Vec<Transaction>,

    pub chain_branch: MerkleBranch,

    pub algo: PowAlgorithm,

    layout: VersionLayout,
}

impl AuxPowBuilder {
    /// Starts a parent block with the given base version and chain id under
    /// the default version layout.
    pub fn new(base_version: u32, chain_id: u32) -> Self {
        Self::with_layout(base_version, chain_id, VersionLayout::default())
    }

    pub fn with_layout(base_version: u32, chain_id: u32, layout: VersionLayout) -> Self {
        let version = layout
            .with_base_version(base_version, ChainId::new(chain_id))
            .expect("test: parent version fits layout");
        Self {
            parent_header: Header {
                version: Version::from_consensus(version),
                prev_blockhash: BlockHash::all_zeros(),
                merkle_root: TxMerkleNode::all_zeros(),
                time: 0,
                bits: CompactTarget::from_consensus(REGTEST_POW_LIMIT),
                nonce: 0,
            },
            parent_txs: Vec::new(),
            chain_branch: MerkleBranch::default(),
            algo: PowAlgorithm::default(),
            layout,
        }
    }

    pub fn layout(&self) -> &VersionLayout {
        &self.layout
    }

    pub fn set_parent_chain_id(&mut self, chain_id: u32) {
        let version = self
            .layout
            .with_chain_id(self.parent_header.version.to_consensus(), ChainId::new(chain_id))
            .expect("test: parent chain id fits layout");
        self.parent_header.version = Version::from_consensus(version);
    }

    /// Replaces the parent block's transactions with a single coinbase
    /// spending nothing with `script`.
    pub fn set_coinbase(&mut self, script: ScriptBuf) {
        let coinbase = Transaction {
            version: transaction::Version::ONE,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: OutPoint::null(),
                script_sig: script,
                sequence: Sequence::MAX,
                witness: Witness::new(),
            }],
            output: vec![],
        };
        self.parent_txs = vec![coinbase];
        self.update_merkle_root();
    }

    /// Appends a transaction to the parent block.
    pub fn push_tx(&mut self, tx: Transaction) {
        self.parent_txs.push(tx);
        self.update_merkle_root();
    }

    pub fn update_merkle_root(&mut self) {
        let txids: Vec<_> = self.parent_txs.iter().map(compute_txid).collect();
        let (_, root) = build_branch(&txids, 0);
        self.parent_header.merkle_root = root.into();
    }

    /// Sets up a chain branch of `height` placeholder hashes putting
    /// `aux_hash` at `index`, and returns the root in committed byte order.
    pub fn build_chain_branch(&mut self, aux_hash: Buf32, height: u32, index: u32) -> Buf32 {
        let hashes = (0..height)
            .map(|i| {
                let mut buf = [0u8; 32];
                buf[..4].copy_from_slice(&i.to_le_bytes());
                Buf32::from(buf)
            })
            .collect();
        self.chain_branch = MerkleBranch::new(hashes, index);
        self.chain_branch.compute_root(aux_hash).reversed()
    }

    /// Returns the commitment bytes for `root`, optionally behind the
    /// merged-mining marker.
    pub fn build_coinbase_data(marker: bool, root: &Buf32, height: u32, nonce: u32) -> Vec<u8> {
        let mut data = Vec::new();
        if marker {
            data.extend_from_slice(&MERGED_MINING_MARKER);
        }
        data.extend_from_slice(root.as_ref());
        data.extend_from_slice(&(1u32 << height).to_le_bytes());
        data.extend_from_slice(&nonce.to_le_bytes());
        data
    }

    /// Builds the auxpow around the parent coinbase, with the parent mined to
    /// meet its own target.
    pub fn get(&self) -> AuxPow {
        self.get_with_tx(self.coinbase().clone())
    }

    /// Builds the auxpow with `tx` standing in as the coinbase. The coinbase
    /// branch is the one for the parent block's first transaction.
    pub fn get_with_tx(&self, tx: Transaction) -> AuxPow {
        let bits = self.parent_header.bits;
        self.assemble(tx, true, bits)
    }

    /// Builds the auxpow with the parent mined to meet or miss `bits`.
    pub fn get_mined(&self, ok: bool, bits: CompactTarget) -> AuxPow {
        self.assemble(self.coinbase().clone(), ok, bits)
    }

    fn coinbase(&self) -> &Transaction {
        self.parent_txs
            .first()
            .expect("test: coinbase set before building auxpow")
    }

    fn assemble(&self, tx: Transaction, ok: bool, bits: CompactTarget) -> AuxPow {
        let txids: Vec<_> = self.parent_txs.iter().map(compute_txid).collect();
        let (coinbase_branch, _) = build_branch(&txids, 0);

        let mut parent_header = self.parent_header;
        mine_header(&mut parent_header, ok, bits, self.algo);

        AuxPow {
            coinbase_tx: tx,
            parent_block_hash: parent_header.block_hash(),
            coinbase_branch,
            chain_branch: self.chain_branch.clone(),
            parent_header,
        }
    }
}

#[cfg(test)]
mod tests {
    use auxpow_primitives::expected_index;

    use super::*;
    use crate::{TEST_CHAIN_ID, coinbase_script, regtest_params};

    #[test]
    fn test_built_auxpow_is_valid() {
        let params = regtest_params();
        let aux_hash = Buf32::from([5; 32]);
        let index = expected_index(7, TEST_CHAIN_ID, 4);

        let mut builder = AuxPowBuilder::new(5, 0);
        let root = builder.build_chain_branch(aux_hash, 4, index);
        let data = AuxPowBuilder::build_coinbase_data(true, &root, 4, 7);
        builder.set_coinbase(coinbase_script(&[data.as_slice()]));

        let auxpow = builder.get();
        assert!(auxpow.is_valid(aux_hash, ChainId::new(TEST_CHAIN_ID), &params));
        assert_eq!(
            Buf32::from(auxpow.parent_header.merkle_root),
            compute_txid(&auxpow.coinbase_tx)
        );
    }

    #[test]
    fn test_coinbase_data_layout() {
        let root = Buf32::from([1; 32]);
        let data = AuxPowBuilder::build_coinbase_data(true, &root, 3, 9);
        assert_eq!(data.len(), 4 + 32 + 8);
        assert_eq!(&data[..4], &MERGED_MINING_MARKER);
        assert_eq!(&data[36..40], &8u32.to_le_bytes());
        assert_eq!(&data[40..], &9u32.to_le_bytes());

        let bare = AuxPowBuilder::build_coinbase_data(false, &root, 3, 9);
        assert_eq!(bare, data[4..]);
    }

    #[test]
    fn test_set_parent_chain_id() {
        let mut builder = AuxPowBuilder::new(5, 0);
        builder.set_parent_chain_id(100);
        let fields = builder
            .layout()
            .decode(builder.parent_header.version.to_consensus());
        assert_eq!(fields.chain_id, ChainId::new(100));
        assert_eq!(fields.base_version, 5);
    }
}
