//! Validation of standalone auxpows against a child block hash.

#![expect(unused_crate_dependencies, reason = "test dependencies")]

use auxpow_params::{ConsensusParams, REGTEST_POW_LIMIT};
use auxpow_primitives::{Buf32, ChainId, TargetError, compute_txid, expected_index};
use auxpow_test_utils::{
    AuxPowBuilder, TEST_CHAIN_ID, coinbase_script, regtest_params, tamper_merkle_root, tamper_with,
};
use auxpow_verification::{Ambiguity, ProofTree, RejectReason, VerificationResult};
use bitcoin::{
    CompactTarget, OutPoint, ScriptBuf,
    opcodes::all::OP_PUSHNUM_2,
    script::{Builder, PushBytesBuf},
};
use proptest::prelude::*;

const HEIGHT: u32 = 30;
const NONCE: u32 = 7;
const PARENT_CHAIN_ID: u32 = 0;

fn aux_hash() -> Buf32 {
    let mut buf = [0u8; 32];
    buf[..4].copy_from_slice(&12345u32.to_le_bytes());
    Buf32::from(buf)
}

fn wrong_aux_hash() -> Buf32 {
    let mut hash = aux_hash();
    tamper_with(&mut hash);
    hash
}

/// A coinbase script shaped like a miner's: block height, extra nonce, then
/// the commitment.
fn miner_script(data: &[u8], extra: Option<i64>) -> ScriptBuf {
    let push = PushBytesBuf::try_from(data.to_vec()).unwrap();
    let mut builder = Builder::new()
        .push_int(2809)
        .push_int(2013)
        .push_opcode(OP_PUSHNUM_2)
        .push_slice(push);
    if let Some(extra) = extra {
        builder = builder.push_int(extra);
    }
    builder.into_script()
}

/// Builder with a valid marked commitment at the maximum height.
fn valid_builder() -> AuxPowBuilder {
    let mut builder = AuxPowBuilder::new(5, PARENT_CHAIN_ID);
    let index = expected_index(NONCE, TEST_CHAIN_ID, HEIGHT);
    let root = builder.build_chain_branch(aux_hash(), HEIGHT, index);
    let data = AuxPowBuilder::build_coinbase_data(true, &root, HEIGHT, NONCE);
    builder.set_coinbase(miner_script(&data, None));
    builder
}

fn check_with(builder: &AuxPowBuilder, hash: Buf32, chain_id: u32) -> VerificationResult {
    builder
        .get()
        .check(hash, ChainId::new(chain_id), &regtest_params())
}

fn check(builder: &AuxPowBuilder) -> VerificationResult {
    check_with(builder, aux_hash(), TEST_CHAIN_ID)
}

#[test]
fn test_valid_auxpow_at_max_height() {
    let builder = valid_builder();
    check(&builder).unwrap();
}

#[test]
fn test_aux_hash_and_chain_id_are_bound() {
    let builder = valid_builder();

    assert_eq!(
        check_with(&builder, wrong_aux_hash(), TEST_CHAIN_ID),
        Err(RejectReason::MerkleRootMismatch(ProofTree::ChainMerkle))
    );
    assert!(matches!(
        check_with(&builder, aux_hash(), TEST_CHAIN_ID + 1),
        Err(RejectReason::IndexMismatch { .. })
    ));
}

#[test]
fn test_base_transaction_must_be_parent_coinbase() {
    let mut builder = valid_builder();
    let old_coinbase = builder.parent_txs[0].clone();

    let index = expected_index(NONCE, TEST_CHAIN_ID, HEIGHT);
    let root = builder.build_chain_branch(aux_hash(), HEIGHT, index);
    let data = AuxPowBuilder::build_coinbase_data(true, &root, HEIGHT, NONCE);
    builder.set_coinbase(miner_script(&data, Some(5)));
    builder.push_tx(old_coinbase.clone());

    check(&builder).unwrap();

    // Coinbase-shaped, but not the parent block's first transaction.
    let auxpow = builder.get_with_tx(old_coinbase);
    assert_eq!(
        auxpow.check(aux_hash(), ChainId::new(TEST_CHAIN_ID), &regtest_params()),
        Err(RejectReason::MerkleRootMismatch(ProofTree::ParentBlock))
    );
}

#[test]
fn test_spending_base_transaction_rejected() {
    let mut builder = valid_builder();
    let mut spend = builder.parent_txs[0].clone();
    spend.input[0].previous_output = OutPoint {
        txid: spend.compute_txid(),
        vout: 0,
    };
    builder.parent_txs[0] = spend;
    builder.update_merkle_root();

    assert_eq!(check(&builder), Err(RejectReason::NotCoinbaseTransaction));
}

#[test]
fn test_parent_chain_id_must_differ() {
    let mut builder = valid_builder();

    builder.set_parent_chain_id(100);
    check(&builder).unwrap();

    builder.set_parent_chain_id(TEST_CHAIN_ID);
    assert_eq!(
        check(&builder),
        Err(RejectReason::ChainIdCollision(ChainId::new(TEST_CHAIN_ID)))
    );

    let mut lax = regtest_params();
    lax.strict_chain_id = false;
    builder
        .get()
        .check(aux_hash(), ChainId::new(TEST_CHAIN_ID), &lax)
        .unwrap();
}

#[test]
fn test_chain_branch_height_bounded() {
    let mut builder = valid_builder();
    let height = HEIGHT + 1;
    let index = expected_index(NONCE, TEST_CHAIN_ID, height);
    let root = builder.build_chain_branch(aux_hash(), height, index);
    let data = AuxPowBuilder::build_coinbase_data(true, &root, height, NONCE);
    builder.set_coinbase(miner_script(&data, None));

    assert_eq!(
        check(&builder),
        Err(RejectReason::MerkleBranchTooLong {
            height: 31,
            max: 30,
        })
    );
}

#[test]
fn test_parent_merkle_root_checked() {
    let mut builder = valid_builder();
    check(&builder).unwrap();

    tamper_merkle_root(&mut builder.parent_header);
    assert_eq!(
        check(&builder),
        Err(RejectReason::MerkleRootMismatch(ProofTree::ParentBlock))
    );
}

#[test]
fn test_unmarked_commitment_accepted() {
    let mut builder = valid_builder();
    let index = expected_index(NONCE, TEST_CHAIN_ID, HEIGHT);
    let root = builder.build_chain_branch(aux_hash(), HEIGHT, index);
    let data = AuxPowBuilder::build_coinbase_data(false, &root, HEIGHT, NONCE);
    builder.set_coinbase(miner_script(&data, None));

    check(&builder).unwrap();
}

#[test]
fn test_two_roots_in_one_coinbase() {
    let mut builder = valid_builder();
    let index = expected_index(NONCE, TEST_CHAIN_ID, HEIGHT);
    let wrong_root = builder.build_chain_branch(wrong_aux_hash(), HEIGHT, index);
    let root = builder.build_chain_branch(aux_hash(), HEIGHT, index);

    let data =
        |marker, root: &Buf32| AuxPowBuilder::build_coinbase_data(marker, root, HEIGHT, NONCE);
    let cases = [
        // (right marked, wrong marked, right first, expected)
        (false, false, true, Ok(())),
        (false, false, false, Err(Ambiguity::RootTooLate)),
        (false, true, true, Err(Ambiguity::RootNotAfterMarker)),
        (false, true, false, Err(Ambiguity::RootNotAfterMarker)),
        (true, true, true, Err(Ambiguity::MultipleMarkers)),
        (true, true, false, Err(Ambiguity::MultipleMarkers)),
        (true, false, true, Ok(())),
        (true, false, false, Ok(())),
    ];

    for (right_marked, wrong_marked, right_first, expected) in cases {
        let right = data(right_marked, &root);
        let wrong = data(wrong_marked, &wrong_root);
        let script = if right_first {
            coinbase_script(&[right.as_slice(), wrong.as_slice()])
        } else {
            coinbase_script(&[wrong.as_slice(), right.as_slice()])
        };
        builder.set_coinbase(script);

        assert_eq!(
            check(&builder),
            expected.map_err(RejectReason::AmbiguousCoinbaseData),
            "right marked {right_marked}, wrong marked {wrong_marked}, right first {right_first}"
        );
    }
}

#[test]
fn test_commitment_trailer_checked() {
    let mut builder = valid_builder();
    let index = expected_index(NONCE, TEST_CHAIN_ID, HEIGHT);
    let root = builder.build_chain_branch(aux_hash(), HEIGHT, index);

    let data = AuxPowBuilder::build_coinbase_data(true, &root, HEIGHT, NONCE);
    builder.set_coinbase(coinbase_script(&[data.as_slice()]));
    check(&builder).unwrap();

    let mut truncated = data.clone();
    truncated.pop();
    builder.set_coinbase(coinbase_script(&[truncated.as_slice()]));
    assert_eq!(check(&builder), Err(RejectReason::TruncatedCommitment));

    let short_tree = AuxPowBuilder::build_coinbase_data(true, &root, HEIGHT - 1, NONCE);
    builder.set_coinbase(coinbase_script(&[short_tree.as_slice()]));
    assert_eq!(
        check(&builder),
        Err(RejectReason::TreeSizeMismatch {
            height: HEIGHT,
            found: 1 << (HEIGHT - 1),
        })
    );

    let other_nonce = AuxPowBuilder::build_coinbase_data(true, &root, HEIGHT, NONCE + 3);
    builder.set_coinbase(coinbase_script(&[other_nonce.as_slice()]));
    assert!(matches!(
        check(&builder),
        Err(RejectReason::IndexMismatch { .. })
    ));
}

#[test]
fn test_aux_hash_position_checked() {
    let mut builder = valid_builder();
    let index = expected_index(NONCE, TEST_CHAIN_ID, HEIGHT);

    let root = builder.build_chain_branch(aux_hash(), HEIGHT, index + 1);
    let data = AuxPowBuilder::build_coinbase_data(true, &root, HEIGHT, NONCE);
    builder.set_coinbase(coinbase_script(&[data.as_slice()]));
    assert_eq!(
        check(&builder),
        Err(RejectReason::IndexMismatch {
            expected: index,
            found: index + 1,
        })
    );

    let root = builder.build_chain_branch(aux_hash(), HEIGHT, index);
    let data = AuxPowBuilder::build_coinbase_data(true, &root, HEIGHT, NONCE);
    builder.set_coinbase(coinbase_script(&[data.as_slice()]));
    check(&builder).unwrap();
}

#[test]
fn test_parent_must_meet_own_target() {
    let builder = valid_builder();
    let auxpow = builder.get_mined(false, builder.parent_header.bits);
    let params = regtest_params();

    assert_eq!(
        auxpow.check(aux_hash(), ChainId::new(TEST_CHAIN_ID), &params),
        Err(RejectReason::PowTargetNotMet {
            hash: auxpow.parent_header.block_hash(),
            bits: builder.parent_header.bits.to_consensus(),
        })
    );
}

#[test]
fn test_parent_target_easier_than_pow_limit() {
    let builder = valid_builder();
    let auxpow = builder.get();

    // Regtest-mined parent under mainnet-like limits: only its own bits count.
    let params = ConsensusParams::new(TEST_CHAIN_ID);
    auxpow
        .check(aux_hash(), ChainId::new(TEST_CHAIN_ID), &params)
        .unwrap();
}

#[test]
fn test_parent_target_encoding_checked() {
    let params = regtest_params();
    let regtest_bits = CompactTarget::from_consensus(REGTEST_POW_LIMIT);

    for (bits, err) in [
        (0x2000_0000, TargetError::Zero(0x2000_0000)),
        (0x20ff_ffff, TargetError::Negative(0x20ff_ffff)),
        (0xff7f_ffff, TargetError::Overflow(0xff7f_ffff)),
    ] {
        let mut builder = valid_builder();
        builder.parent_header.bits = CompactTarget::from_consensus(bits);
        let auxpow = builder.get_mined(true, regtest_bits);
        assert_eq!(
            auxpow.check(aux_hash(), ChainId::new(TEST_CHAIN_ID), &params),
            Err(RejectReason::InvalidTarget(err))
        );
    }
}

#[test]
fn test_coinbase_leaf_is_txid() {
    let builder = valid_builder();
    let auxpow = builder.get();
    assert_eq!(
        auxpow.coinbase_branch.compute_root(compute_txid(&auxpow.coinbase_tx)),
        Buf32::from(auxpow.parent_header.merkle_root)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_builder_proofs_verify(nonce in any::<u32>(), height in 0u32..=8, seed in any::<[u8; 32]>()) {
        let hash = Buf32::from(seed);
        let mut builder = AuxPowBuilder::new(5, PARENT_CHAIN_ID);
        let index = expected_index(nonce, TEST_CHAIN_ID, height);
        let root = builder.build_chain_branch(hash, height, index);
        let data = AuxPowBuilder::build_coinbase_data(true, &root, height, nonce);
        builder.set_coinbase(coinbase_script(&[data.as_slice()]));

        prop_assert_eq!(check_with(&builder, hash, TEST_CHAIN_ID), Ok(()));
    }
}
