use auxpow_primitives::{Buf32, PowAlgorithm};
use bitcoin::{
    CompactTarget, ScriptBuf, Target, TxMerkleNode,
    block::Header,
    script::{Builder, PushBytesBuf},
};

/// Grinds the header nonce from zero until the header meets `bits` if `ok`,
/// or misses it otherwise.
pub fn mine_header(header: &mut Header, ok: bool, bits: CompactTarget, algo: PowAlgorithm) {
    let target = Target::from_compact(bits);
    header.nonce = 0;
    while target.is_met_by(algo.pow_hash(header)) != ok {
        header.nonce += 1;
    }
}

/// Adds one to `buf`, read as a little-endian 256-bit integer.
pub fn tamper_with(buf: &mut Buf32) {
    for byte in buf.0.iter_mut() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            break;
        }
    }
}

pub fn tamper_merkle_root(header: &mut Header) {
    let mut root = Buf32::from(header.merkle_root);
    tamper_with(&mut root);
    header.merkle_root = TxMerkleNode::from(root);
}

/// Builds a script pushing each of `pushes` in turn.
pub fn coinbase_script(pushes: &[&[u8]]) -> ScriptBuf {
    pushes
        .iter()
        .fold(Builder::new(), |builder, data| {
            let data = PushBytesBuf::try_from(data.to_vec()).expect("test: push fits a script");
            builder.push_slice(data)
        })
        .into_script()
}
