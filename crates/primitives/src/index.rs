//! Derivation of the slot a chain occupies in the merge-mining tree.

/// Multiplier of the linear congruential step.
const LCG_MULTIPLIER: u32 = 1_103_515_245;

/// Increment of the linear congruential step.
const LCG_INCREMENT: u32 = 12_345;

/// Returns the leaf index a chain must occupy in a merge-mining tree of the
/// given height.
///
/// Mixing the chain id into the nonce keeps two chains from claiming the same
/// slot under one nonce, so a single tree can't commit to two blocks of the
/// same chain. All arithmetic wraps at 32 bits.
pub fn expected_index(nonce: u32, chain_id: u32, height: u32) -> u32 {
    let mut rand = nonce;
    rand = rand
        .wrapping_mul(LCG_MULTIPLIER)
        .wrapping_add(LCG_INCREMENT);
    rand = rand.wrapping_add(chain_id);
    rand = rand
        .wrapping_mul(LCG_MULTIPLIER)
        .wrapping_add(LCG_INCREMENT);

    match 1u32.checked_shl(height) {
        Some(size) => rand % size,
        // The tree has more leaves than an index can name.
        None => rand,
    }
}
