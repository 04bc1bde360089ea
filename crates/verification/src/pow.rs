//! Header proof-of-work dispatch.

use auxpow_params::ConsensusParams;
use auxpow_primitives::{check_pow, is_legacy};
use tracing::*;

use crate::{
    errors::{RejectReason, VerificationResult},
    header::AuxBlockHeader,
};

/// Checks the proof-of-work of `header` under `params`.
///
/// Headers without the auxpow flag must meet their own target. Flagged
/// headers must carry an auxpow committing to their hash, whose parent block
/// meets both its own target and the header's.
pub fn check_proof_of_work(
    header: &AuxBlockHeader,
    params: &ConsensusParams,
) -> VerificationResult {
    let res = check_proof_of_work_inner(header, params);
    if let Err(reason) = &res {
        debug!(
            blkid = %header.block_hash(),
            version = header.header.version.to_consensus(),
            %reason,
            "rejected header proof-of-work"
        );
    }
    res
}

fn check_proof_of_work_inner(
    header: &AuxBlockHeader,
    params: &ConsensusParams,
) -> VerificationResult {
    let raw_version = header.header.version.to_consensus();
    let fields = params.version_layout.decode(raw_version);

    if params.strict_chain_id && !is_legacy(raw_version) && fields.chain_id != params.chain_id {
        return Err(RejectReason::WrongChainId {
            expected: params.chain_id,
            found: fields.chain_id,
        });
    }

    if !fields.auxpow {
        if header.auxpow().is_some() {
            return Err(RejectReason::UnexpectedAuxpowPresent);
        }

        let hash = params.pow_algorithm.pow_hash(&header.header);
        check_pow(hash, header.header.bits, params.compact_pow_limit())?;
        return Ok(());
    }

    let Some(auxpow) = header.auxpow() else {
        return Err(RejectReason::MissingAuxpowOnFlaggedBlock);
    };

    auxpow.check(header.block_hash(), fields.chain_id, params)?;

    // The merged work has to meet the child's difficulty too.
    check_pow(
        auxpow.parent_pow_hash(params.pow_algorithm),
        header.header.bits,
        params.compact_pow_limit(),
    )?;

    trace!(blkid = %header.block_hash(), "accepted merge-mined header");
    Ok(())
}

/// Returns whether `header` carries valid proof-of-work under `params`.
pub fn has_valid_proof_of_work(header: &AuxBlockHeader, params: &ConsensusParams) -> bool {
    check_proof_of_work(header, params).is_ok()
}
