//! Crate-wide error type, composing each component's `thiserror` enum into
//! the kinds `spec.md` §7 names: `DecodeError`, `InvariantError`,
//! `ProofRejected{subkind}`, `ParamsMismatch`, `Storage`.

use thiserror::Error;

/// The `ProofRejected` subkinds of `spec.md` §7, one per verifier that can
/// independently fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofRejectedKind {
    RangeBad,
    GroupSigBad,
    LinkerBad,
    MerkleBad,
    SchnorrBad,
    PseudonymBad,
    ElGamalBad,
    Groth16Bad,
}

impl std::fmt::Display for ProofRejectedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::RangeBad => "RangeBad",
            Self::GroupSigBad => "GroupSigBad",
            Self::LinkerBad => "LinkerBad",
            Self::MerkleBad => "MerkleBad",
            Self::SchnorrBad => "SchnorrBad",
            Self::PseudonymBad => "PseudonymBad",
            Self::ElGamalBad => "ElGamalBad",
            Self::Groth16Bad => "Groth16Bad",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum S3CrossError {
    #[error("malformed wire encoding: {0}")]
    Decode(String),

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("proof rejected ({0}): {1}")]
    ProofRejected(ProofRejectedKind, String),

    #[error("public witness does not match the ledger's stored parameters: {0}")]
    ParamsMismatch(String),

    #[error("ledger storage error: {0}")]
    Storage(String),
}

impl From<crate::range_proof::error::RangeProofError> for S3CrossError {
    fn from(e: crate::range_proof::error::RangeProofError) -> Self {
        Self::ProofRejected(ProofRejectedKind::RangeBad, e.to_string())
    }
}

impl From<crate::group_sig::error::GroupSigError> for S3CrossError {
    fn from(e: crate::group_sig::error::GroupSigError) -> Self {
        Self::ProofRejected(ProofRejectedKind::GroupSigBad, e.to_string())
    }
}

impl From<crate::merkle::error::MerkleError> for S3CrossError {
    fn from(e: crate::merkle::error::MerkleError) -> Self {
        Self::ProofRejected(ProofRejectedKind::MerkleBad, e.to_string())
    }
}
