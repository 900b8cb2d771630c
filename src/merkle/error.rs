use thiserror::Error;

#[derive(Debug, Error)]
pub enum MerkleError {
    #[error("proof path length {got} does not match the configured tree depth {expected}")]
    DepthMismatch { expected: usize, got: usize },

    #[error("value equals an existing leaf; no non-membership witness exists")]
    ValueIsMember,

    #[error("leaf set is missing the required sentinel bound")]
    MissingSentinel,

    #[error("merkle proof failed verification against the claimed root")]
    VerificationFailed,
}
