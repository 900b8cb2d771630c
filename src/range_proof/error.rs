use thiserror::Error;

#[derive(Debug, Error)]
pub enum RangeProofError {
    #[error("borromean ring length {got} does not match the configured bit width {expected}")]
    BitWidthMismatch { expected: usize, got: usize },

    #[error("value does not fit in the configured bit width")]
    ValueOutOfRange,

    #[error("borromean proof failed verification")]
    VerificationFailed,
}
