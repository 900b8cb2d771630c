use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupSigError {
    #[error("A1 is the group identity, a malformed group signature")]
    IdentityA1,

    #[error("pairing check e(A1, w) = e(A_, g2) failed")]
    PairingCheckFailed,

    #[error("proof-of-knowledge verification failed")]
    SokVerificationFailed,

    #[error("user key does not satisfy e(A, w + g2^x) = e(g1 - h0^y, g2)")]
    UserKeyInvalid,

    #[error("revoked key xi collides with the user's own x")]
    RevokedKeyInvalid,
}
