//! Cross-domain anonymous pseudonym issuance and verification over BN254.
//!
//! Two independent constructions share the same ledger surface:
//!
//! - the **GS construction** (`group_sig`, `range_proof`, `linker`,
//!   `gs_verifier`): a BBS-SE group signature plus a Borromean range proof,
//!   bound together by a Σ-protocol linker.
//! - the **SNARK construction** (`edwards`, `schnorr_edwards`,
//!   `elgamal_edwards`, `merkle`, `pseudonym`, `circuit`, `snark_verifier`):
//!   a Groth16 circuit over MiMC, ordered Merkle non-membership,
//!   Schnorr-Edwards and ElGamal-Edwards.
//!
//! `ledger` is the verifier-adapter surface both constructions persist
//! accepted pseudonyms through.

pub mod curve;
pub mod edwards;
pub mod elgamal_edwards;
pub mod error;
pub mod group_sig;
pub mod gs_verifier;
pub mod ledger;
pub mod linker;
pub mod merkle;
pub mod mimc;
pub mod params;
pub mod pedersen;
pub mod pseudonym;
pub mod range_proof;
pub mod schnorr_edwards;
pub mod serde_support;
pub mod signed_scalar;
pub mod transcript;

pub mod circuit;
pub mod snark_verifier;
