//! MiMC hash over the BN254 scalar field.
//!
//! Used both natively (ordered Merkle tree, pseudonym nonce derivation,
//! Schnorr-Edwards challenges) and, eventually, inside the Groth16 circuit,
//! so the permutation is written to be gadget-friendly: a long Feistel-style
//! chain of `x -> (x + k + c_i)^7` additions, the same shape gnark's
//! `mimc.Hash` uses over `bn254.fr`.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use sha2::{Digest, Sha256};

use crate::curve::Scalar;

/// Number of rounds. gnark's BN254 MiMC instance uses 91 rounds; we match it
/// so that a future circuit gadget has a familiar constraint count.
pub const MIMC_ROUNDS: usize = 91;

/// Deterministically derive the round constants by hashing a domain tag and a
/// counter into `F_r`. There is no standardized, audited constant set shipped
/// by `arkworks` for MiMC-over-BN254, so we generate our own fixed sequence
/// the same way many from-scratch MiMC ports seed theirs: SHA-256 of a
/// counter, reduced mod `r`. The first constant is fixed to zero, matching
/// gnark's convention of an all-zero round for the first application.
pub(crate) fn round_constants() -> Vec<Fr> {
    let mut constants = Vec::with_capacity(MIMC_ROUNDS);
    constants.push(Fr::from(0u64));
    for i in 1..MIMC_ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(b"s3cross/mimc/round-constant");
        hasher.update((i as u64).to_be_bytes());
        let digest = hasher.finalize();
        constants.push(Fr::from_be_bytes_mod_order(&digest));
    }
    constants
}

pub(crate) fn constants() -> &'static [Fr] {
    use std::sync::OnceLock;
    static CONSTANTS: OnceLock<Vec<Fr>> = OnceLock::new();
    CONSTANTS.get_or_init(round_constants)
}

/// One MiMC permutation round: `(x + k + c)^7`.
fn mimc_round(x: Scalar, k: Scalar, c: Scalar) -> Scalar {
    let t = x + k + c;
    let t2 = t * t;
    let t4 = t2 * t2;
    t4 * t2 * t
}

/// MiMC-Feistel permutation with key `k`, matching gnark's `mimc.Hash`
/// internal permutation (the "encrypt" half of a Miyaguchi-Preneel
/// construction).
fn mimc_permute(x: Scalar, k: Scalar) -> Scalar {
    let mut state = x;
    for &c in constants() {
        state = mimc_round(state, k, c);
    }
    state + k
}

/// Two-to-one compression function `H(l, r)` used at every ordered-Merkle
/// tree node: `H(l, r) = MiMC(l, key = r) + r` via Miyaguchi-Preneel feedback,
/// so the compression is collision resistant even though the raw permutation
/// is a keyed cipher.
pub fn compress(left: Scalar, right: Scalar) -> Scalar {
    mimc_permute(left, right) + left
}

/// Sponge-style hash of an arbitrary number of field elements, used for
/// nonce/challenge derivation outside the tree (e.g. Schnorr-Edwards
/// challenges, pseudonym nonce hashing). Each element is folded in with the
/// running state as the MiMC key, Merkle-Damgard style.
pub fn hash(inputs: &[Scalar]) -> Scalar {
    let mut state = Scalar::from(0u64);
    for &x in inputs {
        state = compress(state, x);
    }
    state
}

/// Reduce an arbitrary big-endian byte string into `F_r` before MiMC-hashing
/// it as a single block, used at the ordered Merkle tree's leaf-ingest
/// boundary (see `merkle.rs`) where raw leaf bytes — including the sentinel
/// default leaf, which is the field modulus' own byte encoding and therefore
/// not itself a canonical field element — must be folded into a scalar
/// before any MiMC application.
pub fn scalar_from_bytes_mod_order(bytes: &[u8]) -> Scalar {
    Scalar::from_be_bytes_mod_order(bytes)
}

pub fn scalar_to_be_bytes(x: &Scalar) -> Vec<u8> {
    x.into_bigint().to_bytes_be()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_is_deterministic() {
        let a = Scalar::from(7u64);
        let b = Scalar::from(11u64);
        assert_eq!(compress(a, b), compress(a, b));
    }

    #[test]
    fn compress_is_not_commutative() {
        let a = Scalar::from(7u64);
        let b = Scalar::from(11u64);
        assert_ne!(compress(a, b), compress(b, a));
    }

    #[test]
    fn hash_of_empty_is_zero() {
        assert_eq!(hash(&[]), Scalar::from(0u64));
    }

    #[test]
    fn hash_distinguishes_inputs() {
        let h1 = hash(&[Scalar::from(1u64), Scalar::from(2u64)]);
        let h2 = hash(&[Scalar::from(1u64), Scalar::from(3u64)]);
        assert_ne!(h1, h2);
    }
}
