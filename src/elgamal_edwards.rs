//! ElGamal encryption over Edwards-BN254, `L2c` of the SNARK construction.
//!
//! Ported from `original_source/PMS/zkSNARKs/S3CrossMiMC/elgamal.go`:
//! `(C1, C2) = (r*B, m + r*pk)`, decrypting as `m = C2 - sk*C1`.

use ark_ec::Group;
use ark_ff::UniformRand;
use ark_std::rand::RngCore;

use crate::edwards::{EdPoint, EdScalar};
use crate::schnorr_edwards::KeyPair;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    pub c1: EdPoint,
    pub c2: EdPoint,
}

/// `Encrypt(message, pk)`: returns the ciphertext and the randomness `r`
/// (needed by the circuit witness).
pub fn encrypt<R: RngCore + ?Sized>(
    message: EdPoint,
    pk: EdPoint,
    rng: &mut R,
) -> (Ciphertext, EdScalar) {
    let r = EdScalar::rand(rng);
    let c1 = EdPoint::generator() * r;
    let c2 = message + pk * r;
    (Ciphertext { c1, c2 }, r)
}

pub fn decrypt(keypair: &KeyPair, ct: &Ciphertext) -> EdPoint {
    ct.c2 - ct.c1 * keypair.sk
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn encrypt_and_decrypt_round_trip() {
        let mut rng = StdRng::seed_from_u64(500);
        let keypair = KeyPair::generate(&mut rng);
        let message = EdPoint::generator() * EdScalar::rand(&mut rng);
        let (ct, _r) = encrypt(message, keypair.pk, &mut rng);
        assert_eq!(decrypt(&keypair, &ct), message);
    }
}
