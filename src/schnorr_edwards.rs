//! Schnorr signature over Edwards-BN254, `L2b` of the SNARK construction.
//!
//! Ported from `original_source/PMS/zkSNARKs/S3CrossMiMC/schnorr.go`. MiMC,
//! not SHA-256, derives the Fiat-Shamir challenge because this verifier is
//! re-run *inside* the Groth16 circuit (`spec.md` §4.7, §4.9 item 3); the
//! native version here is what the SNARK-branch prover runs to produce the
//! issuer's witness signature before it is re-verified in-circuit.

use ark_ec::Group;
use ark_ff::UniformRand;
use ark_std::rand::RngCore;

use crate::edwards::{base_to_ed_scalar, EdPoint, EdScalar};
use crate::mimc;

#[derive(Clone, Copy, Debug)]
pub struct KeyPair {
    pub sk: EdScalar,
    pub pk: EdPoint,
}

impl KeyPair {
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let sk = EdScalar::rand(rng);
        let pk = EdPoint::generator() * sk;
        Self { sk, pk }
    }

    pub fn from_secret(sk: EdScalar) -> Self {
        Self {
            sk,
            pk: EdPoint::generator() * sk,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Signature {
    pub s: EdScalar,
    pub r: EdPoint,
    pub message: EdPoint,
    pub signer_pk: EdPoint,
}

fn point_coords(p: &EdPoint) -> (crate::curve::Scalar, crate::curve::Scalar) {
    use ark_ec::CurveGroup;
    let affine = p.into_affine();
    (affine.x, affine.y)
}

fn challenge(signer_pk: &EdPoint, r: &EdPoint, message: &EdPoint) -> crate::curve::Scalar {
    let (pkx, pky) = point_coords(signer_pk);
    let (rx, ry) = point_coords(r);
    let (mx, my) = point_coords(message);
    mimc::hash(&[pkx, pky, rx, ry, mx, my])
}

/// `Sign(message)`: pick `r`, `R = r*B`, `c = MiMC(pk ‖ R ‖ message)`,
/// `s = r + c*sk mod curve.Order`. Returns the signature and the nonce `r`
/// (needed by the circuit witness, mirroring the Go function's second
/// return value).
pub fn sign<R: RngCore + ?Sized>(
    keypair: &KeyPair,
    message: EdPoint,
    rng: &mut R,
) -> (Signature, EdScalar) {
    let r = EdScalar::rand(rng);
    let r_point = EdPoint::generator() * r;

    let c_base = challenge(&keypair.pk, &r_point, &message);
    let c = base_to_ed_scalar(&c_base);

    let s = r + c * keypair.sk;

    (
        Signature {
            s,
            r: r_point,
            message,
            signer_pk: keypair.pk,
        },
        r,
    )
}

/// `Verify()`: `s*B = R + c*pk`.
pub fn verify(sig: &Signature) -> bool {
    let c_base = challenge(&sig.signer_pk, &sig.r, &sig.message);
    let c = base_to_ed_scalar(&c_base);

    let lhs = EdPoint::generator() * sig.s;
    let rhs = sig.r + sig.signer_pk * c;
    lhs == rhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn sign_and_verify_round_trip() {
        let mut rng = StdRng::seed_from_u64(400);
        let keypair = KeyPair::generate(&mut rng);
        let message = EdPoint::generator() * EdScalar::rand(&mut rng);
        let (sig, _r) = sign(&keypair, message, &mut rng);
        assert!(verify(&sig));
    }

    #[test]
    fn tampered_signature_fails() {
        let mut rng = StdRng::seed_from_u64(401);
        let keypair = KeyPair::generate(&mut rng);
        let message = EdPoint::generator() * EdScalar::rand(&mut rng);
        let (mut sig, _r) = sign(&keypair, message, &mut rng);
        sig.s += EdScalar::from(1u64);
        assert!(!verify(&sig));
    }
}
