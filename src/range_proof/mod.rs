//! Borromean ring-signature range proof, `L1b` of the GS construction.
//!
//! Ported from `original_source/PMS/GS/S3Cross/borromean.go`'s
//! `BorromeanProve`/`BorromeanVerify`. Each bit of the committed value gets
//! its own ring of two openings (the bit is 0 or it is 1); the rings share a
//! single Fiat-Shamir challenge `e0` that binds them together ("Borromean").
//! Grounded stylistically in the teacher's `chaum_pedersen::native`
//! (prove/verify pair, explicit transcript, `#[tracing::instrument]`).

pub mod error;

use ark_ec::Group;
use ark_std::rand::RngCore;

use crate::curve::{random_scalar, scalar_to_be_bytes, Scalar, G1};
use crate::pedersen::PedersenParams;
use crate::transcript::Transcript;
use error::RangeProofError;

const LOG_TARGET: &str = "s3cross::range_proof";

/// A Borromean range proof over `bits` bits: `bp.c` is the aggregate
/// Pedersen commitment to the value, `e0` is the shared ring challenge,
/// `c_per_bit[i]` is the per-bit commitment, and `s_per_bit[i]` is the
/// per-bit response.
#[derive(Clone, Debug)]
pub struct BorromeanProof {
    pub c: G1,
    pub e0: Scalar,
    pub c_per_bit: Vec<G1>,
    pub s_per_bit: Vec<Scalar>,
}

fn bit_decompose(value: u64, bits: usize) -> Vec<u8> {
    (0..bits).map(|i| ((value >> i) & 1) as u8).collect()
}

fn two_pow(i: usize) -> Scalar {
    let mut x = Scalar::from(1u64);
    let two = Scalar::from(2u64);
    for _ in 0..i {
        x *= two;
    }
    x
}

fn hash_g1_to_scalar(point: &G1) -> Scalar {
    let mut t = Transcript::new("s3cross/v1/borromean/hash-g1");
    t.append_g1(point);
    t.challenge_scalar()
}

/// Prove that `value < 2^bits` and that it is exactly the value committed to
/// by the returned aggregate commitment `bp.c`. Returns the proof and the
/// total blinding factor `r = sum(r_i)`, so a caller can later reveal the
/// opening of `bp.c` if needed.
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(bits))]
pub fn prove<R: RngCore + ?Sized>(
    params: &PedersenParams,
    value: u64,
    bits: usize,
    rng: &mut R,
) -> Result<(BorromeanProof, Scalar), RangeProofError> {
    if bits < 64 && value >= (1u64 << bits) {
        return Err(RangeProofError::ValueOutOfRange);
    }
    let bit_values = bit_decompose(value, bits);

    let mut k0 = vec![Scalar::from(0u64); bits];
    let mut k1 = vec![Scalar::from(0u64); bits];
    let mut k_sim = vec![Scalar::from(0u64); bits];
    let mut r_per_bit = vec![Scalar::from(0u64); bits];
    let mut c_per_bit = vec![G1::generator(); bits];
    let mut e1 = vec![Scalar::from(0u64); bits];
    let mut rings = vec![G1::generator(); bits];

    for i in 0..bits {
        if bit_values[i] == 0 {
            k0[i] = random_scalar(rng);
            rings[i] = params.g * k0[i];
        } else {
            r_per_bit[i] = random_scalar(rng);
            c_per_bit[i] = crate::pedersen::commit(params, two_pow(i), r_per_bit[i]);

            k_sim[i] = random_scalar(rng);
            e1[i] = hash_g1_to_scalar(&(params.g * k_sim[i]));

            rings[i] = c_per_bit[i] * e1[i];
        }
    }

    let mut transcript = Transcript::new("s3cross/v1/borromean/e0");
    for r in &rings {
        transcript.append_g1(r);
    }
    let e0 = transcript.challenge_scalar();

    let mut s_per_bit = vec![Scalar::from(0u64); bits];
    for i in 0..bits {
        if bit_values[i] == 0 {
            let e0_i = e0;
            k1[i] = random_scalar(rng);
            let ind_e = e0_i * two_pow(i);
            let combined = params.g * k1[i] + params.h * ind_e;
            e1[i] = hash_g1_to_scalar(&combined);

            let e1_inv = e1[i].inverse().ok_or(RangeProofError::VerificationFailed)?;
            c_per_bit[i] = (params.g * k0[i]) * e1_inv;
            r_per_bit[i] = k0[i] * e1_inv;
            s_per_bit[i] = k1[i] + (k0[i] * e0_i) * e1_inv;
        } else {
            s_per_bit[i] = k_sim[i] + e0 * r_per_bit[i];
        }
    }

    let total_r: Scalar = r_per_bit.iter().fold(Scalar::from(0u64), |a, b| a + b);

    let mut c = c_per_bit[0];
    for ci in &c_per_bit[1..] {
        c += ci;
    }

    Ok((
        BorromeanProof {
            c,
            e0,
            c_per_bit,
            s_per_bit,
        },
        total_r,
    ))
}

/// Verify a `BorromeanProof` against `bits` bits.
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(bits))]
pub fn verify(
    params: &PedersenParams,
    proof: &BorromeanProof,
    bits: usize,
) -> Result<(), RangeProofError> {
    if proof.c_per_bit.len() != bits || proof.s_per_bit.len() != bits {
        return Err(RangeProofError::BitWidthMismatch {
            expected: bits,
            got: proof.c_per_bit.len(),
        });
    }

    let mut rings = vec![G1::generator(); bits];
    for i in 0..bits {
        let e0_i = proof.e0;
        let e_ind = params.g * proof.s_per_bit[i];
        let mut e_ind2 = proof.c_per_bit[i] - params.h * two_pow(i);
        e_ind2 *= e0_i;
        let e1_i = hash_g1_to_scalar(&(e_ind - e_ind2));
        rings[i] = proof.c_per_bit[i] * e1_i;
    }

    let mut transcript = Transcript::new("s3cross/v1/borromean/e0");
    for r in &rings {
        transcript.append_g1(r);
    }
    let e0_recomputed = transcript.challenge_scalar();

    let mut c_recomputed = proof.c_per_bit[0];
    for ci in &proof.c_per_bit[1..] {
        c_recomputed += ci;
    }

    if proof.c != c_recomputed || proof.e0 != e0_recomputed {
        return Err(RangeProofError::VerificationFailed);
    }
    Ok(())
}

#[allow(dead_code)]
fn debug_scalar_bytes(s: &Scalar) -> Vec<u8> {
    scalar_to_be_bytes(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn proves_and_verifies_small_value() {
        let params = PedersenParams::test_params();
        let mut rng = StdRng::seed_from_u64(10);
        let (proof, _r) = prove(&params, 5, 4, &mut rng).unwrap();
        assert!(verify(&params, &proof, 4).is_ok());
    }

    #[test]
    fn rejects_tampered_challenge() {
        let params = PedersenParams::test_params();
        let mut rng = StdRng::seed_from_u64(11);
        let (mut proof, _r) = prove(&params, 9, 4, &mut rng).unwrap();
        proof.e0 += Scalar::from(1u64);
        assert!(verify(&params, &proof, 4).is_err());
    }

    #[test]
    fn value_out_of_range_is_rejected_at_proving_time() {
        let params = PedersenParams::test_params();
        let mut rng = StdRng::seed_from_u64(12);
        assert!(matches!(
            prove(&params, 16, 4, &mut rng),
            Err(RangeProofError::ValueOutOfRange)
        ));
    }

    #[test]
    fn commitment_matches_committed_value() {
        let params = PedersenParams::test_params();
        let mut rng = StdRng::seed_from_u64(13);
        let value = 11u64;
        let (proof, r) = prove(&params, value, 4, &mut rng).unwrap();
        let expected = crate::pedersen::commit(&params, Scalar::from(value), r);
        assert_eq!(proof.c, expected);
    }
}
