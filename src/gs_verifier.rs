//! GS-branch composite prover/verifier, `§4.5` of the spec: `GenPseudonym`
//! and `VerifyPseudonym` orchestrate the range proof, group signature, and
//! linker in sequence, short-circuiting on first failure with a distinct
//! error kind per `spec.md` §7.

use ark_std::rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::curve::{Scalar, G1};
use crate::error::{ProofRejectedKind, S3CrossError};
use crate::group_sig::{self, GroupParams, GroupSignature, UserKey};
use crate::linker::{self, LinkerProof, LinkerStatement, LinkerWitness};
use crate::params::{PpWire, RangeProofBits};
use crate::pedersen::PedersenParams;
use crate::range_proof::{self, BorromeanProof};
use crate::serde_support::{canonical, canonical_vec};
use crate::signed_scalar::SignedScalar;

/// The keypair the prover walks away with: `sk = p` (the pseudonym secret)
/// and `pk = C1 = p·h` (the pseudonym public key, i.e. the ledger's lookup
/// key for the resulting record).
#[derive(Clone, Copy, Debug)]
pub struct PseudonymKeyPair {
    pub sk: Scalar,
    pub pk: G1,
}

/// The full GS-branch proof blob (`spec.md` §6's "GS proof blob"): the
/// Borromean range proof, the group signature, and the linker proof, each
/// base64-enveloped field-wise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct S3CrossProof {
    #[serde(with = "canonical")]
    pub c: G1,
    #[serde(with = "canonical")]
    pub e0: Scalar,
    #[serde(with = "canonical_vec")]
    pub c_per_bit: Vec<G1>,
    #[serde(with = "canonical_vec")]
    pub s_per_bit: Vec<Scalar>,

    #[serde(with = "canonical")]
    pub m: G1,
    #[serde(with = "canonical")]
    pub c1: G1,
    #[serde(with = "canonical")]
    pub c2: G1,
    #[serde(with = "canonical")]
    pub a1: G1,
    #[serde(with = "canonical")]
    pub a_bar: G1,
    #[serde(with = "canonical")]
    pub d: G1,
    #[serde(with = "canonical")]
    pub gs_c: Scalar,
    #[serde(with = "canonical")]
    pub s_x: Scalar,
    #[serde(with = "canonical")]
    pub s_y: Scalar,
    #[serde(with = "canonical")]
    pub s_r: Scalar,
    #[serde(with = "canonical")]
    pub s_r2: Scalar,
    #[serde(with = "canonical")]
    pub s_r3: Scalar,
    pub s_s: SignedScalar,

    #[serde(with = "canonical")]
    pub cp: Scalar,
    #[serde(with = "canonical")]
    pub s_yp: Scalar,
    #[serde(with = "canonical")]
    pub s_vp: Scalar,
    #[serde(with = "canonical")]
    pub s_rp: Scalar,
    #[serde(with = "canonical")]
    pub s_pp: Scalar,
}

impl S3CrossProof {
    fn from_parts(bp: BorromeanProof, gs: GroupSignature, lp: LinkerProof) -> Self {
        Self {
            c: bp.c,
            e0: bp.e0,
            c_per_bit: bp.c_per_bit,
            s_per_bit: bp.s_per_bit,
            m: gs.m,
            c1: gs.c1,
            c2: gs.c2,
            a1: gs.a1,
            a_bar: gs.a_bar,
            d: gs.d,
            gs_c: gs.c,
            s_x: gs.s_x,
            s_y: gs.s_y,
            s_r: gs.s_r,
            s_r2: gs.s_r2,
            s_r3: gs.s_r3,
            s_s: gs.s_s,
            cp: lp.cp,
            s_yp: lp.s_yp,
            s_vp: lp.s_vp,
            s_rp: lp.s_rp,
            s_pp: lp.s_pp,
        }
    }

    fn borromean_proof(&self) -> BorromeanProof {
        BorromeanProof {
            c: self.c,
            e0: self.e0,
            c_per_bit: self.c_per_bit.clone(),
            s_per_bit: self.s_per_bit.clone(),
        }
    }

    fn group_signature(&self) -> GroupSignature {
        GroupSignature {
            m: self.m,
            c1: self.c1,
            c2: self.c2,
            a1: self.a1,
            a_bar: self.a_bar,
            d: self.d,
            c: self.gs_c,
            s_x: self.s_x,
            s_y: self.s_y,
            s_r: self.s_r,
            s_r2: self.s_r2,
            s_r3: self.s_r3,
            s_s: self.s_s.clone(),
        }
    }

    fn linker_proof(&self) -> LinkerProof {
        LinkerProof {
            cp: self.cp,
            s_yp: self.s_yp,
            s_vp: self.s_vp,
            s_rp: self.s_rp,
            s_pp: self.s_pp,
        }
    }
}

/// `GenPseudonym(M, nonce, v, bits)`: the full GS-branch prover.
#[tracing::instrument(target = "s3cross::gs_verifier", skip_all, fields(bits = bits.0))]
pub fn gen_pseudonym<R: RngCore + ?Sized>(
    usk: &UserKey,
    pp: &PedersenParams,
    m: G1,
    nonce: Scalar,
    v: u64,
    bits: RangeProofBits,
    rng: &mut R,
) -> Result<(PseudonymKeyPair, S3CrossProof), S3CrossError> {
    let (bo_proof, r) = range_proof::prove(pp, v, bits.0, rng)
        .map_err(|e| S3CrossError::ProofRejected(ProofRejectedKind::RangeBad, e.to_string()))?;

    let v_scalar = Scalar::from(v);
    let denom = (usk.y + v_scalar + Scalar::from(1u64))
        .inverse()
        .ok_or_else(|| S3CrossError::Invariant("y + v + 1 is not invertible mod r".into()))?;
    let p = nonce * denom;

    let gs = usk
        .sign(m, p, rng)
        .map_err(|e| S3CrossError::ProofRejected(ProofRejectedKind::GroupSigBad, e.to_string()))?;

    let statement = LinkerStatement {
        gs_challenge: gs.c,
        pedersen_params: pp,
        gs_h: usk.params.h,
        borromean_commitment: bo_proof.c,
        c1: gs.c1,
        c2: gs.c2,
        pk: usk.params.pk,
        nonce,
    };
    let witness = LinkerWitness {
        y: usk.y,
        v: v_scalar,
        r,
        p,
    };
    let link_proof = linker::prove(&statement, &witness, rng);

    let keypair = PseudonymKeyPair { sk: p, pk: gs.c1 };
    Ok((keypair, S3CrossProof::from_parts(bo_proof, gs, link_proof)))
}

/// `VerifyPseudonym(proof, PP, GP, nonce, bits)`: run the range proof, then
/// the group signature, then the linker, short-circuiting on first failure.
#[tracing::instrument(target = "s3cross::gs_verifier", skip_all, fields(bits = bits.0))]
pub fn verify_pseudonym(
    proof: &S3CrossProof,
    pp: &PedersenParams,
    gp: &GroupParams,
    nonce: Scalar,
    bits: RangeProofBits,
) -> Result<(), S3CrossError> {
    let bo_proof = proof.borromean_proof();
    range_proof::verify(pp, &bo_proof, bits.0)
        .map_err(|e| S3CrossError::ProofRejected(ProofRejectedKind::RangeBad, e.to_string()))?;

    let gs = proof.group_signature();
    group_sig::verify(&gs, gp)
        .map_err(|e| S3CrossError::ProofRejected(ProofRejectedKind::GroupSigBad, e.to_string()))?;

    let statement = LinkerStatement {
        gs_challenge: gs.c,
        pedersen_params: pp,
        gs_h: gp.h,
        borromean_commitment: bo_proof.c,
        c1: gs.c1,
        c2: gs.c2,
        pk: gp.pk,
        nonce,
    };
    let link_proof = proof.linker_proof();
    if !linker::verify(&statement, &link_proof) {
        return Err(S3CrossError::ProofRejected(
            ProofRejectedKind::LinkerBad,
            "linker challenge mismatch".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::random_scalar;
    use crate::group_sig::Manager;
    use ark_ec::Group;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn setup() -> (Manager, UserKey, PedersenParams) {
        let mut rng = StdRng::seed_from_u64(300);
        let g1 = G1::generator();
        let g2 = ark_bn254::G2Projective::generator();
        let h = G1::generator() * random_scalar(&mut rng);
        let h0 = G1::generator() * random_scalar(&mut rng);
        let manager = Manager::keygen(g1, g2, h, h0, &mut rng);

        let y = random_scalar(&mut rng);
        let y0 = manager.params.h0 * (-y);
        let (x, a) = manager.enroll(y0, &mut rng).unwrap();
        let usk = UserKey {
            x,
            y,
            a,
            params: manager.params.clone(),
        };

        // Independent of `manager.params.h` — spec §3 requires Pedersen and
        // group-sig generators to be unrelated.
        let pp = PedersenParams::new(G1::generator(), G1::generator() * random_scalar(&mut rng));
        (manager, usk, pp)
    }

    #[test]
    fn happy_path_generates_and_verifies() {
        let (_manager, usk, pp) = setup();
        let mut rng = StdRng::seed_from_u64(301);
        let m = G1::generator() * random_scalar(&mut rng);
        let nonce = random_scalar(&mut rng);
        let bits = RangeProofBits(4);

        let (_keypair, proof) =
            gen_pseudonym(&usk, &pp, m, nonce, 7, bits, &mut rng).expect("proving succeeds");
        assert!(verify_pseudonym(&proof, &pp, &usk.params, nonce, bits).is_ok());
    }

    #[test]
    fn range_violation_is_rejected_at_proving_time() {
        let (_manager, usk, pp) = setup();
        let mut rng = StdRng::seed_from_u64(302);
        let m = G1::generator() * random_scalar(&mut rng);
        let nonce = random_scalar(&mut rng);
        let bits = RangeProofBits(4);

        let result = gen_pseudonym(&usk, &pp, m, nonce, 16, bits, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn bit_flip_in_proof_is_rejected() {
        let (_manager, usk, pp) = setup();
        let mut rng = StdRng::seed_from_u64(303);
        let m = G1::generator() * random_scalar(&mut rng);
        let nonce = random_scalar(&mut rng);
        let bits = RangeProofBits(4);

        let (_keypair, mut proof) =
            gen_pseudonym(&usk, &pp, m, nonce, 7, bits, &mut rng).expect("proving succeeds");
        proof.s_r3 += Scalar::from(1u64);
        let err = verify_pseudonym(&proof, &pp, &usk.params, nonce, bits).unwrap_err();
        assert!(matches!(
            err,
            S3CrossError::ProofRejected(ProofRejectedKind::GroupSigBad, _)
        ));
    }
}
