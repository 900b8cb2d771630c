//! S3Cross linker, `L1d` of the GS construction.
//!
//! Ported from `original_source/PMS/GS/S3Cross/s3cross.go`'s linking
//! Σ-protocol. Binds three otherwise-independent artifacts: the Borromean
//! opening of the range-proof commitment `C` to the counter `v`, the
//! group-sig ElGamal ciphertext `(C1, C2)`, and the pseudonym equation
//! `p·(y+v+1) ≡ nonce (mod r)` rewritten pointwise on G1 as
//! `nonce·h − C1 = (y+v)·C1`. Grounded stylistically in the teacher's
//! `chaum_pedersen::native` (an equality-of-discrete-log style Σ-protocol
//! with an explicit `prove`/`verify` pair and a Fiat-Shamir challenge
//! derived from an ordered transcript).
//!
//! The `h` used in the `nonce·h − C1` term and in `pm3`'s `−sYP·h` term is
//! the **group-signature** generator (`gp.h` in `VerifyPseudonym`, lines 108
//! and 115 of `s3cross.go`), not the Pedersen `H` — `C1 = p·gp.h` and
//! `C2 = −y·gp.h + p·pk`, so the identities these two terms close only hold
//! against `gp.h`. Pedersen's `H` appears only in the `pm2` commitment term
//! and in the Fiat-Shamir transcript. Spec §3 declares Pedersen `(G,H)` and
//! group-sig `(h,h0)` independent generators, so conflating them here would
//! reject honest proofs whenever `pp.h != gp.h`.

use ark_std::rand::RngCore;

use crate::curve::{random_scalar, Scalar, G1};
use crate::pedersen::{self, PedersenParams};
use crate::transcript::Transcript;

const DOMAIN: &str = "s3cross/v1/link";
const LOG_TARGET: &str = "s3cross::linker";

/// The statement the linker binds together: the group-sig challenge `c`, the
/// Pedersen parameters `(G, H)`, the Borromean aggregate commitment `C`, the
/// ElGamal ciphertext `(C1, C2)`, the supervisor key `pk`, and the session
/// `nonce`.
pub struct LinkerStatement<'a> {
    pub gs_challenge: Scalar,
    pub pedersen_params: &'a PedersenParams,
    /// The group-signature generator `gp.h` — distinct from
    /// `pedersen_params.h`, used for the `nonce·h − C1` and `pm3` `h` terms.
    pub gs_h: G1,
    pub borromean_commitment: G1,
    pub c1: G1,
    pub c2: G1,
    pub pk: G1,
    pub nonce: Scalar,
}

/// Witness known only to the prover: the tracing secret `y`, the range
/// proof's value `v` and aggregate randomness `r`, and the ElGamal secret
/// `p`.
pub struct LinkerWitness {
    pub y: Scalar,
    pub v: Scalar,
    pub r: Scalar,
    pub p: Scalar,
}

#[derive(Clone, Debug)]
pub struct LinkerProof {
    pub cp: Scalar,
    pub s_yp: Scalar,
    pub s_vp: Scalar,
    pub s_rp: Scalar,
    pub s_pp: Scalar,
}

fn challenge_transcript(
    statement: &LinkerStatement,
    pm1: &G1,
    pm2: &G1,
    pm3: &G1,
) -> Transcript {
    let mut t = Transcript::new(DOMAIN);
    t.append_bytes(&crate::curve::scalar_to_be_bytes(&statement.gs_challenge))
        .append_g1(&statement.pedersen_params.g)
        .append_g1(&statement.pedersen_params.h)
        .append_g1(&statement.borromean_commitment)
        .append_g1(pm1)
        .append_g1(pm2)
        .append_g1(pm3);
    t
}

#[tracing::instrument(target = LOG_TARGET, skip_all)]
pub fn prove<R: RngCore + ?Sized>(
    statement: &LinkerStatement,
    witness: &LinkerWitness,
    rng: &mut R,
) -> LinkerProof {
    let r_y = random_scalar(rng);
    let r_v = random_scalar(rng);
    let r_r = random_scalar(rng);
    let r_p = random_scalar(rng);

    let pm1 = statement.c1 * (r_y + r_v);
    let pm2 = pedersen::commit(statement.pedersen_params, r_v, r_r);
    let pm3 = statement.pk * r_p - statement.gs_h * r_y;

    let cp = challenge_transcript(statement, &pm1, &pm2, &pm3).challenge_scalar();

    LinkerProof {
        cp,
        s_yp: r_y + cp * witness.y,
        s_vp: r_v + cp * witness.v,
        s_rp: r_r + cp * witness.r,
        s_pp: r_p + cp * witness.p,
    }
}

#[tracing::instrument(target = LOG_TARGET, skip_all)]
pub fn verify(statement: &LinkerStatement, proof: &LinkerProof) -> bool {
    let nonce_h_minus_c1 = statement.gs_h * statement.nonce - statement.c1;

    let pm1 = statement.c1 * (proof.s_yp + proof.s_vp) - nonce_h_minus_c1 * proof.cp;
    let pm2 = pedersen::commit(statement.pedersen_params, proof.s_vp, proof.s_rp)
        - statement.borromean_commitment * proof.cp;
    let pm3 = statement.pk * proof.s_pp - statement.gs_h * proof.s_yp - statement.c2 * proof.cp;

    let cp_recomputed = challenge_transcript(statement, &pm1, &pm2, &pm3).challenge_scalar();
    cp_recomputed == proof.cp
}
