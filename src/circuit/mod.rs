//! The `L2d` Groth16 circuit for the SNARK construction (`spec.md` §4.9).
//!
//! Ported assertion-for-assertion from
//! `original_source/PMS/zkSNARKs/S3CrossMiMC/circuit.go`'s `S3CrossCircuit`:
//! an ordered-Merkle non-membership walk, a Schnorr-Edwards verification, a
//! pseudonym key re-derivation, and an ElGamal-Edwards re-encryption, all
//! over the same MiMC/Edwards-on-BN254 primitives the native modules use so
//! the circuit and the native prover always agree bit-for-bit.
//!
//! Public inputs are allocated in exactly the order `spec.md` §3 fixes for
//! the SNARK statement: `root, leaf1, leaf2, iPkX, iPkY, pPkX, pPkY, nonce,
//! sPkX, sPkY, c1X, c1Y, c2X, c2Y` — this order is load-bearing, since
//! `ark-groth16` numbers public inputs by allocation order, not by field
//! name.

pub mod gadgets;

use std::cmp::Ordering;

use ark_bn254::Fr;
use ark_ed_on_bn254::{constraints::EdwardsVar, EdwardsProjective};
use ark_ec::Group;
use ark_r1cs_std::{
    alloc::AllocVar,
    cmp::CmpGadget,
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
    groups::CurveVar,
};
use ark_relations::gr1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use gadgets::{enforce_fits_in_bits, index_bits, mimc_compress_gadget, mimc_hash_gadget};

/// `numBits` in the Go source: the pseudonym counter `I` is range-checked to
/// `[1, 2^NONCE_BITS)`.
pub const NONCE_BITS: usize = 4;

/// Witness shape for the ordered Merkle non-membership walk over `leaf1`.
#[derive(Clone, Default)]
pub struct MerkleWitness {
    pub proof_elements1: Vec<Option<Fr>>,
    pub proof_index1: Option<Fr>,
}

/// Full circuit witness/statement. Every field is `Option` so the same type
/// serves both as the real assignment (proving) and as the all-`None` dummy
/// passed to `Groth16::circuit_specific_setup`.
#[derive(Clone)]
pub struct S3CrossCircuit {
    pub depth: usize,

    // Ordered Merkle non-membership (`L2a`).
    pub root: Option<Fr>,
    pub merkle: MerkleWitness,
    pub leaf1: Option<Fr>,
    pub leaf2: Option<Fr>,

    // Schnorr-Edwards (`L2b`): the issuer's signature over the user's
    // identity public key.
    pub i_pk_x: Option<Fr>,
    pub i_pk_y: Option<Fr>,
    pub sig: Option<Fr>,
    pub r_x: Option<Fr>,
    pub r_y: Option<Fr>,
    pub message_x: Option<Fr>,
    pub message_y: Option<Fr>,

    // Pseudonym key re-derivation.
    pub p_pk_x: Option<Fr>,
    pub p_pk_y: Option<Fr>,
    pub nonce: Option<Fr>,
    pub u_sk: Option<Fr>,
    pub i: Option<Fr>,

    // ElGamal-Edwards (`L2c`): encryption of the issuer public key under the
    // session public key.
    pub s_pk_x: Option<Fr>,
    pub s_pk_y: Option<Fr>,
    pub c1_x: Option<Fr>,
    pub c1_y: Option<Fr>,
    pub c2_x: Option<Fr>,
    pub c2_y: Option<Fr>,
    pub r: Option<Fr>,
}

impl S3CrossCircuit {
    /// An all-`None` circuit of the right shape, for `circuit_specific_setup`.
    pub fn empty(depth: usize) -> Self {
        Self {
            depth,
            root: None,
            merkle: MerkleWitness {
                proof_elements1: vec![None; depth],
                proof_index1: None,
            },
            leaf1: None,
            leaf2: None,
            i_pk_x: None,
            i_pk_y: None,
            sig: None,
            r_x: None,
            r_y: None,
            message_x: None,
            message_y: None,
            p_pk_x: None,
            p_pk_y: None,
            nonce: None,
            u_sk: None,
            i: None,
            s_pk_x: None,
            s_pk_y: None,
            c1_x: None,
            c1_y: None,
            c2_x: None,
            c2_y: None,
            r: None,
        }
    }
}

fn alloc_input(
    cs: ConstraintSystemRef<Fr>,
    value: Option<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    FpVar::new_input(cs, || value.ok_or(SynthesisError::AssignmentMissing))
}

fn alloc_witness(
    cs: ConstraintSystemRef<Fr>,
    value: Option<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    FpVar::new_witness(cs, || value.ok_or(SynthesisError::AssignmentMissing))
}

impl ConstraintSynthesizer<Fr> for S3CrossCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // Public inputs, in the exact order `spec.md` §3 fixes.
        let root_var = alloc_input(cs.clone(), self.root)?;
        let leaf1_var = alloc_input(cs.clone(), self.leaf1)?;
        let leaf2_var = alloc_input(cs.clone(), self.leaf2)?;
        let i_pk_x_var = alloc_input(cs.clone(), self.i_pk_x)?;
        let i_pk_y_var = alloc_input(cs.clone(), self.i_pk_y)?;
        let p_pk_x_var = alloc_input(cs.clone(), self.p_pk_x)?;
        let p_pk_y_var = alloc_input(cs.clone(), self.p_pk_y)?;
        let nonce_var = alloc_input(cs.clone(), self.nonce)?;
        let s_pk_x_var = alloc_input(cs.clone(), self.s_pk_x)?;
        let s_pk_y_var = alloc_input(cs.clone(), self.s_pk_y)?;
        let c1_x_var = alloc_input(cs.clone(), self.c1_x)?;
        let c1_y_var = alloc_input(cs.clone(), self.c1_y)?;
        let c2_x_var = alloc_input(cs.clone(), self.c2_x)?;
        let c2_y_var = alloc_input(cs.clone(), self.c2_y)?;

        // Private witnesses.
        let proof_index1_var = alloc_witness(cs.clone(), self.merkle.proof_index1)?;
        let mut proof_elements1_var = Vec::with_capacity(self.depth);
        for element in &self.merkle.proof_elements1 {
            proof_elements1_var.push(alloc_witness(cs.clone(), *element)?);
        }
        let sig_var = alloc_witness(cs.clone(), self.sig)?;
        let r_x_var = alloc_witness(cs.clone(), self.r_x)?;
        let r_y_var = alloc_witness(cs.clone(), self.r_y)?;
        let message_x_var = alloc_witness(cs.clone(), self.message_x)?;
        let message_y_var = alloc_witness(cs.clone(), self.message_y)?;
        let u_sk_var = alloc_witness(cs.clone(), self.u_sk)?;
        let i_var = alloc_witness(cs.clone(), self.i)?;
        let r_elgamal_var = alloc_witness(cs.clone(), self.r)?;

        let base_var = EdwardsVar::new_constant(cs.clone(), EdwardsProjective::generator())?;

        // --- L2a: ordered Merkle non-membership walk over `leaf1`. -----
        let indices = index_bits(&proof_index1_var, self.depth)?;
        let mut hashed = leaf1_var.clone();
        for (sibling, bit) in proof_elements1_var.iter().zip(indices.iter()) {
            let left = bit.select(sibling, &hashed)?;
            let right = bit.select(&hashed, sibling)?;
            hashed = mimc_compress_gadget(left, right)?;
        }
        hashed.enforce_equal(&root_var)?;

        let u_sk_bits = u_sk_var.to_bits_le()?;
        let upk_var = base_var.scalar_mul_le(u_sk_bits.iter())?;
        let h_upk = mimc_hash_gadget(&[upk_var.x.clone(), upk_var.y.clone()])?;

        let one = FpVar::constant(Fr::from(1u64));
        (&leaf1_var + &one).enforce_cmp(&h_upk, Ordering::Less, true)?;
        (&h_upk + &one).enforce_cmp(&leaf2_var, Ordering::Less, true)?;

        // --- L2b: Schnorr-Edwards verification of the issuer's signature
        // over the user's identity public key. ---------------------------
        let ipk_var = EdwardsVar::new(i_pk_x_var.clone(), i_pk_y_var.clone());
        let r_point_var = EdwardsVar::new(r_x_var, r_y_var);

        let challenge = mimc_hash_gadget(&[
            i_pk_x_var.clone(),
            i_pk_y_var.clone(),
            r_point_var.x.clone(),
            r_point_var.y.clone(),
            message_x_var.clone(),
            message_y_var.clone(),
        ])?;

        let sig_bits = sig_var.to_bits_le()?;
        let s_point = base_var.scalar_mul_le(sig_bits.iter())?;
        let challenge_bits = challenge.to_bits_le()?;
        let xc_point = ipk_var.scalar_mul_le(challenge_bits.iter())?;
        let r_plus_xc = r_point_var + xc_point;

        s_point.x.enforce_equal(&r_plus_xc.x)?;
        s_point.y.enforce_equal(&r_plus_xc.y)?;
        upk_var.x.enforce_equal(&message_x_var)?;
        upk_var.y.enforce_equal(&message_y_var)?;

        // --- Pseudonym key re-derivation. --------------------------------
        i_var.enforce_not_equal(&FpVar::constant(Fr::from(0u64)))?;
        enforce_fits_in_bits(&i_var, NONCE_BITS)?;

        let h_out = mimc_hash_gadget(&[nonce_var, i_var])?;
        let p_sk_var = (&u_sk_var + &h_out).inverse()?;
        let p_sk_bits = p_sk_var.to_bits_le()?;
        let ppk_var = base_var.scalar_mul_le(p_sk_bits.iter())?;
        ppk_var.x.enforce_equal(&p_pk_x_var)?;
        ppk_var.y.enforce_equal(&p_pk_y_var)?;

        // --- L2c: ElGamal-Edwards re-encryption check. -------------------
        let spk_var = EdwardsVar::new(s_pk_x_var, s_pk_y_var);
        let r_bits = r_elgamal_var.to_bits_le()?;
        let c1_point = base_var.scalar_mul_le(r_bits.iter())?;
        let c2_point = spk_var.scalar_mul_le(r_bits.iter())? + upk_var;

        c1_point.x.enforce_equal(&c1_x_var)?;
        c1_point.y.enforce_equal(&c1_y_var)?;
        c2_point.x.enforce_equal(&c2_x_var)?;
        c2_point.y.enforce_equal(&c2_y_var)?;

        Ok(())
    }
}
