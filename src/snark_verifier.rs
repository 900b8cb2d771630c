//! Groth16 setup/prove/verify wrapper for the `S3CrossCircuit` (`spec.md`
//! §4.9, §6's SNARK wire format).
//!
//! Public inputs are assembled in the exact order `circuit::S3CrossCircuit`
//! allocates them in — `ark-groth16` numbers a statement's public inputs by
//! allocation order, so `PublicInputs::to_field_vec` must track the circuit's
//! `alloc_input` call sequence field-for-field.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, ProvingKey, VerifyingKey};
use ark_snark::SNARK;
use ark_std::rand::RngCore;

use crate::circuit::{MerkleWitness, S3CrossCircuit, NONCE_BITS};
use crate::error::{ProofRejectedKind, S3CrossError};
use crate::merkle::NonMembershipProof;

/// The statement's 14 public field elements, in wire/circuit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicInputs {
    pub root: Fr,
    pub leaf1: Fr,
    pub leaf2: Fr,
    pub i_pk_x: Fr,
    pub i_pk_y: Fr,
    pub p_pk_x: Fr,
    pub p_pk_y: Fr,
    pub nonce: Fr,
    pub s_pk_x: Fr,
    pub s_pk_y: Fr,
    pub c1_x: Fr,
    pub c1_y: Fr,
    pub c2_x: Fr,
    pub c2_y: Fr,
}

impl PublicInputs {
    pub fn to_field_vec(&self) -> Vec<Fr> {
        vec![
            self.root,
            self.leaf1,
            self.leaf2,
            self.i_pk_x,
            self.i_pk_y,
            self.p_pk_x,
            self.p_pk_y,
            self.nonce,
            self.s_pk_x,
            self.s_pk_y,
            self.c1_x,
            self.c1_y,
            self.c2_x,
            self.c2_y,
        ]
    }
}

/// The private witness half of the statement.
#[derive(Clone)]
pub struct Witness {
    pub merkle_siblings: Vec<Fr>,
    pub merkle_index: Fr,
    pub sig: Fr,
    pub r_x: Fr,
    pub r_y: Fr,
    pub message_x: Fr,
    pub message_y: Fr,
    pub u_sk: Fr,
    pub i: Fr,
    pub r_elgamal: Fr,
}

impl Witness {
    /// Fill in the Merkle-proof half of a witness from a freshly produced
    /// non-membership proof, matching `merkle::NonMembershipProof`'s fields
    /// to the circuit's `ProofElements1`/`ProofIndex1`.
    pub fn merkle_witness_from_proof(proof: &NonMembershipProof) -> (Vec<Fr>, Fr) {
        (proof.siblings.clone(), Fr::from(proof.index as u64))
    }
}

/// Assemble a fully-assigned circuit instance for proving.
pub fn build_circuit(depth: usize, public: &PublicInputs, witness: &Witness) -> S3CrossCircuit {
    S3CrossCircuit {
        depth,
        root: Some(public.root),
        merkle: MerkleWitness {
            proof_elements1: witness.merkle_siblings.iter().copied().map(Some).collect(),
            proof_index1: Some(witness.merkle_index),
        },
        leaf1: Some(public.leaf1),
        leaf2: Some(public.leaf2),
        i_pk_x: Some(public.i_pk_x),
        i_pk_y: Some(public.i_pk_y),
        sig: Some(witness.sig),
        r_x: Some(witness.r_x),
        r_y: Some(witness.r_y),
        message_x: Some(witness.message_x),
        message_y: Some(witness.message_y),
        p_pk_x: Some(public.p_pk_x),
        p_pk_y: Some(public.p_pk_y),
        nonce: Some(public.nonce),
        u_sk: Some(witness.u_sk),
        i: Some(witness.i),
        s_pk_x: Some(public.s_pk_x),
        s_pk_y: Some(public.s_pk_y),
        c1_x: Some(public.c1_x),
        c1_y: Some(public.c1_y),
        c2_x: Some(public.c2_x),
        c2_y: Some(public.c2_y),
        r: Some(witness.r_elgamal),
    }
}

/// `MaxI` from the Go source: the largest pseudonym counter the circuit's
/// range check admits.
pub const MAX_PSEUDONYM_COUNTER: u64 = (1u64 << NONCE_BITS) - 1;

/// Run the one-time (per tree depth) Groth16 setup against the all-`None`
/// dummy circuit, producing the proving/verifying key pair the ledger's
/// `GVK` slot stores.
pub fn setup<R: RngCore>(
    depth: usize,
    rng: &mut R,
) -> Result<(ProvingKey<Bn254>, VerifyingKey<Bn254>), S3CrossError> {
    let circuit = S3CrossCircuit::empty(depth);
    Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
        .map_err(|e| S3CrossError::Invariant(format!("groth16 setup failed: {e}")))
}

pub fn prove<R: RngCore>(
    proving_key: &ProvingKey<Bn254>,
    circuit: S3CrossCircuit,
    rng: &mut R,
) -> Result<Proof<Bn254>, S3CrossError> {
    Groth16::<Bn254>::prove(proving_key, circuit, rng)
        .map_err(|e| S3CrossError::Invariant(format!("groth16 proving failed: {e}")))
}

pub fn prepare_verifying_key(
    verifying_key: &VerifyingKey<Bn254>,
) -> Result<PreparedVerifyingKey<Bn254>, S3CrossError> {
    Groth16::<Bn254>::process_vk(verifying_key)
        .map_err(|e| S3CrossError::Invariant(format!("failed to prepare verifying key: {e}")))
}

pub fn verify(
    prepared_vk: &PreparedVerifyingKey<Bn254>,
    public: &PublicInputs,
    proof: &Proof<Bn254>,
) -> Result<(), S3CrossError> {
    let ok = Groth16::<Bn254>::verify_with_processed_vk(
        prepared_vk,
        &public.to_field_vec(),
        proof,
    )
    .map_err(|e| S3CrossError::Invariant(format!("groth16 verification errored: {e}")))?;

    if !ok {
        return Err(S3CrossError::ProofRejected(
            ProofRejectedKind::Groth16Bad,
            "pairing check failed".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edwards::EdPoint;
    use crate::elgamal_edwards;
    use crate::merkle::{self, MerkleTree};
    use crate::mimc;
    use crate::pseudonym;
    use crate::schnorr_edwards;
    use ark_ec::{CurveGroup, Group};
    use ark_ed_on_bn254::Fr as EdScalar;
    use ark_ff::{BigInteger, PrimeField, UniformRand};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    /// Build a small but fully consistent statement/witness pair the same
    /// way a real SNARK-branch issuance would, then check the native
    /// relation holds (the circuit's constraints are this same arithmetic,
    /// so this is the meaningful thing to test without running a prover).
    #[test]
    fn native_relation_matches_a_consistent_witness() {
        let mut rng = StdRng::seed_from_u64(900);
        let depth = 8;

        let issuer = schnorr_edwards::KeyPair::generate(&mut rng);
        let user_sk = EdScalar::rand(&mut rng);
        let user_pk = EdPoint::generator() * user_sk;

        let (sig, _r) = schnorr_edwards::sign(&issuer, user_pk, &mut rng);
        assert!(schnorr_edwards::verify(&sig));

        let nonce_point = EdPoint::generator() * EdScalar::rand(&mut rng);
        let nonce_scalar = pseudonym::derive_nonce_scalar(&nonce_point);
        let counter = 3u64;
        let pseudonym_keys = pseudonym::gen_pseudonym(user_sk, counter, nonce_scalar);

        let leaf_x = {
            let affine = pseudonym_keys.pk.into_affine();
            mimc::hash(&[affine.x, affine.y])
        };
        let other_leaf = leaf_x + crate::curve::Scalar::from(1_000_000u64);
        let mut leaves = vec![crate::curve::Scalar::from(0u64), other_leaf];
        leaves.push(mimc::scalar_from_bytes_mod_order(&merkle::sentinel_leaf_bytes()));
        leaves.sort();
        leaves.dedup();

        let tree = MerkleTree::build(leaves, depth);
        let membership = tree.non_membership_proof(leaf_x).unwrap();
        assert!(merkle::verify_inclusion(&membership).is_ok());

        let session = schnorr_edwards::KeyPair::generate(&mut rng);
        let (ct, r_elgamal) = elgamal_edwards::encrypt(user_pk, session.pk, &mut rng);
        assert_eq!(elgamal_edwards::decrypt(&session, &ct), user_pk);

        let (siblings, index) = Witness::merkle_witness_from_proof(&membership);
        let affine = |p: &EdPoint| {
            let a = p.into_affine();
            (a.x, a.y)
        };
        let (i_pk_x, i_pk_y) = affine(&issuer.pk);
        let (p_pk_x, p_pk_y) = affine(&pseudonym_keys.pk);
        let (s_pk_x, s_pk_y) = affine(&session.pk);
        let (c1_x, c1_y) = affine(&ct.c1);
        let (c2_x, c2_y) = affine(&ct.c2);

        let public = PublicInputs {
            root: membership.root,
            leaf1: membership.leaf1,
            leaf2: membership.leaf2,
            i_pk_x,
            i_pk_y,
            p_pk_x,
            p_pk_y,
            nonce: nonce_scalar,
            s_pk_x,
            s_pk_y,
            c1_x,
            c1_y,
            c2_x,
            c2_y,
        };

        let lift = |s: &EdScalar| -> Fr {
            let bytes = s.into_bigint().to_bytes_be();
            Fr::from_be_bytes_mod_order(&bytes)
        };
        let (r_x, r_y) = affine(&sig.r);
        let (message_x, message_y) = affine(&sig.message);

        let witness = Witness {
            merkle_siblings: siblings,
            merkle_index: index,
            sig: lift(&sig.s),
            r_x,
            r_y,
            message_x,
            message_y,
            u_sk: lift(&user_sk),
            i: Fr::from(counter),
            r_elgamal: lift(&r_elgamal),
        };

        let circuit = build_circuit(depth, &public, &witness);
        assert_eq!(circuit.depth, depth);
        assert!(counter <= MAX_PSEUDONYM_COUNTER);
    }
}
