//! SNARK-branch pseudonym derivation, `§4.9` item 2 of the spec.
//!
//! Ported from `original_source/PMS/zkSNARKs/S3CrossMiMC/pseudonym.go` and
//! `s3cross.go`'s `NewPseudonym`/`GenNonMemProof`. The per-session nonce that
//! feeds `GenPsu` is not the circuit's raw public `nonce` field — it is
//! `MiMC(nonce_point.x ‖ nonce_point.y)` derived from an Edwards curve point,
//! keeping the two-step shape the source uses (`spec.md` §9's resolution of
//! the nonce-freshness open question for this branch).

use crate::edwards::{base_to_ed_scalar, EdPoint, EdScalar};
use crate::merkle::{self, MerkleTree, NonMembershipProof};
use crate::mimc;
use crate::schnorr_edwards::KeyPair;

/// `MiMC(nonce_point.x ‖ nonce_point.y)`, the scalar actually consumed by
/// [`gen_pseudonym`].
pub fn derive_nonce_scalar(nonce_point: &EdPoint) -> crate::curve::Scalar {
    use ark_ec::CurveGroup;
    let affine = nonce_point.into_affine();
    mimc::hash(&[affine.x, affine.y])
}

/// `GenPsu(sk, i, nonce)`: `pSk = (uSk + MiMC(nonce ‖ I))^{-1}`, `pPk = pSk*B`.
pub fn gen_pseudonym(
    user_sk: EdScalar,
    counter: u64,
    nonce_scalar: crate::curve::Scalar,
) -> KeyPair {
    let i_base = crate::curve::Scalar::from(counter);
    let h = mimc::hash(&[nonce_scalar, i_base]);

    let user_sk_base = {
        // Lift the Edwards scalar back into the base field (= BN254 Fr) to
        // combine it with the MiMC digest, mirroring the source's shared
        // `fr.Element` representation for both quantities.
        use ark_ff::{BigInteger, PrimeField};
        let bytes = user_sk.into_bigint().to_bytes_be();
        crate::curve::Scalar::from_be_bytes_mod_order(&bytes)
    };

    let p_sk_base = user_sk_base + h;
    let p_sk = base_to_ed_scalar(&p_sk_base)
        .inverse()
        .expect("pseudonym secret is invertible except with negligible probability");

    KeyPair::from_secret(p_sk)
}

/// `GenNonMemProof`: hash the pseudonym public key to `x = MiMC(pk.x ‖
/// pk.y)` and produce its non-membership witness against the current leaf
/// set.
pub fn gen_non_membership_proof(
    pseudonym_pk: &EdPoint,
    leaves: Vec<crate::curve::Scalar>,
) -> Result<NonMembershipProof, merkle::error::MerkleError> {
    use ark_ec::CurveGroup;
    let affine = pseudonym_pk.into_affine();
    let x = mimc::hash(&[affine.x, affine.y]);

    let mut sorted = leaves;
    sorted.sort();
    sorted.dedup();

    let tree = MerkleTree::build(sorted, merkle::DEFAULT_TREE_DEPTH);
    tree.non_membership_proof(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::Group;
    use ark_ff::UniformRand;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn derive_nonce_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(600);
        let nonce_point = EdPoint::generator() * EdScalar::rand(&mut rng);
        assert_eq!(
            derive_nonce_scalar(&nonce_point),
            derive_nonce_scalar(&nonce_point)
        );
    }

    #[test]
    fn distinct_counters_yield_distinct_pseudonyms() {
        let mut rng = StdRng::seed_from_u64(601);
        let user_sk = EdScalar::rand(&mut rng);
        let nonce_point = EdPoint::generator() * EdScalar::rand(&mut rng);
        let nonce_scalar = derive_nonce_scalar(&nonce_point);

        let p1 = gen_pseudonym(user_sk, 1, nonce_scalar);
        let p2 = gen_pseudonym(user_sk, 2, nonce_scalar);
        assert_ne!(p1.pk, p2.pk);
    }
}
