//! Single-value Pedersen commitment over BN254 G1, `L1a` of the GS
//! construction.
//!
//! Adapted from the teacher's `pedersen_commitment::native::pedersen_commit_scalars`
//! (same bases-and-fold shape) but specialized to a single scalar value
//! rather than a generic `N`-ary vector commitment, and to the base order
//! confirmed in `original_source`: the *value* is blinded by `H`, the
//! *randomness* by `G` — i.e. `Commit(x, r) = x*H + r*G`, not the more usual
//! `r*H + x*G`.

use ark_ec::Group;
use ark_std::rand::RngCore;

use crate::curve::{random_scalar, Scalar, G1};

const LOG_TARGET: &str = "s3cross::pedersen";

/// The two independent generators `(G, H)` of a Pedersen commitment scheme.
/// Nothing-up-my-sleeve generation is out of scope here (see `spec.md`
/// Non-goals); callers supply generators from trusted parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PedersenParams {
    pub g: G1,
    pub h: G1,
}

impl PedersenParams {
    pub fn new(g: G1, h: G1) -> Self {
        Self { g, h }
    }

    /// Deterministic test-only parameters derived from the group generator.
    #[cfg(test)]
    pub fn test_params() -> Self {
        Self {
            g: G1::generator(),
            h: G1::generator() * Scalar::from(7919u64),
        }
    }
}

/// `Commit(x, r) = x*H + r*G`.
#[tracing::instrument(target = LOG_TARGET, skip_all)]
pub fn commit(params: &PedersenParams, value: Scalar, randomness: Scalar) -> G1 {
    params.h * value + params.g * randomness
}

/// Commit to `value` with a freshly sampled blinding factor, returning both
/// the commitment and the randomness so the caller can later open it.
pub fn commit_fresh<R: RngCore + ?Sized>(
    params: &PedersenParams,
    value: Scalar,
    rng: &mut R,
) -> (G1, Scalar) {
    let r = random_scalar(rng);
    (commit(params, value, r), r)
}

/// Verify that `commitment` opens to `(value, randomness)`.
pub fn verify_opening(
    params: &PedersenParams,
    commitment: &G1,
    value: Scalar,
    randomness: Scalar,
) -> bool {
    commit(params, value, randomness) == *commitment
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn commit_and_verify_roundtrip() {
        let params = PedersenParams::test_params();
        let mut rng = StdRng::seed_from_u64(3);
        let value = random_scalar(&mut rng);
        let (c, r) = commit_fresh(&params, value, &mut rng);
        assert!(verify_opening(&params, &c, value, r));
    }

    #[test]
    fn wrong_value_fails_verification() {
        let params = PedersenParams::test_params();
        let mut rng = StdRng::seed_from_u64(4);
        let value = random_scalar(&mut rng);
        let (c, r) = commit_fresh(&params, value, &mut rng);
        let wrong = value + Scalar::from(1u64);
        assert!(!verify_opening(&params, &c, wrong, r));
    }

    #[test]
    fn commitment_is_additively_homomorphic() {
        let params = PedersenParams::test_params();
        let mut rng = StdRng::seed_from_u64(5);
        let (v1, r1) = (random_scalar(&mut rng), random_scalar(&mut rng));
        let (v2, r2) = (random_scalar(&mut rng), random_scalar(&mut rng));
        let c1 = commit(&params, v1, r1);
        let c2 = commit(&params, v2, r2);
        let sum = commit(&params, v1 + v2, r1 + r2);
        assert_eq!(c1 + c2, sum);
    }
}
