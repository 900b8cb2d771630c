//! BBS-SE group signature with strong exculpability, `L1c` of the GS
//! construction.
//!
//! Ported from `original_source/PMS/GS/S3Cross/ugs.go`. The manager issues
//! blinded credentials `A` to users; a user signs a message `M` together with
//! an ElGamal-encrypted tracing tag `p` under a Σ-protocol proof of knowledge
//! that ties the signature to a valid, un-revoked credential without
//! revealing which one.

pub mod error;

use ark_bn254::{Bn254, Fr as Scalar, G1Projective as G1, G2Projective as G2};
use ark_ec::pairing::Pairing;
use ark_ec::Group;
use ark_ff::Zero;
use ark_std::rand::RngCore;
use zeroize::Zeroize;

use crate::curve::random_scalar;
use crate::signed_scalar::SignedScalar;
use crate::transcript::Transcript;
use error::GroupSigError;

const LOG_TARGET: &str = "s3cross::group_sig";
const DOMAIN: &str = "s3cross/v1/gs";

/// The group's public parameters, shared by every member and the verifier.
/// Rotated in place by [`GroupParams::rotate`] on revocation.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupParams {
    pub g1: G1,
    pub g2: G2,
    pub pk: G1,
    pub w: G2,
    pub h: G1,
    pub h0: G1,
}

/// The manager's secrets, never written to the ledger (see `spec.md` §9's
/// first design note — this split is the hard module boundary it asks for).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct ManagerSecrets {
    pub gamma: Scalar,
    pub sk: Scalar,
}

pub struct Manager {
    pub secrets: ManagerSecrets,
    pub params: GroupParams,
}

impl Manager {
    /// `Keygen`: sample `γ, sk`, derive `w = γ·g2`, `pk = sk·h`.
    pub fn keygen<R: RngCore + ?Sized>(g1: G1, g2: G2, h: G1, h0: G1, rng: &mut R) -> Self {
        let gamma = random_scalar(rng);
        let sk = random_scalar(rng);
        let w = g2 * gamma;
        let pk = h * sk;
        Self {
            secrets: ManagerSecrets { gamma, sk },
            params: GroupParams {
                g1,
                g2,
                pk,
                w,
                h,
                h0,
            },
        }
    }

    /// `UserEnroll`: the user has already contributed `y0 = -y*h0`; the
    /// manager samples `x` and returns the credential `A = (g1+Y0)/(γ+x)`.
    pub fn enroll<R: RngCore + ?Sized>(
        &self,
        y0: G1,
        rng: &mut R,
    ) -> Result<(Scalar, G1), GroupSigError> {
        let x = random_scalar(rng);
        let denom = (self.secrets.gamma + x)
            .inverse()
            .ok_or(GroupSigError::RevokedKeyInvalid)?;
        let a = (self.params.g1 + y0) * denom;
        Ok((x, a))
    }

    /// `RevokeGen`: publish `(Ai, hi, Ai_) = ((γ+xi)^-1 * (g1, h0, g2))`.
    pub fn revoke_gen(&self, xi: Scalar) -> Result<RevokedKey, GroupSigError> {
        let denom = (self.secrets.gamma + xi)
            .inverse()
            .ok_or(GroupSigError::RevokedKeyInvalid)?;
        Ok(RevokedKey {
            xi,
            ai: self.params.g1 * denom,
            hi: self.params.h0 * denom,
            ai_bar: self.params.g2 * denom,
        })
    }

    /// `Open`: recover `-y*h` from a signature, identifying the signer by
    /// their registered `Y = -y*h`.
    pub fn open(&self, sig: &GroupSignature) -> G1 {
        sig.c2 - sig.c1 * self.secrets.sk
    }
}

#[derive(Clone, Debug)]
pub struct RevokedKey {
    pub xi: Scalar,
    pub ai: G1,
    pub hi: G1,
    pub ai_bar: G2,
}

impl GroupParams {
    /// Rotate the group parameters on revocation of `rk`.
    pub fn rotate(&self, rk: &RevokedKey) -> Self {
        let w = rk.ai_bar + rk.ai_bar * (-rk.xi);
        Self {
            g1: rk.ai,
            g2: rk.ai_bar,
            pk: self.pk,
            w,
            h: self.h,
            h0: rk.hi,
        }
    }
}

/// A user's key material: `(x, y, A)` plus the group parameters it was
/// issued under.
#[derive(Clone)]
pub struct UserKey {
    pub x: Scalar,
    pub y: Scalar,
    pub a: G1,
    pub params: GroupParams,
}

impl UserKey {
    /// `UserKeyVerify`: `e(A, w + x*g2) = e(g1 - y*h0, g2)`.
    #[tracing::instrument(target = LOG_TARGET, skip_all)]
    pub fn verify(&self) -> Result<(), GroupSigError> {
        let p0_right = self.params.w + self.params.g2 * self.x;
        let p1_left = self.params.g1 - self.params.h0 * self.y;
        let lhs = Bn254::pairing(self.a, p0_right);
        let rhs = Bn254::pairing(p1_left, self.params.g2);
        if lhs != rhs {
            return Err(GroupSigError::UserKeyInvalid);
        }
        Ok(())
    }

    /// `RevokeExe`: rotate this user's own credential in response to the
    /// revocation of another member's key `xi`. Rejects if `xi == x` (the
    /// user themselves being revoked cannot "survive" their own revocation).
    pub fn revoke_exe(&mut self, rk: &RevokedKey) -> Result<(), GroupSigError> {
        let denom = (self.x - rk.xi)
            .inverse()
            .ok_or(GroupSigError::RevokedKeyInvalid)?;
        let new_a = (rk.ai + rk.hi * (-self.y)) * denom - self.a * denom;
        self.params = self.params.rotate(rk);
        self.a = new_a;
        Ok(())
    }

    /// `GroupSign(M, p)`: produce a group signature over message `M ∈ G1`
    /// with ElGamal-encrypted tracing tag `p` (the pseudonym secret, in the
    /// S3Cross composition).
    #[tracing::instrument(target = LOG_TARGET, skip_all)]
    pub fn sign<R: RngCore + ?Sized>(
        &self,
        m: G1,
        p: Scalar,
        rng: &mut R,
    ) -> Result<GroupSignature, GroupSigError> {
        let r1 = random_scalar(rng);
        let r2 = random_scalar(rng);
        let r3 = r1.inverse().ok_or(GroupSigError::RevokedKeyInvalid)?;
        let s = SignedScalar::from_scalar(&r2)
            .mul(&SignedScalar::from_scalar(&r3))
            .neg();

        let c1 = self.params.h * p;
        let c2 = self.params.h * (-self.y) + self.params.pk * p;

        let a1 = self.a * r1;
        let ind = (self.params.g1 + self.params.h0 * (-self.y)) * r1;
        let a_bar = a1 * (-self.x) + ind;
        let d = ind - self.params.h0 * r2;

        let n_x = random_scalar(rng);
        let n_y = random_scalar(rng);
        let n_r = random_scalar(rng);
        let n_r2 = random_scalar(rng);
        let n_r3 = random_scalar(rng);
        let n_s = random_scalar(rng);

        let e1 = a1 * (-n_x) + self.params.h0 * n_r2;
        let e2 = d * n_r3 + self.params.h0 * n_y - self.params.h0 * n_s;
        let e3 = self.params.h * n_r;
        let e4 = self.params.h * (-n_y) + self.params.pk * n_r;

        let mut t = Transcript::new(DOMAIN);
        t.append_g1(&m)
            .append_g1(&self.params.g1)
            .append_g2(&self.params.g2)
            .append_g1(&self.params.pk)
            .append_g2(&self.params.w)
            .append_g1(&self.params.h)
            .append_g1(&self.params.h0)
            .append_g1(&c1)
            .append_g1(&c2)
            .append_g1(&a1)
            .append_g1(&a_bar)
            .append_g1(&d)
            .append_g1(&e1)
            .append_g1(&e2)
            .append_g1(&e3)
            .append_g1(&e4);
        let c = t.challenge_scalar();

        let s_x = n_x + c * self.x;
        let s_y = n_y + c * self.y;
        let s_r = n_r + c * p;
        let s_r2 = n_r2 + c * r2;
        let s_r3 = n_r3 + c * r3;
        let s_s = SignedScalar::from_scalar(&n_s).add(&s.mul(&SignedScalar::from_scalar(&c)));

        Ok(GroupSignature {
            m,
            c1,
            c2,
            a1,
            a_bar,
            d,
            c,
            s_x,
            s_y,
            s_r,
            s_r2,
            s_r3,
            s_s,
        })
    }
}

/// A full group signature: the ElGamal ciphertext, the randomized
/// credential, and the Σ-protocol's challenge/response pairs.
#[derive(Clone, Debug)]
pub struct GroupSignature {
    pub m: G1,
    pub c1: G1,
    pub c2: G1,
    pub a1: G1,
    pub a_bar: G1,
    pub d: G1,
    pub c: Scalar,
    pub s_x: Scalar,
    pub s_y: Scalar,
    pub s_r: Scalar,
    pub s_r2: Scalar,
    pub s_r3: Scalar,
    pub s_s: SignedScalar,
}

/// `GroupVerify`: reject if `A1 = O`, check the pairing equation, recompute
/// the SoK challenge, and accept iff it matches `gs.c`.
#[tracing::instrument(target = LOG_TARGET, skip_all)]
pub fn verify(sig: &GroupSignature, params: &GroupParams) -> Result<(), GroupSigError> {
    if sig.a1.is_zero() {
        return Err(GroupSigError::IdentityA1);
    }

    let lhs = Bn254::pairing(sig.a1, params.w);
    let rhs = Bn254::pairing(sig.a_bar, params.g2);
    if lhs != rhs {
        return Err(GroupSigError::PairingCheckFailed);
    }

    let s_s_mod_r = sig.s_s.reduce_mod_r();

    let e1 = sig.a1 * (-sig.s_x) + params.h0 * sig.s_r2 - (sig.a_bar - sig.d) * sig.c;
    let e2 =
        sig.d * sig.s_r3 + params.h0 * sig.s_y - params.h0 * s_s_mod_r - params.g1 * sig.c;
    let e3 = params.h * sig.s_r - sig.c1 * sig.c;
    let e4 = params.h * (-sig.s_y) + params.pk * sig.s_r - sig.c2 * sig.c;

    let mut t = Transcript::new(DOMAIN);
    t.append_g1(&sig.m)
        .append_g1(&params.g1)
        .append_g2(&params.g2)
        .append_g1(&params.pk)
        .append_g2(&params.w)
        .append_g1(&params.h)
        .append_g1(&params.h0)
        .append_g1(&sig.c1)
        .append_g1(&sig.c2)
        .append_g1(&sig.a1)
        .append_g1(&sig.a_bar)
        .append_g1(&sig.d)
        .append_g1(&e1)
        .append_g1(&e2)
        .append_g1(&e3)
        .append_g1(&e4);
    let c_recomputed = t.challenge_scalar();

    if c_recomputed != sig.c {
        return Err(GroupSigError::SokVerificationFailed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn test_group() -> (Manager, Scalar, Scalar) {
        let mut rng = StdRng::seed_from_u64(100);
        let g1 = G1::generator();
        let g2 = G2::generator();
        let h = G1::generator() * random_scalar(&mut rng);
        let h0 = G1::generator() * random_scalar(&mut rng);
        let manager = Manager::keygen(g1, g2, h, h0, &mut rng);
        let y = random_scalar(&mut rng);
        (manager, y, Scalar::from(0u64))
    }

    fn enroll(manager: &Manager, y: Scalar, rng: &mut StdRng) -> UserKey {
        let y0 = manager.params.h0 * (-y);
        let (x, a) = manager.enroll(y0, rng).unwrap();
        UserKey {
            x,
            y,
            a,
            params: manager.params.clone(),
        }
    }

    #[test]
    fn user_key_verifies() {
        let (manager, y, _) = test_group();
        let mut rng = StdRng::seed_from_u64(101);
        let usk = enroll(&manager, y, &mut rng);
        assert!(usk.verify().is_ok());
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let (manager, y, _) = test_group();
        let mut rng = StdRng::seed_from_u64(102);
        let usk = enroll(&manager, y, &mut rng);
        let m = G1::generator() * random_scalar(&mut rng);
        let p = random_scalar(&mut rng);
        let sig = usk.sign(m, p, &mut rng).unwrap();
        assert!(verify(&sig, &usk.params).is_ok());
    }

    #[test]
    fn bit_flip_in_s_r3_is_rejected() {
        let (manager, y, _) = test_group();
        let mut rng = StdRng::seed_from_u64(103);
        let usk = enroll(&manager, y, &mut rng);
        let m = G1::generator() * random_scalar(&mut rng);
        let p = random_scalar(&mut rng);
        let mut sig = usk.sign(m, p, &mut rng).unwrap();
        sig.s_r3 += Scalar::from(1u64);
        assert!(verify(&sig, &usk.params).is_err());
    }

    #[test]
    fn open_recovers_negative_y_h() {
        let (manager, y, _) = test_group();
        let mut rng = StdRng::seed_from_u64(104);
        let usk = enroll(&manager, y, &mut rng);
        let m = G1::generator() * random_scalar(&mut rng);
        let p = random_scalar(&mut rng);
        let sig = usk.sign(m, p, &mut rng).unwrap();
        let opened = manager.open(&sig);
        assert_eq!(opened, manager.params.h * (-y));
    }

    #[test]
    fn revocation_of_another_member_preserves_this_users_key() {
        let (manager, y, _) = test_group();
        let mut rng = StdRng::seed_from_u64(105);
        let mut usk = enroll(&manager, y, &mut rng);
        let y_other = random_scalar(&mut rng);
        let other = enroll(&manager, y_other, &mut rng);

        let rk = manager.revoke_gen(other.x).unwrap();
        usk.revoke_exe(&rk).unwrap();
        assert!(usk.verify().is_ok());
    }

    #[test]
    fn revoking_oneself_errors() {
        let (manager, y, _) = test_group();
        let mut rng = StdRng::seed_from_u64(106);
        let mut usk = enroll(&manager, y, &mut rng);
        let rk = manager.revoke_gen(usk.x).unwrap();
        assert!(usk.revoke_exe(&rk).is_err());
    }
}
