//! BN254 group/field type aliases and small arithmetic helpers shared by
//! both the GS branch (pairing) and the SNARK branch (arithmetization
//! field only).

use ark_bn254::{Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{CurveGroup, Group};
use ark_ff::{BigInteger, PrimeField, UniformRand};
use ark_serialize::CanonicalSerialize;
use ark_std::rand::Rng;

/// Scalar field of BN254, `F_r`. MiMC and every Pedersen/Σ-protocol response
/// live here.
pub type Scalar = Fr;

/// G1 point, additive projective representation.
pub type G1 = G1Projective;
/// G2 point, additive projective representation.
pub type G2 = G2Projective;

/// Sample a uniform random scalar.
pub fn random_scalar<R: Rng + ?Sized>(rng: &mut R) -> Scalar {
    Scalar::rand(rng)
}

/// Sample a uniform random G1 point by scalar-multiplying the generator by a
/// random scalar, mirroring `getRandomG1`/`getRandomG1Affine` in the
/// reference implementation.
pub fn random_g1<R: Rng + ?Sized>(rng: &mut R) -> G1 {
    G1::generator() * random_scalar(rng)
}

/// Compressed-point byte encoding, used both for wire serialization and as
/// the input to Fiat-Shamir hashing (matching `bn254.G1Affine.Marshal()`).
pub fn g1_to_bytes(point: &G1) -> Vec<u8> {
    let affine = point.into_affine();
    let mut bytes = Vec::new();
    affine
        .serialize_compressed(&mut bytes)
        .expect("G1 point serialization is infallible for valid curve points");
    bytes
}

/// Compressed-point byte encoding for G2.
pub fn g2_to_bytes(point: &G2) -> Vec<u8> {
    let affine = point.into_affine();
    let mut bytes = Vec::new();
    affine
        .serialize_compressed(&mut bytes)
        .expect("G2 point serialization is infallible for valid curve points");
    bytes
}

/// Big-endian, minimal-length unsigned encoding of a scalar, per the wire
/// format of `spec.md` §6.
pub fn scalar_to_be_bytes(scalar: &Scalar) -> Vec<u8> {
    scalar.into_bigint().to_bytes_be()
}

/// Interpret a SHA-256 digest as an unsigned big-endian integer reduced mod
/// `r`, the convention used at every algebraic use site of a Fiat-Shamir
/// challenge in the GS branch (the challenge itself is kept as an unbounded
/// integer on the wire; reduction happens only here).
pub fn scalar_from_digest(digest: &[u8]) -> Scalar {
    Scalar::from_be_bytes_mod_order(digest)
}

pub(crate) type G1Aff = G1Affine;
pub(crate) type G2Aff = G2Affine;
