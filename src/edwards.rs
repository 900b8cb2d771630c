//! Edwards-on-BN254 type aliases and the base-to-scalar field conversion
//! needed by the in-circuit-friendly primitives (`L2b` Schnorr, `L2c`
//! ElGamal).
//!
//! `ark-ed-on-bn254`'s *base* field is, by construction, exactly BN254's
//! scalar field `F_r` — the whole point of the curve choice, so MiMC (which
//! only operates over `F_r`) can hash Edwards point coordinates directly.
//! The Edwards curve's own *scalar* field (the order of its prime-order
//! subgroup) is a different, smaller prime, so a MiMC-derived challenge must
//! be reduced into it before use in `s = r + c*sk`. Native counterpart of the
//! teacher's `field_conversion::base_to_scalar` circuit gadget, which does
//! the analogous reduction inside an R1CS.

use ark_ff::{BigInteger, PrimeField};

pub use ark_ed_on_bn254::{EdwardsProjective as EdPoint, Fr as EdScalar};

use crate::curve::Scalar as BaseScalar;

/// Reduce a BN254 `F_r` element (an Edwards point's base-field coordinate,
/// or a MiMC digest) into the Edwards curve's own scalar field.
pub fn base_to_ed_scalar(x: &BaseScalar) -> EdScalar {
    let bytes = x.into_bigint().to_bytes_be();
    EdScalar::from_be_bytes_mod_order(&bytes)
}
