//! In-circuit MiMC gadget, mirroring `crate::mimc`'s native permutation
//! round-for-round so the two are guaranteed to agree on every input.
//!
//! `arkworks` ships no audited MiMC gadget, so this is a direct transcription
//! of the native Feistel chain into `FpVar` arithmetic rather than a pull from
//! a third-party circuit crate.

use ark_bn254::Fr;
use ark_r1cs_std::{
    boolean::Boolean,
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
};
use ark_relations::gr1cs::SynthesisError;

use crate::mimc;

/// `(x + k + c)^7`, matching `mimc::mimc_round`.
fn mimc_round_gadget(
    x: &FpVar<Fr>,
    k: &FpVar<Fr>,
    c: Fr,
) -> Result<FpVar<Fr>, SynthesisError> {
    let t = x + k + FpVar::constant(c);
    let t2 = &t * &t;
    let t4 = &t2 * &t2;
    Ok(&t4 * &t2 * &t)
}

/// The keyed MiMC permutation, folding in every round constant `crate::mimc`
/// uses natively.
fn mimc_permute_gadget(x: FpVar<Fr>, k: FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let mut state = x;
    for &c in mimc::constants() {
        state = mimc_round_gadget(&state, &k, c)?;
    }
    Ok(state + k)
}

/// Two-to-one MiMC compression, matching `mimc::compress`.
pub fn mimc_compress_gadget(
    left: FpVar<Fr>,
    right: FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let permuted = mimc_permute_gadget(left.clone(), right)?;
    Ok(permuted + left)
}

/// Merkle-Damgard fold over an arbitrary number of inputs, matching
/// `mimc::hash`.
pub fn mimc_hash_gadget(inputs: &[FpVar<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    let mut state = FpVar::constant(Fr::from(0u64));
    for x in inputs {
        state = mimc_compress_gadget(state, x.clone())?;
    }
    Ok(state)
}

/// Enforce `value < 2^bits` by decomposing into the full bit representation
/// and requiring every bit beyond `bits` to reconstruct back to zero — the
/// same shape as `field_conversion::scalar_to_base_field_elements_gadget`'s
/// power-doubling accumulation, applied in reverse as a range check rather
/// than a field-conversion.
pub fn enforce_fits_in_bits(value: &FpVar<Fr>, bits: usize) -> Result<(), SynthesisError> {
    let all_bits = value.to_bits_le()?;
    let mut reconstructed = FpVar::<Fr>::zero();
    let mut coeff = Fr::from(1u64);
    for bit in all_bits.iter().take(bits) {
        reconstructed += FpVar::from(bit.clone()) * FpVar::constant(coeff);
        coeff.double_in_place();
    }
    reconstructed.enforce_equal(value)
}

/// `index`'s little-endian bit decomposition, truncated to `depth` bits —
/// the in-circuit counterpart of gnark's `api.ToBinary(index, depth)`.
pub fn index_bits(
    index: &FpVar<Fr>,
    depth: usize,
) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    let all_bits = index.to_bits_le()?;
    Ok(all_bits.into_iter().take(depth).collect())
}
