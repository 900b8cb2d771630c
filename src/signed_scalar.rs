//! Signed, arbitrary-precision integer wrapper for the group signature's
//! `sS` response.
//!
//! Every other Σ-protocol response in the data model lives in `F_r` and is
//! serialized as big-endian unsigned bytes. `sS` is the one exception: the
//! reference implementation computes it over the unreduced integers
//! (`sS = nS + c * s` with `s = -(r2 * r3)`, none of `nS, c, s` ever reduced
//! mod `r`), and the sign is load-bearing for wire compatibility (`spec.md`
//! §6, §9). `ark_ff::Fr` cannot represent a negative value, so `SignedScalar`
//! carries the honest signed integer and only reduces into `F_r` at the
//! point of algebraic use, per the design note.

use std::fmt;
use std::str::FromStr;

use ark_ff::PrimeField;
use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::curve::Scalar;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedScalar(BigInt);

impl SignedScalar {
    pub fn from_scalar(value: &Scalar) -> Self {
        let bytes = value.into_bigint().to_bytes_be();
        Self(BigInt::from_bytes_be(Sign::Plus, &bytes))
    }

    pub fn zero() -> Self {
        Self(BigInt::from(0))
    }

    pub fn neg(&self) -> Self {
        Self(-&self.0)
    }

    pub fn add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self(&self.0 * &other.0)
    }

    /// Reduce into `F_r`, the sole point in the codebase where `sS` is
    /// treated as a field element rather than a signed integer.
    pub fn reduce_mod_r(&self) -> Scalar {
        let (sign, magnitude) = self.0.to_bytes_be();
        let reduced = Scalar::from_be_bytes_mod_order(&magnitude);
        match sign {
            Sign::Minus => -reduced,
            _ => reduced,
        }
    }

    pub fn to_decimal_string(&self) -> String {
        self.0.to_str_radix(10)
    }

    pub fn from_decimal_string(s: &str) -> Result<Self, num_bigint::ParseBigIntError> {
        BigInt::from_str(s).map(Self)
    }
}

impl fmt::Display for SignedScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

impl Serialize for SignedScalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for SignedScalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_decimal_string(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_decimal_string() {
        let a = SignedScalar::from_scalar(&Scalar::from(12345u64)).neg();
        let s = a.to_decimal_string();
        let b = SignedScalar::from_decimal_string(&s).unwrap();
        assert_eq!(a, b);
        assert_eq!(s, "-12345");
    }

    #[test]
    fn reduce_mod_r_matches_negation_in_field() {
        let five = Scalar::from(5u64);
        let signed_five = SignedScalar::from_scalar(&five);
        let neg_five = signed_five.neg();
        assert_eq!(neg_five.reduce_mod_r(), -five);
    }

    #[test]
    fn large_products_round_trip() {
        let a = SignedScalar::from_scalar(&Scalar::from(u64::MAX)).neg();
        let b = SignedScalar::from_scalar(&Scalar::from(u64::MAX));
        let product = a.mul(&b);
        let s = product.to_decimal_string();
        assert_eq!(SignedScalar::from_decimal_string(&s).unwrap(), product);
    }
}
