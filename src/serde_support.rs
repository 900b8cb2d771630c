//! Serde helpers for encoding curve/field types as base64 strings, per the
//! wire envelope of `spec.md` §6. Adapted from the teacher's
//! `crypto_serde::curve` module (same `CanonicalSerialize`/
//! `CanonicalDeserialize` plumbing), swapped from hex to base64 encoding —
//! grounded in `logannye-tinyzkp` and `eigerco-zcash-namada-airdrop`, which
//! both favor base64 for point/proof wire encodings.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn canonical_serialize_base64<T: CanonicalSerialize>(value: &T) -> Result<String, String> {
    let mut bytes = Vec::new();
    value
        .serialize_compressed(&mut bytes)
        .map_err(|e| e.to_string())?;
    Ok(BASE64.encode(bytes))
}

pub fn canonical_deserialize_base64<T: CanonicalDeserialize>(s: &str) -> Result<T, String> {
    let bytes = BASE64.decode(s).map_err(|e| e.to_string())?;
    T::deserialize_compressed(&bytes[..]).map_err(|e| e.to_string())
}

/// Serde module for any `CanonicalSerialize + CanonicalDeserialize` type
/// (curve points in affine or projective form, field elements) encoded as a
/// single base64 string. Use via `#[serde(with = "serde_support::canonical")]`.
pub mod canonical {
    use super::*;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: CanonicalSerialize,
        S: Serializer,
    {
        let encoded = canonical_serialize_base64(value).map_err(SerError::custom)?;
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: CanonicalDeserialize,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        canonical_deserialize_base64(&s).map_err(DeError::custom)
    }
}

/// Same as `canonical`, but for a `Vec<T>` encoded as a JSON array of base64
/// strings (used for the Borromean ring's per-bit component vectors).
pub mod canonical_vec {
    use super::*;

    pub fn serialize<T, S>(value: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        T: CanonicalSerialize,
        S: Serializer,
    {
        let encoded: Vec<String> = value
            .iter()
            .map(canonical_serialize_base64)
            .collect::<Result<_, _>>()
            .map_err(SerError::custom)?;
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: CanonicalDeserialize,
        D: Deserializer<'de>,
    {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|s| canonical_deserialize_base64(s))
            .collect::<Result<_, _>>()
            .map_err(DeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{random_scalar, Scalar};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn scalar_round_trips_through_base64() {
        let mut rng = StdRng::seed_from_u64(1);
        let s: Scalar = random_scalar(&mut rng);
        let encoded = canonical_serialize_base64(&s).unwrap();
        let decoded: Scalar = canonical_deserialize_base64(&encoded).unwrap();
        assert_eq!(s, decoded);
    }
}
