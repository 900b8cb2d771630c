//! Ledger verifier adapter, `spec.md` §4.10: a thin wrapper around a
//! process-wide key/value store that decodes a proof, re-validates it
//! against the currently stored parameters, and persists an accepted
//! pseudonym record. Not a chaincode framework — the `ctx.GetStub()`
//! `PutState`/`GetState`/`GetStateByRangeWithPagination` calls of
//! `original_source`'s two Fabric contracts collapse into
//! [`store::MemoryLedgerStore`].
//!
//! `now` is threaded through explicitly rather than read from the wall
//! clock, keeping `is_pseudonym_valid` and `create_pseudonym_*` pure
//! functions of their arguments (`spec.md` §5's "verifier side is
//! deterministic").

pub mod error;
pub mod query;
pub mod store;
pub mod types;

use ark_bn254::{Bn254, Fr as Scalar};
use ark_groth16::{Proof, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::edwards::EdPoint;
use crate::error::S3CrossError;
use crate::group_sig::GroupParams;
use crate::gs_verifier::{self, S3CrossProof};
use crate::params::{GpWire, PpWire, RangeProofBits};
use crate::pedersen::PedersenParams;
use crate::serde_support::{canonical_deserialize_base64, canonical_serialize_base64};
use crate::snark_verifier::{self, PublicInputs};
use error::LedgerError;
use store::MemoryLedgerStore;
use types::{PagedPseudonymResult, PseudonymRecord};

const LOG_TARGET: &str = "s3cross::ledger";

const KEY_PP: &str = "PP";
const KEY_GP: &str = "GP";
const KEY_IPK: &str = "IPK";
const KEY_SPK: &str = "SPK";
const KEY_ROOT: &str = "ROOT";
const KEY_GVK: &str = "GVK";

pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn psu_key(point_b64: &str) -> String {
    format!("PSU_{point_b64}")
}

/// Encode any `CanonicalSerialize` value (curve point or field element) into
/// the base64 string used both as wire encoding and as the `PSU_` lookup
/// key suffix.
fn encode_b64<T: CanonicalSerialize>(value: &T) -> Result<String, S3CrossError> {
    canonical_serialize_base64(value).map_err(S3CrossError::Decode)
}

fn decode_b64<T: CanonicalDeserialize>(s: &str) -> Result<T, S3CrossError> {
    canonical_deserialize_base64(s).map_err(S3CrossError::Decode)
}

#[derive(Clone, Default)]
pub struct Ledger {
    store: MemoryLedgerStore,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- GS branch parameter lifecycle ---------------------------------

    #[tracing::instrument(target = LOG_TARGET, skip_all)]
    pub fn init_ledger_gs(&self, pp: &PedersenParams, gp: &GroupParams) -> Result<(), S3CrossError> {
        self.update_pp(pp)?;
        self.update_gp(gp)?;
        Ok(())
    }

    pub fn update_pp(&self, pp: &PedersenParams) -> Result<(), S3CrossError> {
        let wire = PpWire::from(pp);
        let json = serde_json::to_vec(&wire).map_err(|e| S3CrossError::Decode(e.to_string()))?;
        self.store.put(KEY_PP, json);
        Ok(())
    }

    pub fn update_gp(&self, gp: &GroupParams) -> Result<(), S3CrossError> {
        let wire = GpWire::from(gp);
        let json = serde_json::to_vec(&wire).map_err(|e| S3CrossError::Decode(e.to_string()))?;
        self.store.put(KEY_GP, json);
        Ok(())
    }

    fn load_pp(&self) -> Result<PedersenParams, S3CrossError> {
        let bytes = self
            .store
            .get(KEY_PP)
            .ok_or_else(|| LedgerError::NotFound(KEY_PP.to_string()))?;
        let wire: PpWire =
            serde_json::from_slice(&bytes).map_err(|e| S3CrossError::Decode(e.to_string()))?;
        Ok(PedersenParams::from(&wire))
    }

    fn load_gp(&self) -> Result<GroupParams, S3CrossError> {
        let bytes = self
            .store
            .get(KEY_GP)
            .ok_or_else(|| LedgerError::NotFound(KEY_GP.to_string()))?;
        let wire: GpWire =
            serde_json::from_slice(&bytes).map_err(|e| S3CrossError::Decode(e.to_string()))?;
        Ok(GroupParams::from(&wire))
    }

    /// `CreatePseudonym` for the GS branch: decode, verify against the
    /// currently stored `PP`/`GP`, then persist a record keyed by
    /// `base64(C1)` — `C1` is the proof's pseudonym public key.
    #[tracing::instrument(target = LOG_TARGET, skip_all, fields(bits = bits.0))]
    pub fn create_pseudonym_gs(
        &self,
        proof: &S3CrossProof,
        nonce: Scalar,
        bits: RangeProofBits,
        now: i64,
    ) -> Result<PseudonymRecord, S3CrossError> {
        let pp = self.load_pp()?;
        let gp = self.load_gp()?;

        gs_verifier::verify_pseudonym(proof, &pp, &gp, nonce, bits)?;

        let public_key = encode_b64(&proof.c1)?;
        let c1 = public_key.clone();
        let c2 = encode_b64(&proof.c2)?;

        let record = PseudonymRecord {
            public_key: public_key.clone(),
            timestamp: now,
            used: false,
            c1,
            c2,
        };
        let json =
            serde_json::to_vec(&record).map_err(|e| S3CrossError::Decode(e.to_string()))?;
        self.store.put(&psu_key(&public_key), json);
        tracing::info!(target: LOG_TARGET, %public_key, "gs pseudonym admitted");
        Ok(record)
    }

    // ---- SNARK branch parameter lifecycle -------------------------------

    #[tracing::instrument(target = LOG_TARGET, skip_all)]
    pub fn init_ledger_snark(
        &self,
        ipk: &EdPoint,
        spk: &EdPoint,
        root: Scalar,
        vk: &VerifyingKey<Bn254>,
    ) -> Result<(), S3CrossError> {
        self.store.put(KEY_IPK, encode_b64(ipk)?.into_bytes());
        self.store.put(KEY_SPK, encode_b64(spk)?.into_bytes());
        self.store.put(KEY_ROOT, encode_b64(&root)?.into_bytes());
        self.update_gvk(vk)?;
        Ok(())
    }

    pub fn update_gvk(&self, vk: &VerifyingKey<Bn254>) -> Result<(), S3CrossError> {
        self.store.put(KEY_GVK, encode_b64(vk)?.into_bytes());
        Ok(())
    }

    fn load_gvk(&self) -> Result<VerifyingKey<Bn254>, S3CrossError> {
        let bytes = self
            .store
            .get(KEY_GVK)
            .ok_or_else(|| LedgerError::NotFound(KEY_GVK.to_string()))?;
        let s = String::from_utf8(bytes).map_err(|e| S3CrossError::Decode(e.to_string()))?;
        decode_b64(&s)
    }

    fn load_stored_point_b64(&self, key: &str) -> Result<String, S3CrossError> {
        let bytes = self
            .store
            .get(key)
            .ok_or_else(|| LedgerError::NotFound(key.to_string()))?;
        String::from_utf8(bytes).map_err(|e| S3CrossError::Decode(e.to_string()))
    }

    /// `CreatePseudonym` for the SNARK branch: verify the Groth16 proof
    /// against the stored verifying key, cross-check `iPk`/`sPk`/`root`
    /// against the ledger's own copies (defense-in-depth against witness
    /// substitution, `spec.md` §4.10), then persist a record keyed by
    /// `base64(pPk)`.
    #[tracing::instrument(target = LOG_TARGET, skip_all)]
    pub fn create_pseudonym_snark(
        &self,
        proof: &Proof<Bn254>,
        public: &PublicInputs,
        now: i64,
    ) -> Result<PseudonymRecord, S3CrossError> {
        let vk = self.load_gvk()?;
        let pvk = snark_verifier::prepare_verifying_key(&vk)?;
        snark_verifier::verify(&pvk, public, proof)?;

        let ipk_point = edwards_affine_b64(public.i_pk_x, public.i_pk_y)?;
        if ipk_point != self.load_stored_point_b64(KEY_IPK)? {
            return Err(S3CrossError::ParamsMismatch("iPk does not match".into()));
        }
        let spk_point = edwards_affine_b64(public.s_pk_x, public.s_pk_y)?;
        if spk_point != self.load_stored_point_b64(KEY_SPK)? {
            return Err(S3CrossError::ParamsMismatch("sPk does not match".into()));
        }
        let root_b64 = encode_b64(&public.root)?;
        if root_b64 != self.load_stored_point_b64(KEY_ROOT)? {
            return Err(S3CrossError::ParamsMismatch("root does not match".into()));
        }

        let public_key = edwards_affine_b64(public.p_pk_x, public.p_pk_y)?;
        let c1 = edwards_affine_b64(public.c1_x, public.c1_y)?;
        let c2 = edwards_affine_b64(public.c2_x, public.c2_y)?;

        let record = PseudonymRecord {
            public_key: public_key.clone(),
            timestamp: now,
            used: false,
            c1,
            c2,
        };
        let json =
            serde_json::to_vec(&record).map_err(|e| S3CrossError::Decode(e.to_string()))?;
        self.store.put(&psu_key(&public_key), json);
        tracing::info!(target: LOG_TARGET, %public_key, "snark pseudonym admitted");
        Ok(record)
    }

    // ---- Shared query surface -------------------------------------------

    pub fn query_pseudonym_by_pbk(&self, pbk: &str) -> Result<PseudonymRecord, S3CrossError> {
        let bytes = self
            .store
            .get(&psu_key(pbk))
            .ok_or_else(|| LedgerError::NotFound(psu_key(pbk)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| S3CrossError::Decode(e.to_string()))
    }

    /// `IsPseudonymValid`: `!used ∧ now − timestamp < 7200`.
    pub const EXPIRY_SECONDS: i64 = 7200;

    pub fn is_pseudonym_valid(&self, pbk: &str, now: i64) -> Result<bool, S3CrossError> {
        let record = self.query_pseudonym_by_pbk(pbk)?;
        Ok(!record.used && now - record.timestamp < Self::EXPIRY_SECONDS)
    }

    pub fn get_all_pseudonyms_paged(
        &self,
        page_size: i64,
        bookmark: &str,
    ) -> Result<PagedPseudonymResult, S3CrossError> {
        query::get_all_pseudonyms_paged(&self.store, page_size, bookmark).map_err(Into::into)
    }
}

/// Encode an Edwards-on-BN254 affine point given as separate `(x, y)`
/// coordinates the same way the circuit's public witness carries them, for
/// comparison against a ledger-stored point encoding.
fn edwards_affine_b64(x: Scalar, y: Scalar) -> Result<String, S3CrossError> {
    use ark_ec::AffineRepr;
    let point = <EdPoint as ark_ec::CurveGroup>::Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(S3CrossError::Invariant(
            "public witness point is not a valid Edwards point".into(),
        ));
    }
    encode_b64(&point)
}
