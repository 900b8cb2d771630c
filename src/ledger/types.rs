//! Ledger-state value shapes, `spec.md` §6's "Ledger-state schema".
//!
//! `PseudonymRecord` fixes `spec.md` §9 open question 2: `c1` is populated
//! from the proof's actual `C1` encoding, distinct from `public_key`, rather
//! than `original_source`'s bug of writing `publicKey` into both fields.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PseudonymRecord {
    #[serde(rename = "publickey")]
    pub public_key: String,
    pub timestamp: i64,
    pub used: bool,
    pub c1: String,
    pub c2: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct PagedPseudonymResult {
    pub records: Vec<PseudonymRecord>,
    pub bookmark: String,
    pub more: bool,
}
