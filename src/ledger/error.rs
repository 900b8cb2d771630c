//! Ledger-local error kind, folded into [`crate::error::S3CrossError`] at
//! every call site that crosses back out of this module.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no record found for key {0:?}")]
    NotFound(String),

    #[error("malformed stored value for key {0:?}: {1}")]
    Corrupt(String, String),

    #[error("page size must be positive, got {0}")]
    InvalidPageSize(i64),
}

impl From<LedgerError> for crate::error::S3CrossError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound(_) => crate::error::S3CrossError::Storage(e.to_string()),
            LedgerError::Corrupt(_, _) => crate::error::S3CrossError::Decode(e.to_string()),
            LedgerError::InvalidPageSize(_) => crate::error::S3CrossError::Storage(e.to_string()),
        }
    }
}
