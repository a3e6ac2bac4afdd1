use thiserror::Error;

use crate::validator::ValidationError;

/// Errors raised by the chart-of-accounts repository.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A required parameter is missing or empty. Checked before any I/O.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A business rule rejected the record; nothing was written for it.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The key-value store reported a failure on get or put.
    #[error("Storage error: {0}")]
    Storage(#[source] anyhow::Error),

    /// A stored collection could not be decoded, or a collection could not be encoded.
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The parent chain of an account loops back on itself.
    #[error("Corrupt hierarchy: parent chain of account {account_id} does not terminate")]
    CorruptHierarchy { account_id: String },
}

impl LedgerError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        LedgerError::InvalidArgument(msg.into())
    }

    /// True for errors the caller can fix by correcting input and retrying.
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
