//! Error taxonomy for store operations.
//!
//! Structural errors (bad input, unknown id) are caller-fault and surfaced
//! immediately. I/O failures are fatal to the operation that hit them and are
//! never swallowed. Per-record corruption during bulk scans is handled as a
//! logged soft-miss inside [`crate::store`], not as an error variant.

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Required metadata is missing or invalid on `store()`.
    #[error("invalid metadata: {0}")]
    Validation(String),

    /// No record exists for the given id.
    #[error("content id not found: {0}")]
    NotFound(String),

    /// Filesystem failure while reading or writing a record.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
