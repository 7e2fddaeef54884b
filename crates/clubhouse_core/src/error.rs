//! Error types for clubhouse_core

use thiserror::Error;

/// Errors raised by record operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A field name that is not part of the record's key set
    #[error("unknown field `{field}`")]
    UnknownField { field: String },
}

/// Result type for clubhouse_core operations
pub type Result<T> = std::result::Result<T, CoreError>;
