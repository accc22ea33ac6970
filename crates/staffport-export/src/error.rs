//! Error types for export planning.

use thiserror::Error;

/// Errors raised while preparing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Column delimiter is unusable.
    #[error("invalid column delimiter {0:?}: must be a single non-quote character")]
    InvalidDelimiter(String),

    /// No fields were selected for a run that needs them.
    #[error("no fields selected")]
    NoFieldsSelected,
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
