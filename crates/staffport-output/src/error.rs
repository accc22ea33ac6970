//! Error types for artifact encoding and file output.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while encoding or writing artifacts.
#[derive(Debug, Error)]
pub enum OutputError {
    /// An archive could not be produced. Nothing partial is returned.
    #[error("failed to encode archive: {0}")]
    Encoding(String),

    #[error("failed to encode CSV: {0}")]
    Csv(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// Every overview source was empty.
    #[error("no data available for the field overview")]
    NoOverviewData,

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OutputError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<zip::result::ZipError> for OutputError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<csv::Error> for OutputError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
