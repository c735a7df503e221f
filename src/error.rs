//! Error types for pharmacy_sync

use std::path::PathBuf;

/// Unified error type for sheet loading, sorting and synchronization
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Named column is not present in the header row
    #[error("Column '{column}' not found (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },
    /// File could not be opened, read or written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Malformed delimited text
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Input file has no header row
    #[error("Table in {} has no header row", .path.display())]
    EmptyTable { path: PathBuf },
    /// Schema configuration file could not be parsed
    #[error("Schema error: {0}")]
    Schema(#[from] serde_json::Error),
}

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for pharmacy_sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
