use thiserror::Error;

use crate::storage::StorageError;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Track cannot be ingested: empty, or a point is missing its timestamp.
    #[error("Malformed track: {0}")]
    MalformedTrack(String),

    #[error("GPX parsing error: {0}")]
    GpxParsing(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The remote run repository rejected or failed an operation.
    #[error("Repository error: {0}")]
    Repository(String),
}
