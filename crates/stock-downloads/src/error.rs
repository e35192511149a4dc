//! Save error types

use thiserror::Error;

/// Error code reported when the caller supplied missing or unusable input.
pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
/// Error code reported for every failure past argument validation.
pub const SAVE_ERROR: &str = "SAVE_ERROR";

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Failed to create file in Downloads")]
    CreateFailed,

    #[error("Failed to open output stream for entry {0}")]
    WriterUnavailable(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Storage(#[from] stock_storage::StorageError),
}

impl SaveError {
    pub fn code(&self) -> &'static str {
        match self {
            SaveError::InvalidArgument(_) => INVALID_ARGUMENT,
            _ => SAVE_ERROR,
        }
    }
}
