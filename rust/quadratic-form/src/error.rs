//! Errors for the quadratic-form experiments.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("checkpoint {path:?} was built with max_n={stored}, requested max_n={requested}")]
    BoundMismatch {
        path: PathBuf,
        stored: u64,
        requested: u64,
    },

    #[error("Failed to (de)serialize checkpoint: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FormError>;
