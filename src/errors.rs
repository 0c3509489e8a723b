// src/errors.rs

use std::path::PathBuf;

/// Top-level error type for quadtrack operations.
#[derive(Debug, thiserror::Error)]
pub enum QuadtrackError {
    #[error("input video not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to open {role} '{path}': {message}")]
    Open {
        role: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("malformed event data: {message}")]
    Data { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}

pub type QuadtrackResult<T> = Result<T, QuadtrackError>;

impl QuadtrackError {
    pub fn open(role: &'static str, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Open {
            role,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::Data {
            message: message.into(),
        }
    }
}
