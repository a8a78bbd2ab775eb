//! Error types for the send stage.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single per-printer send attempt failed.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("converted artifact missing: {}", .0.display())]
    MissingArtifact(PathBuf),
    #[error("connect to {0} timed out")]
    ConnectTimeout(String),
    #[error("stream to {0} timed out")]
    StreamTimeout(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
