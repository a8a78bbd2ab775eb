use thiserror::Error;

/// Errors surfaced by an [`crate::Interpreter`] run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to create interpreter instance (code {0})")]
    Instance(i32),
    #[error("interpreter returned error code {0}")]
    Failed(i32),
    #[error("argument not representable: {0}")]
    InvalidArg(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
