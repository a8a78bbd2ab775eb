//! Error types for the pipeline queues.

use thiserror::Error;

/// Errors that may occur while interacting with a pipeline queue.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue is at capacity")]
    Full,
}
