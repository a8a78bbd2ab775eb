//! Job record and bounded pipeline queues.
//!
//! The pipeline moves [`Job`] values through two [`JobQueue`]s: the intake
//! pushes onto the convert queue, the converter forwards finished jobs onto
//! the send queue, and the sender retires them. A job moves by value; whoever
//! pops it owns it.
//!
//! Queues are bounded. Enqueue never blocks (a full queue is reported to the
//! caller), and dequeue waits at most a caller-supplied duration so worker
//! loops can observe cancellation between attempts.

mod error;
mod queue;
mod types;

pub use error::QueueError;
pub use queue::JobQueue;
pub use types::Job;
