//! Conversion and fan-out send workers.
//!
//! Two single-instance workers bridge the pipeline queues: the [`Converter`]
//! drives the Ghostscript interpreter one job at a time (the engine is not
//! reentrant), and the [`Sender`] streams each converted artifact to its
//! printers in parallel before applying the cleanup policy. Both observe a
//! shared cancellation token between dequeues; an in-flight job always runs
//! to completion.

use std::time::Duration;

mod converter;
mod device;
mod error;
mod sender;

pub use converter::{ConvertOutcome, Converter};
pub use device::device_extension;
pub use error::SendError;
pub use sender::Sender;

/// Upper bound on a single blocking dequeue, so workers can observe
/// cancellation between attempts.
pub const DEQUEUE_WAIT: Duration = Duration::from_secs(1);

/// TCP connect timeout per printer.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for streaming one artifact over one socket.
pub const STREAM_TIMEOUT: Duration = Duration::from_secs(30);
