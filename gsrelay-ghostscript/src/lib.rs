//! Ghostscript interpreter seam.
//!
//! The pipeline drives the engine through the [`Interpreter`] trait only.
//! With the `ghostscript` feature enabled the factory returns the native
//! `gsapi` binding; otherwise it returns an in-process stub that imitates a
//! conversion by copying the input file to the `-sOutputFile=` path. The
//! stub keeps the whole pipeline exercisable on machines without a
//! Ghostscript install, and dependent crates test against it directly.

use std::sync::Arc;

mod error;
#[cfg(feature = "ghostscript")]
mod native;
mod stub;

pub use error::EngineError;
pub use stub::StubInterpreter;

/// One conversion run of the engine.
///
/// `args` is the job's argv tail; implementations prepend the empty
/// `argv[0]` placeholder themselves. The call blocks until the engine
/// returns and is not cancellable mid-run.
pub trait Interpreter: Send + Sync {
    fn run(&self, args: &[String]) -> Result<(), EngineError>;
}

/// Build the interpreter for this binary: native when the `ghostscript`
/// feature is on, the stub otherwise.
pub fn create_interpreter() -> Arc<dyn Interpreter> {
    #[cfg(feature = "ghostscript")]
    {
        Arc::new(native::GhostscriptInterpreter::new())
    }

    #[cfg(not(feature = "ghostscript"))]
    {
        Arc::new(StubInterpreter::default())
    }
}
