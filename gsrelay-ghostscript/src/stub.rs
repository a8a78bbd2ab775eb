//! In-process test double for the Ghostscript engine.

use std::fs;

use tracing::debug;

use crate::{EngineError, Interpreter};

/// Imitates a conversion by copying the input file to the `-sOutputFile=`
/// path. Fails like the real engine when the input does not exist or the
/// control arguments are missing.
#[derive(Debug, Default)]
pub struct StubInterpreter;

impl Interpreter for StubInterpreter {
    fn run(&self, args: &[String]) -> Result<(), EngineError> {
        let output = args
            .iter()
            .rev()
            .find_map(|a| a.strip_prefix("-sOutputFile="))
            .ok_or_else(|| EngineError::InvalidArg("missing -sOutputFile=".into()))?;
        let input = args
            .last()
            .filter(|a| !a.starts_with('-'))
            .ok_or_else(|| EngineError::InvalidArg("missing trailing input path".into()))?;

        let bytes = fs::read(input)?;
        fs::write(output, &bytes)?;
        debug!(%input, %output, size = bytes.len(), "stub conversion complete");
        Ok(())
    }
}
