//! The job record flowing through the pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One conversion-and-send unit of work.
///
/// Created by the intake once a request is accepted, converted by the
/// converter, dispatched by the sender. The record is never mutated after
/// creation; ownership transfers with each queue hand-off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique per request; appears only in logs.
    pub job_id: Uuid,
    /// Uploaded PDF, under the configured files directory.
    pub input_path: PathBuf,
    /// Where the engine writes the converted artifact.
    pub output_path: PathBuf,
    /// Uppercase tag derived from the device name (`PCL`, `PNG`, `JPG`).
    pub format_label: String,
    /// Argv tail handed to the engine. The input path is last,
    /// `-sOutputFile=` immediately before it, `-sDEVICE=` before that.
    pub gs_args: Vec<String>,
    /// `host:port` targets; empty for convert-only jobs.
    pub printers: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Job {
    pub fn new(
        input_path: PathBuf,
        output_path: PathBuf,
        format_label: impl Into<String>,
        gs_args: Vec<String>,
        printers: Vec<String>,
    ) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            input_path,
            output_path,
            format_label: format_label.into(),
            gs_args,
            printers,
            created_at: chrono::Utc::now(),
        }
    }

    /// True when no printer was requested and the job ends at conversion.
    #[inline]
    pub fn is_convert_only(&self) -> bool {
        self.printers.is_empty()
    }
}
