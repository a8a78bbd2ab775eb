use std::path::PathBuf;

use gsrelay_queue::JobQueue;

/// Shared application state passed to the intake handler.
#[derive(Clone)]
pub struct AppState {
    /// Enqueue side of the convert queue.
    pub convert_queue: JobQueue,
    /// Workspace for uploaded inputs and converted outputs.
    pub files_dir: PathBuf,
    /// Log prefix only.
    pub service_name: String,
}

impl AppState {
    pub fn new(convert_queue: JobQueue, files_dir: PathBuf, service_name: impl Into<String>) -> Self {
        Self {
            convert_queue,
            files_dir,
            service_name: service_name.into(),
        }
    }
}
