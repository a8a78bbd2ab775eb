//! Send worker: streams converted artifacts to printers and applies the
//! cleanup policy.

use std::io::ErrorKind;
use std::path::Path;

use gsrelay_queue::{Job, JobQueue};
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{SendError, CONNECT_TIMEOUT, DEQUEUE_WAIT, STREAM_TIMEOUT};

/// Send worker. One instance consumes the send queue; the per-printer
/// fan-out inside a job is parallel, jobs themselves are serial.
pub struct Sender {
    send_queue: JobQueue,
    readonly: bool,
    disposal: bool,
    cancel: CancellationToken,
}

impl Sender {
    pub fn new(
        send_queue: JobQueue,
        readonly: bool,
        disposal: bool,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            send_queue,
            readonly,
            disposal,
            cancel,
        }
    }

    /// Worker loop. Queued sends are dropped on cancellation; no new network
    /// activity is started during shutdown.
    pub async fn run(self) {
        info!(readonly = self.readonly, disposal = self.disposal, "sender started");
        while !self.cancel.is_cancelled() {
            if let Some(job) = self.send_queue.dequeue_timeout(DEQUEUE_WAIT).await {
                self.process_job(job).await;
            }
        }
        info!("sender stopped");
    }

    /// Fan one job out to all of its printers and wait for every attempt.
    /// Returns overall success (the AND of all per-printer outcomes).
    pub async fn process_job(&self, job: Job) -> bool {
        info!(
            job_id = %job.job_id,
            output = %job.output_path.display(),
            printers = job.printers.len(),
            "sender got job"
        );

        let mut attempts = JoinSet::new();
        for printer in job.printers.clone() {
            let file = job.output_path.clone();
            let readonly = self.readonly;
            let job_id = job.job_id;
            attempts.spawn(async move {
                match send_file(&file, &printer, readonly).await {
                    Ok(()) => true,
                    Err(e) => {
                        error!(%job_id, %printer, %e, "failed to send converted file");
                        false
                    }
                }
            });
        }

        let mut all_ok = true;
        while let Some(result) = attempts.join_next().await {
            all_ok &= result.unwrap_or(false);
        }

        if all_ok && self.disposal {
            cleanup(&job).await;
        } else if !all_ok {
            info!(job_id = %job.job_id, "send incomplete, files kept on disk");
        }
        all_ok
    }
}

/// Stream one file to one printer. In readonly mode the send is skipped and
/// reported as success.
async fn send_file(file: &Path, printer: &str, readonly: bool) -> Result<(), SendError> {
    if readonly {
        info!(file = %file.display(), %printer, "READONLY: would send");
        return Ok(());
    }

    if !tokio::fs::try_exists(file).await.unwrap_or(false) {
        return Err(SendError::MissingArtifact(file.to_path_buf()));
    }

    info!(file = %file.display(), %printer, "sending");
    let mut src = tokio::fs::File::open(file).await?;
    let mut sock =
        tokio::time::timeout(CONNECT_TIMEOUT, tokio::net::TcpStream::connect(printer))
            .await
            .map_err(|_| SendError::ConnectTimeout(printer.to_string()))??;

    let sent = tokio::time::timeout(STREAM_TIMEOUT, async {
        let n = tokio::io::copy(&mut src, &mut sock).await?;
        sock.shutdown().await?;
        Ok::<u64, std::io::Error>(n)
    })
    .await
    .map_err(|_| SendError::StreamTimeout(printer.to_string()))??;

    debug!(file = %file.display(), %printer, bytes = sent, "send complete");
    Ok(())
}

/// Delete the converted artifact and the input. Never fails the job: a
/// vanished file is logged at error level, everything else is logged and
/// swallowed.
async fn cleanup(job: &Job) {
    let mut deleted = 0usize;
    for path in [&job.output_path, &job.input_path] {
        match tokio::fs::remove_file(path).await {
            Ok(()) => deleted += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!(job_id = %job.job_id, path = %path.display(), "cleanup: file already gone");
            }
            Err(e) => {
                error!(job_id = %job.job_id, path = %path.display(), %e, "cleanup failed");
            }
        }
    }
    if deleted == 2 {
        info!(
            job_id = %job.job_id,
            output = %job.output_path.display(),
            input = %job.input_path.display(),
            "deleted files after successful send"
        );
    }
}
