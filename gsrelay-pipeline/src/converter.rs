//! Conversion worker: drives the Ghostscript interpreter over the convert
//! queue and forwards finished jobs to the send queue.

use std::sync::Arc;
use std::time::Duration;

use gsrelay_ghostscript::Interpreter;
use gsrelay_queue::{Job, JobQueue};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::DEQUEUE_WAIT;

/// What became of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// Converted and handed to the send queue.
    Forwarded,
    /// Converted; no printers were requested, job ends here.
    ConvertOnly,
    /// Conversion failed or the job was dropped; input file is retained.
    Failed,
}

/// Single-instance conversion worker.
///
/// The engine is not reentrant, so exactly one converter runs per process
/// and jobs are converted strictly in enqueue order.
pub struct Converter {
    convert_queue: JobQueue,
    send_queue: JobQueue,
    interpreter: Arc<dyn Interpreter>,
    cancel: CancellationToken,
    drain_on_shutdown: bool,
}

impl Converter {
    pub fn new(
        convert_queue: JobQueue,
        send_queue: JobQueue,
        interpreter: Arc<dyn Interpreter>,
        cancel: CancellationToken,
        drain_on_shutdown: bool,
    ) -> Self {
        Self {
            convert_queue,
            send_queue,
            interpreter,
            cancel,
            drain_on_shutdown,
        }
    }

    /// Worker loop. Exits after cancellation, once the convert queue is
    /// drained when the drain policy is set.
    pub async fn run(self) {
        info!("converter started");
        loop {
            if self.cancel.is_cancelled() {
                if self.drain_on_shutdown {
                    while let Some(job) = self.convert_queue.dequeue_timeout(Duration::ZERO).await
                    {
                        self.process_job(job).await;
                    }
                }
                break;
            }
            if let Some(job) = self.convert_queue.dequeue_timeout(DEQUEUE_WAIT).await {
                self.process_job(job).await;
            }
        }
        info!("converter stopped");
    }

    /// Convert one job. Never lets a failure escape the iteration.
    pub async fn process_job(&self, job: Job) -> ConvertOutcome {
        let started = std::time::Instant::now();
        info!(
            job_id = %job.job_id,
            input = %job.input_path.display(),
            output = %job.output_path.display(),
            format = %job.format_label,
            "converting"
        );

        let interpreter = Arc::clone(&self.interpreter);
        let args = job.gs_args.clone();
        // The engine call blocks and is not cancellable; keep it off the
        // async workers.
        let result = tokio::task::spawn_blocking(move || interpreter.run(&args)).await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(job_id = %job.job_id, %e, "conversion failed, input file retained");
                return ConvertOutcome::Failed;
            }
            Err(e) => {
                error!(job_id = %job.job_id, %e, "conversion task aborted");
                return ConvertOutcome::Failed;
            }
        }

        // A successful run must have produced a non-empty artifact.
        match tokio::fs::metadata(&job.output_path).await {
            Ok(meta) if meta.len() > 0 => {}
            _ => {
                error!(
                    job_id = %job.job_id,
                    output = %job.output_path.display(),
                    "engine reported success but produced no artifact"
                );
                return ConvertOutcome::Failed;
            }
        }

        info!(
            job_id = %job.job_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "conversion complete"
        );

        if job.is_convert_only() {
            info!(job_id = %job.job_id, "conversion only, no printers requested");
            return ConvertOutcome::ConvertOnly;
        }

        let job_id = job.job_id;
        if let Err(e) = self.send_queue.try_enqueue(job).await {
            // Overflow here means the sender stopped keeping up entirely.
            warn!(job_id = %job_id, %e, "send queue overflow, dropping converted job");
            return ConvertOutcome::Failed;
        }
        ConvertOutcome::Forwarded
    }
}
