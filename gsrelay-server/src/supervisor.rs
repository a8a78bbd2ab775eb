//! Service lifecycle: queue creation, worker startup order, graceful
//! shutdown and join.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use gsrelay_pipeline::{Converter, Sender};
use gsrelay_queue::JobQueue;
use gsrelay_server::build_router;
use gsrelay_server::state::AppState;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run the service until a termination signal arrives.
///
/// Startup order: queues, sender, converter, HTTP server. On SIGINT/SIGTERM
/// the HTTP server stops accepting connections, the workers are cancelled
/// (the converter drains its queue when the policy says so, the sender drops
/// its queue), and both are joined before returning.
pub async fn run(config: gsrelay_config::Config) -> anyhow::Result<()> {
    let files_dir = PathBuf::from(&config.files.directory);
    tokio::fs::create_dir_all(&files_dir)
        .await
        .with_context(|| format!("failed to create files directory {}", files_dir.display()))?;

    let convert_queue = JobQueue::with_capacity(config.queue.capacity);
    let send_queue = JobQueue::with_capacity(config.queue.capacity);
    let cancel = CancellationToken::new();

    let sender = Sender::new(
        send_queue.clone(),
        config.sender.readonly,
        config.sender.disposal,
        cancel.clone(),
    );
    let sender_handle = tokio::spawn(sender.run());

    let converter = Converter::new(
        convert_queue.clone(),
        send_queue,
        gsrelay_ghostscript::create_interpreter(),
        cancel.clone(),
        config.shutdown.drain_conversions,
    );
    let converter_handle = tokio::spawn(converter.run());

    let state = Arc::new(AppState::new(
        convert_queue,
        files_dir,
        config.service.name.clone(),
    ));
    let app = build_router(state);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, service = %config.service.name, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("termination requested, stopping workers");
    cancel.cancel();
    let _ = converter_handle.await;
    let _ = sender_handle.await;

    info!(service = %config.service.name, "service terminated");
    Ok(())
}

/// Resolve on SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
