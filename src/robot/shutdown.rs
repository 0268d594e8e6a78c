//! # OS stop requests for the robot loop.
//!
//! [`stop_requested`] completes when the process is asked to terminate:
//! `SIGINT`, `SIGTERM` or `SIGQUIT` on unix, Ctrl-C elsewhere. With signal
//! handling turned off it never completes, so the loop is stopped by its
//! `CancellationToken` only (tests, embedding in a larger program).

use std::future;

use crate::error::RuntimeError;

/// Resolves with the name of the received signal.
pub(crate) async fn stop_requested(enabled: bool) -> Result<&'static str, RuntimeError> {
    if !enabled {
        return future::pending().await;
    }
    let name = recv_any().await?;
    tracing::info!(signal = name, "stop requested by OS signal");
    Ok(name)
}

#[cfg(unix)]
async fn recv_any() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut int = signal(SignalKind::interrupt())?;
    let mut term = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    Ok(tokio::select! {
        _ = int.recv() => "SIGINT",
        _ = term.recv() => "SIGTERM",
        _ = quit.recv() => "SIGQUIT",
    })
}

#[cfg(not(unix))]
async fn recv_any() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
