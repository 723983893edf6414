//! Termination signal handling

use anyhow::{Context, Result};

/// Wait for SIGINT or SIGTERM and return the signal's name
///
/// Handlers are installed before this returns, so signals arriving between
/// setup and the first poll are not lost.
#[cfg(unix)]
pub fn shutdown_signal() -> Result<impl std::future::Future<Output = String>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let mut terminate = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => "interrupt".to_string(),
            _ = terminate.recv() => "terminated".to_string(),
        }
    })
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> Result<impl std::future::Future<Output = String>> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "interrupt".to_string(),
            Err(e) => {
                tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<String>().await
            }
        }
    })
}
