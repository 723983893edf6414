//! Main event loop
//!
//! Multiplexes change notifications, watcher errors and the shutdown
//! signal. Notifications re-arm the debouncer; nothing here waits on a
//! running command.

use crate::debounce::Debouncer;
use crate::source::NotificationStreams;
use std::future::Future;
use tracing::{info, warn};

/// Why the loop returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit {
    /// A termination signal arrived
    Signal(String),
    /// The notification source went away
    StreamClosed,
}

/// Run until `shutdown` resolves or the streams close
///
/// `shutdown` resolves to the name of the received signal. Watcher errors
/// are logged and otherwise ignored. A pending trigger is left as is when
/// the loop returns.
pub async fn run_event_loop<F>(
    streams: &mut NotificationStreams,
    debouncer: &Debouncer,
    verbose: bool,
    shutdown: F,
) -> LoopExit
where
    F: Future<Output = String>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = streams.events.recv() => {
                let Some(event) = event else {
                    info!("Notification stream closed");
                    return LoopExit::StreamClosed;
                };

                if verbose {
                    info!("Event: {} on {}", event.kind, event.path.display());
                }
                debouncer.arm();
            }

            error = streams.errors.recv() => {
                let Some(error) = error else {
                    info!("Notification stream closed");
                    return LoopExit::StreamClosed;
                };
                warn!("Watcher error: {}", error);
            }

            signal = &mut shutdown => {
                info!("Received signal {}, shutting down...", signal);
                return LoopExit::Signal(signal);
            }
        }
    }
}
