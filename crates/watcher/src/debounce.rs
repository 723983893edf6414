//! Trailing-edge debouncing
//!
//! One pending trigger at most. Every [`Debouncer::arm`] replaces the
//! pending trigger with a fresh one a full delay away; the action runs
//! once the delay passes without another arm.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Quiet period before a burst of notifications dispatches
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(100);

/// Callback run when a trigger fires
pub type Action = Arc<dyn Fn() + Send + Sync>;

/// The outstanding delayed dispatch
struct PendingTrigger {
    fire_at: Instant,
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct TriggerState {
    pending: Option<PendingTrigger>,
    /// Bumped on every arm and cancel; a timer only commits if its
    /// generation is still current when it takes the lock.
    generation: u64,
}

/// Single-slot debouncer
///
/// The trigger state is shared between the caller and the timer task and
/// guarded by one lock. The lock covers "stop old, install new" and the
/// timer's commit check, never the action itself.
pub struct Debouncer {
    delay: Duration,
    state: Arc<Mutex<TriggerState>>,
    action: Action,
}

impl Debouncer {
    /// Create a debouncer running `action` after `delay` of quiet
    pub fn new(delay: Duration, action: Action) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(TriggerState::default())),
            action,
        }
    }

    /// Cancel any pending trigger and arm a new one a full delay from now
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&self) {
        let mut state = self.state.lock();

        if let Some(old) = state.pending.take() {
            old.timer.abort();
        }
        state.generation += 1;

        let generation = state.generation;
        let fire_at = Instant::now() + self.delay;
        let shared = Arc::clone(&self.state);
        let action = Arc::clone(&self.action);

        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(fire_at).await;

            let committed = {
                let mut state = shared.lock();
                let current = state
                    .pending
                    .as_ref()
                    .is_some_and(|p| p.generation == generation);
                if current {
                    state.pending = None;
                }
                current
            };

            if committed {
                action();
            }
        });

        state.pending = Some(PendingTrigger {
            fire_at,
            generation,
            timer,
        });
    }

    /// Drop the pending trigger, if any
    ///
    /// Returns true if a trigger was pending. A trigger that already
    /// committed is not affected.
    pub fn cancel_if_pending(&self) -> bool {
        let mut state = self.state.lock();
        state.generation += 1;
        match state.pending.take() {
            Some(old) => {
                old.timer.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    /// When the pending trigger is scheduled to fire
    pub fn deadline(&self) -> Option<Instant> {
        self.state.lock().pending.as_ref().map(|p| p.fire_at)
    }
}
