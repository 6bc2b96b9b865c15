//! Cooperative shutdown signaling for pipeline workers.
//!
//! Wraps a tokio watch channel into a monotonic boolean flag: once set, it
//! stays set for the remainder of the run. Every blocking wait in the system
//! uses the receiver side as its escape clause, so a single trigger unblocks
//! all parked workers simultaneously.

use tokio::sync::watch;

/// Transmitter side of the shutdown channel.
///
/// Cloneable so that multiple cancellation sources (OS signal handler, run
/// timeout, manual call) can share the same flag. Triggering is idempotent.
#[derive(Debug, Clone)]
pub struct ShutdownTx(watch::Sender<bool>);

impl ShutdownTx {
    /// Sets the shutdown flag and wakes all waiters.
    ///
    /// Returns `true` only for the call that performed the false-to-true
    /// transition; concurrent or repeated calls return `false` and have no
    /// further effect. This lets the caller fire transition-scoped hooks
    /// exactly once even with multiple cancellation sources racing.
    pub fn shutdown(&self) -> bool {
        self.0.send_if_modified(|shutdown| {
            if *shutdown {
                return false;
            }

            *shutdown = true;

            true
        })
    }

    /// Creates a new receiver subscription.
    ///
    /// Receivers subscribed after the flag was set still observe it as set.
    pub fn subscribe(&self) -> ShutdownRx {
        ShutdownRx(self.0.subscribe())
    }
}

/// Receiver side of the shutdown channel.
#[derive(Debug, Clone)]
pub struct ShutdownRx(watch::Receiver<bool>);

impl ShutdownRx {
    /// Non-blocking check of the shutdown flag.
    pub fn is_shutdown(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once the shutdown flag is set.
    ///
    /// Level-triggered: resolves immediately if the flag is already set. A
    /// dropped transmitter also resolves the future, so no waiter is ever
    /// left permanently parked; callers that need to distinguish the two
    /// cases re-check [`ShutdownRx::is_shutdown`] afterwards.
    pub async fn signaled(&mut self) {
        while !*self.0.borrow_and_update() {
            if self.0.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Creates a new shutdown channel in the not-shut-down state.
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTx(tx), ShutdownRx(rx))
}

/// Outcome of an operation that can be abandoned by a shutdown signal.
///
/// A `Shutdown` outcome is a normal early-exit path, not an error: the
/// abandoned operation performed no mutation and the caller's loop simply
/// terminates.
#[derive(Debug, PartialEq, Eq)]
pub enum ShutdownResult<T, S> {
    /// The operation completed before shutdown was observed.
    Ok(T),
    /// The operation was abandoned because shutdown was signaled, carrying
    /// whatever partial state the caller needs to hand back.
    Shutdown(S),
}
