//! Bounded FIFO queue shared between the producer and all consumers.
//!
//! The queue is the sole synchronization boundary for data flow: the
//! producer suspends on a full queue (backpressure) and consumers suspend on
//! an empty one. Both waits race against the shutdown signal so that a
//! cancelled run never leaves a worker parked.

use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};

use crate::concurrency::shutdown::{ShutdownResult, ShutdownRx};
use crate::types::Item;

/// Fixed-capacity FIFO queue with blocking backpressure in both directions.
///
/// All access to the underlying buffer happens under a single mutex; the two
/// [`Notify`] instances play the role of the "not full" and "not empty"
/// condition variables. Wakeups are hints only: the guarded condition is
/// re-tested under the lock after every wake, so spurious or broadcast
/// wakeups are harmless. Waiters register (and enable) their [`Notify`]
/// interest *before* testing the condition, so a notification can never
/// slip into the gap between the condition check and the wait.
#[derive(Debug)]
pub struct BoundedQueue {
    items: Mutex<VecDeque<Item>>,
    capacity: usize,
    /// Signaled after each dequeue; parks producers waiting for room.
    not_full: Notify,
    /// Signaled after each enqueue; parks consumers waiting for items.
    not_empty: Notify,
}

impl BoundedQueue {
    /// Creates an empty queue with the given capacity.
    ///
    /// The capacity must be at least 1; [`crate::config::PipelineConfig`]
    /// validation enforces this before a queue is ever built.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            not_full: Notify::new(),
            not_empty: Notify::new(),
        }
    }

    /// Appends an item, suspending the caller while the queue is full.
    ///
    /// Returns the queue length right after the insert, or
    /// [`ShutdownResult::Shutdown`] if the shutdown signal was observed
    /// before the item could be inserted. A shutdown outcome performs no
    /// mutation: the item is dropped, never half-inserted.
    pub async fn enqueue(
        &self,
        item: Item,
        shutdown_rx: &mut ShutdownRx,
    ) -> ShutdownResult<usize, ()> {
        loop {
            if shutdown_rx.is_shutdown() {
                return ShutdownResult::Shutdown(());
            }

            // The waiter must be registered before the condition is tested:
            // [`Notify::notify_one`] stores at most one permit when nobody
            // is registered, so a wakeup landing between the lock release
            // and the wait would otherwise be collapsed and lost.
            let not_full = self.not_full.notified();
            tokio::pin!(not_full);
            not_full.as_mut().enable();

            {
                let mut items = self.items.lock().await;
                if items.len() < self.capacity {
                    items.push_back(item);
                    let len = items.len();

                    // Wake one parked consumer.
                    self.not_empty.notify_one();

                    return ShutdownResult::Ok(len);
                }
            }

            tokio::select! {
                _ = not_full => {}
                _ = shutdown_rx.signaled() => {
                    return ShutdownResult::Shutdown(());
                }
            }
        }
    }

    /// Removes and returns the head item, suspending the caller while the
    /// queue is empty.
    ///
    /// Returns [`ShutdownResult::Shutdown`] only when the shutdown signal is
    /// set *and* the queue is empty: residual items remain dequeueable after
    /// shutdown so the caller decides how much to drain.
    pub async fn dequeue(&self, shutdown_rx: &mut ShutdownRx) -> ShutdownResult<Item, ()> {
        loop {
            // Registered and enabled before the emptiness check, for the
            // same reason as in `enqueue`.
            let not_empty = self.not_empty.notified();
            tokio::pin!(not_empty);
            not_empty.as_mut().enable();

            {
                let mut items = self.items.lock().await;
                if let Some(item) = items.pop_front() {
                    // Wake one parked producer now that there is room.
                    self.not_full.notify_one();

                    return ShutdownResult::Ok(item);
                }
            }

            if shutdown_rx.is_shutdown() {
                return ShutdownResult::Shutdown(());
            }

            tokio::select! {
                _ = not_empty => {}
                _ = shutdown_rx.signaled() => {
                    return ShutdownResult::Shutdown(());
                }
            }
        }
    }

    /// Current number of queued items.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    /// Whether the queue currently holds no items.
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Maximum number of items the queue can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
