//! Concurrency primitives for coordinating pipeline workers.
//!
//! Two pieces of cross-cutting shared state exist in a run, and both live
//! here:
//!
//! - The [`queue`] module holds the bounded FIFO that mediates all data flow
//!   between the producer and the consumers, blocking the producer when full
//!   (backpressure) and consumers when empty.
//! - The [`shutdown`] module implements the monotonic shutdown flag that
//!   every blocking wait observes as its escape clause, so that a single
//!   cancellation unblocks all parked workers at once.
//!
//! Both are designed around the classic wait-recheck discipline: a wakeup is
//! only a hint, and the guarded condition is always re-tested under the lock
//! before acting on it.

pub mod queue;
pub mod shutdown;
