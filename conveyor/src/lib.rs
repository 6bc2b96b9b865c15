//! Bounded-buffer coordination between a single producer and multiple
//! independent consumers.
//!
//! One producer feeds a fixed-capacity FIFO queue while several consumers
//! drain it concurrently, each running its own streaming reduction over the
//! items it happened to dequeue. Backpressure blocks the producer on a full
//! queue and consumers on an empty one; a cooperative shutdown signal
//! unblocks everybody and the run ends with a summary that accounts for
//! every item ever enqueued.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod macros;
pub mod observer;
pub mod pipeline;
pub mod processors;
pub mod types;
pub mod workers;
