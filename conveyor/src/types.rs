//! Common types used throughout the conveyor pipeline.

use serde::Serialize;

use crate::processors::Processor;

/// Value carried through the bounded queue.
///
/// Items have no identity beyond their value; duplicates are expected and
/// meaningful, and the order of production and consumption matters.
pub type Item = u32;

/// Identifier of a consumer within a pipeline, assigned at spawn time.
pub type ReaderId = u64;

/// Identifier of a pipeline instance.
pub type PipelineId = u64;

/// Final accounting of a single pipeline run.
///
/// Produced once after all workers have been joined. A non-zero
/// [`RunSummary::residual`] is a valid end state: it simply reflects how many
/// items were still sitting in the queue when the run was cancelled.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Total number of items the producer enqueued.
    pub produced: u64,
    /// Per-consumer accounting, in reader id order.
    pub consumers: Vec<ConsumerRunSummary>,
    /// Items left in the queue after all workers exited.
    pub residual: usize,
}

impl RunSummary {
    /// Total number of items consumed across all consumers.
    pub fn consumed(&self) -> u64 {
        self.consumers.iter().map(|c| c.consumed).sum()
    }
}

/// Accounting for a single consumer within a [`RunSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct ConsumerRunSummary {
    /// Identifier of the consumer.
    pub reader_id: ReaderId,
    /// Processing policy the consumer was running.
    pub processor: Processor,
    /// Number of items this consumer dequeued (its history length).
    pub consumed: u64,
}
