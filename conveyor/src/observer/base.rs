use crate::processors::Report;
use crate::types::{Item, ReaderId, RunSummary};

/// Hooks through which the pipeline core reports run events.
///
/// Implementations must be cheap and non-blocking: every hook is invoked
/// inline from a worker loop, between the queue operation that triggered it
/// and the worker's next wait point. Serialization of any console or log
/// output is the implementation's concern; [`tracing`] already provides it
/// for the logging implementation.
///
/// All hooks default to no-ops so implementations only override what they
/// care about.
pub trait RunObserver: Send + Sync + 'static {
    /// Fired after each successful enqueue, with the queue length right
    /// after the insert.
    fn on_produced(&self, value: Item, queue_len: usize) {
        let _ = (value, queue_len);
    }

    /// Fired after each successful dequeue, before processing.
    fn on_consumed(&self, reader_id: ReaderId, value: Item) {
        let _ = (reader_id, value);
    }

    /// Fired after a processor produced a report for a consumption event.
    fn on_processed(&self, reader_id: ReaderId, report: &Report) {
        let _ = (reader_id, report);
    }

    /// Fired exactly once, when the shutdown signal transitions to set.
    ///
    /// Not fired for runs that are never cancelled.
    fn on_cancelled(&self) {}

    /// Fired exactly once, after all workers have been joined.
    fn on_finished(&self, summary: &RunSummary) {
        let _ = summary;
    }
}
