use std::sync::{Arc, Mutex};

use crate::observer::RunObserver;
use crate::processors::Report;
use crate::types::{Item, ReaderId, RunSummary};

#[derive(Debug, Default)]
struct Inner {
    produced: Vec<(Item, usize)>,
    consumed: Vec<(ReaderId, Item)>,
    reports: Vec<(ReaderId, Report)>,
    cancellations: u64,
    summaries: Vec<RunSummary>,
}

/// In-memory observer for testing and development purposes.
///
/// [`MemoryObserver`] records every hook invocation so tests can assert on
/// the exact sequence of produced values, per-consumer consumption, emitted
/// reports, and the final summary. All data is held in memory and lost when
/// the process terminates.
#[derive(Debug, Clone, Default)]
pub struct MemoryObserver {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryObserver {
    /// Creates a new empty memory observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every `(value, queue_len_after)` pair, in production order.
    pub fn produced(&self) -> Vec<(Item, usize)> {
        self.lock().produced.clone()
    }

    /// Returns every `(reader_id, value)` pair, in the global order the
    /// hooks fired.
    pub fn consumed(&self) -> Vec<(ReaderId, Item)> {
        self.lock().consumed.clone()
    }

    /// Returns the values consumed by one reader, in that reader's order.
    pub fn consumed_by(&self, reader_id: ReaderId) -> Vec<Item> {
        self.lock()
            .consumed
            .iter()
            .filter(|(id, _)| *id == reader_id)
            .map(|(_, value)| *value)
            .collect()
    }

    /// Returns every `(reader_id, report)` pair, in emission order.
    pub fn reports(&self) -> Vec<(ReaderId, Report)> {
        self.lock().reports.clone()
    }

    /// Returns the reports emitted for one reader, in that reader's order.
    pub fn reports_for(&self, reader_id: ReaderId) -> Vec<Report> {
        self.lock()
            .reports
            .iter()
            .filter(|(id, _)| *id == reader_id)
            .map(|(_, report)| report.clone())
            .collect()
    }

    /// Number of times `on_cancelled` fired. At most 1 in a correct run.
    pub fn cancellations(&self) -> u64 {
        self.lock().cancellations
    }

    /// Returns the recorded run summaries. At most 1 in a correct run.
    pub fn summaries(&self) -> Vec<RunSummary> {
        self.lock().summaries.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Hook bodies cannot panic while holding the lock, so poisoning is
        // unreachable outside of test bugs.
        self.inner.lock().expect("memory observer lock poisoned")
    }
}

impl RunObserver for MemoryObserver {
    fn on_produced(&self, value: Item, queue_len: usize) {
        self.lock().produced.push((value, queue_len));
    }

    fn on_consumed(&self, reader_id: ReaderId, value: Item) {
        self.lock().consumed.push((reader_id, value));
    }

    fn on_processed(&self, reader_id: ReaderId, report: &Report) {
        self.lock().reports.push((reader_id, report.clone()));
    }

    fn on_cancelled(&self) {
        self.lock().cancellations += 1;
    }

    fn on_finished(&self, summary: &RunSummary) {
        self.lock().summaries.push(summary.clone());
    }
}
