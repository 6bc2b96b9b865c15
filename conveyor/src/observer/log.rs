use tracing::info;

use crate::observer::RunObserver;
use crate::processors::Report;
use crate::types::{Item, ReaderId, RunSummary};

/// Observer that reports run events as structured tracing events.
///
/// This is what the demo binary attaches; tracing takes care of serializing
/// output from concurrently running workers, so interleaved lines are never
/// torn.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl RunObserver for LogObserver {
    fn on_produced(&self, value: Item, queue_len: usize) {
        info!(value, queue_len, "produced item");
    }

    fn on_consumed(&self, reader_id: ReaderId, value: Item) {
        info!(reader_id, value, "consumed item");
    }

    fn on_processed(&self, reader_id: ReaderId, report: &Report) {
        match report {
            Report::Mode { values } => {
                info!(reader_id, ?values, "rolling mode over last window");
            }
            Report::Stats(stats) => {
                info!(
                    reader_id,
                    mean = stats.mean,
                    variance = stats.variance,
                    std_dev = stats.std_dev,
                    "running statistics"
                );
            }
            Report::Sum { sum, count, last } => {
                info!(reader_id, sum, count, last, "running sum");
            }
        }
    }

    fn on_cancelled(&self) {
        info!("cancellation received, shutting down all workers");
    }

    fn on_finished(&self, summary: &RunSummary) {
        for consumer in &summary.consumers {
            info!(
                reader_id = consumer.reader_id,
                processor = %consumer.processor,
                consumed = consumer.consumed,
                "consumer finished"
            );
        }

        info!(
            produced = summary.produced,
            consumed = summary.consumed(),
            residual = summary.residual,
            "run finished"
        );
    }
}
