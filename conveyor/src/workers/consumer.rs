use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{Instrument, info};

use crate::concurrency::queue::BoundedQueue;
use crate::concurrency::shutdown::{ShutdownResult, ShutdownRx};
use crate::config::PipelineConfig;
use crate::conveyor_error;
use crate::error::{ConveyorResult, ErrorKind};
use crate::observer::RunObserver;
use crate::processors::Processor;
use crate::types::{Item, PipelineId, ReaderId};
use crate::workers::base::{Worker, WorkerHandle};

/// Handle for waiting on a consumer worker.
#[derive(Debug)]
pub struct ConsumerWorkerHandle {
    reader_id: ReaderId,
    processor: Processor,
    handle: Option<JoinHandle<ConveyorResult<Vec<Item>>>>,
}

impl ConsumerWorkerHandle {
    /// Identifier of the consumer this handle belongs to.
    pub fn reader_id(&self) -> ReaderId {
        self.reader_id
    }

    /// Processing policy the consumer is running.
    pub fn processor(&self) -> Processor {
        self.processor
    }
}

impl WorkerHandle for ConsumerWorkerHandle {
    /// The consumer's full private history, in dequeue order.
    type Output = Vec<Item>;

    async fn wait(mut self) -> ConveyorResult<Vec<Item>> {
        let Some(handle) = self.handle.take() else {
            return Ok(Vec::new());
        };

        let history = handle.await.map_err(|err| {
            if err.is_cancelled() {
                conveyor_error!(
                    ErrorKind::ConsumerWorkerPanic,
                    "Consumer worker was cancelled",
                    err
                )
            } else {
                conveyor_error!(ErrorKind::ConsumerWorkerPanic, "Consumer worker panicked", err)
            }
        })??;

        Ok(history)
    }
}

/// Worker that drains the bounded queue and runs a processing policy.
///
/// Each consumer owns a private, append-only history of the items it
/// dequeued; no other worker ever reads it while the loop runs. After every
/// dequeue the configured [`Processor`] receives the history plus the newest
/// item and may emit a report. Within one consumer the history is a strict
/// subsequence of the producer's emission order; across consumers there is
/// no ordering guarantee at all.
#[derive(Debug)]
pub struct ConsumerWorker<O> {
    pipeline_id: PipelineId,
    reader_id: ReaderId,
    processor: Processor,
    config: Arc<PipelineConfig>,
    queue: Arc<BoundedQueue>,
    observer: O,
    shutdown_rx: ShutdownRx,
}

impl<O> ConsumerWorker<O> {
    /// Creates a new consumer worker backed by the given shared queue.
    pub fn new(
        pipeline_id: PipelineId,
        reader_id: ReaderId,
        processor: Processor,
        config: Arc<PipelineConfig>,
        queue: Arc<BoundedQueue>,
        observer: O,
        shutdown_rx: ShutdownRx,
    ) -> Self {
        Self {
            pipeline_id,
            reader_id,
            processor,
            config,
            queue,
            observer,
            shutdown_rx,
        }
    }
}

impl<O> Worker<ConsumerWorkerHandle> for ConsumerWorker<O>
where
    O: RunObserver,
{
    async fn start(self) -> ConveyorResult<ConsumerWorkerHandle> {
        info!(reader_id = self.reader_id, processor = %self.processor, "starting consumer worker");

        let reader_id = self.reader_id;
        let processor = self.processor;

        let consumer_worker_span = tracing::info_span!(
            "consumer_worker",
            pipeline_id = self.pipeline_id,
            reader_id = self.reader_id
        );
        let consumer_worker = async move {
            let mut shutdown_rx = self.shutdown_rx;
            let mut history: Vec<Item> = Vec::new();

            for iteration in 0..self.config.max_iterations {
                if shutdown_rx.is_shutdown() {
                    break;
                }

                let value = match self.queue.dequeue(&mut shutdown_rx).await {
                    ShutdownResult::Ok(value) => value,
                    ShutdownResult::Shutdown(()) => break,
                };

                history.push(value);
                self.observer.on_consumed(reader_id, value);

                if let Some(report) = processor.process(&history, value) {
                    self.observer.on_processed(reader_id, &report);
                }

                // No pause is owed after the final item; it would only
                // delay the join.
                if iteration + 1 == self.config.max_iterations {
                    break;
                }

                tokio::select! {
                    _ = tokio::time::sleep(self.config.consumer_delay()) => {}
                    _ = shutdown_rx.signaled() => break,
                }
            }

            info!(consumed = history.len(), "consumer worker completed");

            Ok(history)
        }
        .instrument(consumer_worker_span.or_current());

        let handle = tokio::spawn(consumer_worker);

        Ok(ConsumerWorkerHandle {
            reader_id,
            processor,
            handle: Some(handle),
        })
    }
}
