use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tracing::{Instrument, info};

use crate::concurrency::queue::BoundedQueue;
use crate::concurrency::shutdown::{ShutdownResult, ShutdownRx};
use crate::config::PipelineConfig;
use crate::conveyor_error;
use crate::error::{ConveyorResult, ErrorKind};
use crate::observer::RunObserver;
use crate::types::PipelineId;
use crate::workers::base::{Worker, WorkerHandle};

/// Handle for waiting on the producer worker.
#[derive(Debug)]
pub struct ProducerWorkerHandle {
    handle: Option<JoinHandle<ConveyorResult<u64>>>,
}

impl WorkerHandle for ProducerWorkerHandle {
    /// Number of items the producer enqueued before exiting.
    type Output = u64;

    async fn wait(mut self) -> ConveyorResult<u64> {
        let Some(handle) = self.handle.take() else {
            return Ok(0);
        };

        let produced = handle.await.map_err(|err| {
            if err.is_cancelled() {
                conveyor_error!(
                    ErrorKind::ProducerWorkerPanic,
                    "Producer worker was cancelled",
                    err
                )
            } else {
                conveyor_error!(ErrorKind::ProducerWorkerPanic, "Producer worker panicked", err)
            }
        })??;

        Ok(produced)
    }
}

/// Worker that generates values and feeds them into the bounded queue.
///
/// The producer runs for at most `max_iterations` iterations or until the
/// shutdown signal is observed, whichever comes first. Each iteration pauses
/// for the configured producer delay, draws a value uniformly from the
/// configured range, and enqueues it, suspending on a full queue
/// (backpressure). Normal completion does not trigger shutdown: consumers
/// keep draining whatever is left in the queue.
#[derive(Debug)]
pub struct ProducerWorker<O> {
    pipeline_id: PipelineId,
    config: Arc<PipelineConfig>,
    queue: Arc<BoundedQueue>,
    observer: O,
    shutdown_rx: ShutdownRx,
}

impl<O> ProducerWorker<O> {
    /// Creates a new producer worker backed by the given shared queue.
    pub fn new(
        pipeline_id: PipelineId,
        config: Arc<PipelineConfig>,
        queue: Arc<BoundedQueue>,
        observer: O,
        shutdown_rx: ShutdownRx,
    ) -> Self {
        Self {
            pipeline_id,
            config,
            queue,
            observer,
            shutdown_rx,
        }
    }
}

impl<O> Worker<ProducerWorkerHandle> for ProducerWorker<O>
where
    O: RunObserver,
{
    async fn start(self) -> ConveyorResult<ProducerWorkerHandle> {
        info!("starting producer worker");

        let producer_worker_span =
            tracing::info_span!("producer_worker", pipeline_id = self.pipeline_id);
        let producer_worker = async move {
            let mut shutdown_rx = self.shutdown_rx;
            // A seeded generator makes runs reproducible for tests and
            // demos; otherwise seed from OS entropy.
            let mut rng = match self.config.rng_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let mut produced = 0u64;
            for _ in 0..self.config.max_iterations {
                if shutdown_rx.is_shutdown() {
                    break;
                }

                // The pacing sleep also doubles as a wait point for the
                // shutdown signal, so cancellation never has to ride out a
                // full delay.
                tokio::select! {
                    _ = tokio::time::sleep(self.config.producer_delay()) => {}
                    _ = shutdown_rx.signaled() => break,
                }

                let value = rng.gen_range(self.config.value_range());
                match self.queue.enqueue(value, &mut shutdown_rx).await {
                    ShutdownResult::Ok(queue_len) => {
                        produced += 1;
                        self.observer.on_produced(value, queue_len);
                    }
                    ShutdownResult::Shutdown(()) => break,
                }
            }

            info!(produced, "producer worker completed");

            Ok(produced)
        }
        .instrument(producer_worker_span.or_current());

        let handle = tokio::spawn(producer_worker);

        Ok(ProducerWorkerHandle {
            handle: Some(handle),
        })
    }
}
