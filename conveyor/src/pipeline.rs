//! Orchestration of one pipeline run: spawn, cancel, join, summarize.

use std::sync::Arc;

use tracing::{error, info};

use crate::bail;
use crate::concurrency::queue::BoundedQueue;
use crate::concurrency::shutdown::{ShutdownTx, create_shutdown_channel};
use crate::config::PipelineConfig;
use crate::error::{ConveyorResult, ErrorKind};
use crate::observer::RunObserver;
use crate::types::{ConsumerRunSummary, PipelineId, RunSummary};
use crate::workers::base::{Worker, WorkerHandle};
use crate::workers::consumer::{ConsumerWorker, ConsumerWorkerHandle};
use crate::workers::producer::{ProducerWorker, ProducerWorkerHandle};

#[derive(Debug)]
enum PipelineState {
    NotStarted,
    Started {
        producer: ProducerWorkerHandle,
        consumers: Vec<ConsumerWorkerHandle>,
    },
}

/// Cloneable handle for cancelling a running pipeline.
///
/// Multiple cancellation sources (OS signal watcher, run timeout, manual
/// call) can each hold a clone; only the first trigger has any effect and
/// fires the `on_cancelled` hook.
#[derive(Debug, Clone)]
pub struct ShutdownHandle<O> {
    shutdown_tx: ShutdownTx,
    observer: O,
}

impl<O> ShutdownHandle<O>
where
    O: RunObserver,
{
    /// Triggers shutdown, waking every parked worker.
    ///
    /// Returns `true` only for the call that performed the transition;
    /// repeated or racing calls are no-ops.
    pub fn shutdown(&self) -> bool {
        let transitioned = self.shutdown_tx.shutdown();
        if transitioned {
            self.observer.on_cancelled();
        }

        transitioned
    }
}

/// A single producer / multiple consumer run over one shared bounded queue.
///
/// The pipeline owns the two pieces of cross-cutting shared state (queue and
/// shutdown channel) and hands references to each worker at spawn time;
/// nothing in the system relies on ambient globals.
#[derive(Debug)]
pub struct Pipeline<O> {
    id: PipelineId,
    config: Arc<PipelineConfig>,
    observer: O,
    queue: Arc<BoundedQueue>,
    state: PipelineState,
    shutdown_tx: ShutdownTx,
}

impl<O> Pipeline<O>
where
    O: RunObserver + Clone,
{
    /// Creates a new pipeline in the not-started state.
    pub fn new(id: PipelineId, config: PipelineConfig, observer: O) -> Self {
        // The shutdown receivers are not kept here; each worker extracts its
        // own via `subscribe` at spawn time.
        let (shutdown_tx, _) = create_shutdown_channel();
        let queue = Arc::new(BoundedQueue::new(config.buffer_size));

        Self {
            id,
            config: Arc::new(config),
            observer,
            queue,
            state: PipelineState::NotStarted,
            shutdown_tx,
        }
    }

    pub fn id(&self) -> PipelineId {
        self.id
    }

    /// Returns a handle other tasks can use to cancel this run.
    pub fn shutdown_handle(&self) -> ShutdownHandle<O> {
        ShutdownHandle {
            shutdown_tx: self.shutdown_tx.clone(),
            observer: self.observer.clone(),
        }
    }

    /// Validates the configuration and spawns the producer and all
    /// configured consumers against the shared queue.
    pub async fn start(&mut self) -> ConveyorResult<()> {
        if let PipelineState::Started { .. } = self.state {
            bail!(ErrorKind::InvalidState, "Pipeline was already started");
        }

        if let Err(err) = self.config.validate() {
            bail!(ErrorKind::InvalidConfig, "Invalid pipeline configuration", err);
        }

        info!(
            pipeline_id = self.id,
            buffer_size = self.config.buffer_size,
            consumers = self.config.processors.len(),
            "starting pipeline"
        );

        let producer = ProducerWorker::new(
            self.id,
            self.config.clone(),
            self.queue.clone(),
            self.observer.clone(),
            self.shutdown_tx.subscribe(),
        )
        .start()
        .await?;

        let mut consumers = Vec::with_capacity(self.config.processors.len());
        for (index, processor) in self.config.processors.iter().enumerate() {
            let consumer = ConsumerWorker::new(
                self.id,
                index as u64,
                *processor,
                self.config.clone(),
                self.queue.clone(),
                self.observer.clone(),
                self.shutdown_tx.subscribe(),
            )
            .start()
            .await?;

            consumers.push(consumer);
        }

        self.state = PipelineState::Started {
            producer,
            consumers,
        };

        Ok(())
    }

    /// Triggers shutdown without waiting for the workers to exit.
    pub fn shutdown(&self) {
        self.shutdown_handle().shutdown();
    }

    /// Waits for every worker to exit and returns the run's final summary.
    ///
    /// Note that an uncancelled run does not end on its own once the
    /// producer's iterations are exhausted: consumers stay parked on the
    /// empty queue until shutdown is triggered from somewhere. Callers that
    /// want a bounded wait pair this with a cancellation source or use
    /// [`Pipeline::shutdown_and_wait`].
    pub async fn wait(self) -> ConveyorResult<RunSummary> {
        let shutdown_handle = self.shutdown_handle();

        let PipelineState::Started {
            producer,
            consumers,
        } = self.state
        else {
            info!("pipeline was not started, nothing to wait for");

            let summary = RunSummary {
                produced: 0,
                consumers: Vec::new(),
                residual: self.queue.len().await,
            };

            // Even an empty run is a finished run; observers still get
            // their terminal summary exactly once.
            self.observer.on_finished(&summary);

            return Ok(summary);
        };

        info!("waiting for producer worker to complete");

        let mut errors = vec![];

        // The producer is joined first: it is the only writer, so once it is
        // gone the item count is final and consumer accounting can be
        // trusted.
        let produced = match producer.wait().await {
            Ok(produced) => produced,
            Err(err) => {
                errors.push(err);

                // A failed producer leaves consumers parked on an empty
                // queue with nobody left to fill it, so they are shut down
                // rather than waited on indefinitely.
                shutdown_handle.shutdown();

                info!("producer worker failed, shutting down consumer workers");

                0
            }
        };

        info!("waiting for consumer workers to complete");

        let mut consumer_summaries = Vec::with_capacity(consumers.len());
        for consumer in consumers {
            let reader_id = consumer.reader_id();
            let processor = consumer.processor();

            match consumer.wait().await {
                Ok(history) => consumer_summaries.push(ConsumerRunSummary {
                    reader_id,
                    processor,
                    consumed: history.len() as u64,
                }),
                Err(err) => {
                    error!(reader_id, error = %err, "consumer worker failed");
                    errors.push(err);
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        let summary = RunSummary {
            produced,
            consumers: consumer_summaries,
            residual: self.queue.len().await,
        };

        self.observer.on_finished(&summary);

        Ok(summary)
    }

    /// Triggers shutdown and waits for all workers to exit.
    pub async fn shutdown_and_wait(self) -> ConveyorResult<RunSummary> {
        self.shutdown();
        self.wait().await
    }
}
