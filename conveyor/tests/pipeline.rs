use std::time::Duration;

use conveyor::config::PipelineConfig;
use conveyor::error::ErrorKind;
use conveyor::observer::MemoryObserver;
use conveyor::pipeline::Pipeline;
use conveyor::processors::{Processor, Report};
use conveyor::types::{Item, PipelineId};
use tokio::time::{Instant, sleep, timeout};

const PIPELINE_ID: PipelineId = 1;

/// Canonical demo configuration with a fixed seed so runs are reproducible.
fn test_config() -> PipelineConfig {
    PipelineConfig {
        rng_seed: Some(42),
        ..Default::default()
    }
}

/// Checks that `needle` appears within `haystack` in order (not necessarily
/// contiguously).
fn is_subsequence(needle: &[Item], haystack: &[Item]) -> bool {
    let mut candidates = haystack.iter();
    needle
        .iter()
        .all(|value| candidates.any(|candidate| candidate == value))
}

#[tokio::test(start_paused = true)]
async fn full_run_conserves_every_produced_item() {
    let observer = MemoryObserver::new();
    let mut pipeline = Pipeline::new(PIPELINE_ID, test_config(), observer.clone());

    pipeline.start().await.unwrap();

    // Let the producer exhaust its iterations and the consumers drain the
    // queue; the paused clock fast-forwards through the pacing sleeps.
    sleep(Duration::from_secs(120)).await;

    let summary = pipeline.shutdown_and_wait().await.unwrap();

    assert_eq!(summary.produced, 20);
    assert_eq!(summary.consumers.len(), 3);
    assert_eq!(
        summary.produced,
        summary.consumed() + summary.residual as u64
    );

    // Exactly one cancellation and one summary were reported.
    assert_eq!(observer.cancellations(), 1);
    assert_eq!(observer.summaries().len(), 1);
    assert_eq!(observer.produced().len(), 20);
}

#[tokio::test(start_paused = true)]
async fn each_consumer_history_is_a_subsequence_of_production_order() {
    let observer = MemoryObserver::new();
    let mut pipeline = Pipeline::new(PIPELINE_ID, test_config(), observer.clone());

    pipeline.start().await.unwrap();
    sleep(Duration::from_secs(120)).await;

    let summary = pipeline.shutdown_and_wait().await.unwrap();

    let produced: Vec<Item> = observer
        .produced()
        .into_iter()
        .map(|(value, _)| value)
        .collect();

    for consumer in &summary.consumers {
        let history = observer.consumed_by(consumer.reader_id);

        assert_eq!(history.len() as u64, consumer.consumed);
        assert!(
            is_subsequence(&history, &produced),
            "consumer {} saw items out of production order",
            consumer.reader_id
        );
    }
}

#[tokio::test(start_paused = true)]
async fn queue_length_never_exceeds_capacity_under_backpressure() {
    // A fast producer against slow consumers forces the queue to fill up.
    let config = PipelineConfig {
        buffer_size: 5,
        producer_delay_ms: 10,
        consumer_delay_ms: 1000,
        rng_seed: Some(7),
        ..Default::default()
    };

    let observer = MemoryObserver::new();
    let mut pipeline = Pipeline::new(PIPELINE_ID, config, observer.clone());

    pipeline.start().await.unwrap();
    sleep(Duration::from_secs(60)).await;

    pipeline.shutdown_and_wait().await.unwrap();

    let queue_lengths: Vec<usize> = observer
        .produced()
        .into_iter()
        .map(|(_, queue_len)| queue_len)
        .collect();

    assert!(queue_lengths.iter().all(|&len| len <= 5));
    // Backpressure was actually exercised: the queue transiently filled.
    assert_eq!(queue_lengths.iter().max(), Some(&5));
}

#[tokio::test(start_paused = true)]
async fn cancellation_unblocks_producer_parked_on_full_queue() {
    // Tiny buffer, near-instant producer, consumers that sleep for ages
    // after their first item: the producer is guaranteed to be parked on a
    // full queue when the cancellation fires.
    let config = PipelineConfig {
        buffer_size: 2,
        producer_delay_ms: 1,
        consumer_delay_ms: 600_000,
        rng_seed: Some(3),
        ..Default::default()
    };

    let observer = MemoryObserver::new();
    let mut pipeline = Pipeline::new(PIPELINE_ID, config, observer.clone());

    pipeline.start().await.unwrap();
    sleep(Duration::from_secs(1)).await;

    // Each of the three consumers grabbed one item and went to sleep, two
    // more items fill the buffer, and the producer is parked on the sixth.
    let summary = timeout(Duration::from_secs(60), pipeline.shutdown_and_wait())
        .await
        .expect("pipeline deadlocked after cancellation")
        .unwrap();

    assert_eq!(summary.produced, 5);
    assert_eq!(summary.consumed(), 3);
    assert_eq!(summary.residual, 2);
    for consumer in &summary.consumers {
        assert_eq!(consumer.consumed, 1);
    }
}

#[tokio::test(start_paused = true)]
async fn repeated_shutdown_is_a_noop() {
    let observer = MemoryObserver::new();
    let mut pipeline = Pipeline::new(PIPELINE_ID, test_config(), observer.clone());

    pipeline.start().await.unwrap();
    sleep(Duration::from_secs(5)).await;

    let shutdown_handle = pipeline.shutdown_handle();
    assert!(shutdown_handle.shutdown());
    assert!(!shutdown_handle.shutdown());

    // Triggering again through the pipeline itself is equally inert.
    pipeline.shutdown();

    pipeline.wait().await.unwrap();

    assert_eq!(observer.cancellations(), 1);
}

#[tokio::test(start_paused = true)]
async fn single_sum_consumer_run_completes_without_cancellation() {
    // One consumer with the same iteration cap as the producer drains every
    // item, so both loops exhaust their iterations and the run ends on its
    // own.
    let config = PipelineConfig {
        processors: vec![Processor::RunningSum],
        rng_seed: Some(11),
        ..Default::default()
    };

    let observer = MemoryObserver::new();
    let mut pipeline = Pipeline::new(PIPELINE_ID, config, observer.clone());

    pipeline.start().await.unwrap();
    let summary = pipeline.wait().await.unwrap();

    assert_eq!(summary.produced, 20);
    assert_eq!(summary.consumed(), 20);
    assert_eq!(summary.residual, 0);
    assert_eq!(observer.cancellations(), 0);

    // With a single consumer the history is not just a subsequence, it is
    // the production order itself.
    let produced: Vec<Item> = observer
        .produced()
        .into_iter()
        .map(|(value, _)| value)
        .collect();
    let history = observer.consumed_by(0);
    assert_eq!(history, produced);

    // The running sum's count ticks once per consumption step, and each sum
    // matches the prefix of the history.
    let reports = observer.reports_for(0);
    assert_eq!(reports.len(), 20);

    let mut expected_sum = 0u64;
    for (step, report) in reports.iter().enumerate() {
        expected_sum += u64::from(history[step]);

        let Report::Sum { sum, count, last } = report else {
            panic!("running sum consumer emitted a non-sum report");
        };
        assert_eq!(*count, step as u64 + 1);
        assert_eq!(*sum, expected_sum);
        assert_eq!(*last, history[step]);
    }
}

#[tokio::test(start_paused = true)]
async fn residual_items_are_reported_not_lost() {
    // Consumers that effectively never wake up again after their first item
    // leave the later productions sitting in the queue.
    let config = PipelineConfig {
        buffer_size: 10,
        max_iterations: 8,
        producer_delay_ms: 10,
        consumer_delay_ms: 600_000,
        processors: vec![Processor::RunningSum],
        rng_seed: Some(5),
        ..Default::default()
    };

    let observer = MemoryObserver::new();
    let mut pipeline = Pipeline::new(PIPELINE_ID, config, observer.clone());

    pipeline.start().await.unwrap();
    sleep(Duration::from_secs(2)).await;

    let summary = pipeline.shutdown_and_wait().await.unwrap();

    assert_eq!(summary.produced, 8);
    assert_eq!(summary.consumed(), 1);
    assert_eq!(summary.residual, 7);
}

#[tokio::test(start_paused = true)]
async fn consumer_joins_without_a_trailing_pause_after_its_last_item() {
    let config = PipelineConfig {
        max_iterations: 2,
        processors: vec![Processor::RunningSum],
        rng_seed: Some(13),
        ..Default::default()
    };

    let mut pipeline = Pipeline::new(PIPELINE_ID, config, MemoryObserver::new());
    let started = Instant::now();

    pipeline.start().await.unwrap();
    let summary = pipeline.wait().await.unwrap();

    assert_eq!(summary.produced, 2);
    assert_eq!(summary.consumed(), 2);

    // Item 1 arrives at 1s, the inter-consumption pause runs to 2.5s, item 2
    // is consumed there, and the consumer joins immediately instead of
    // riding out one more pause.
    assert_eq!(started.elapsed(), Duration::from_millis(2500));
}

#[tokio::test]
async fn waiting_on_an_unstarted_pipeline_reports_an_empty_run() {
    let observer = MemoryObserver::new();
    let pipeline = Pipeline::new(PIPELINE_ID, test_config(), observer.clone());

    let summary = pipeline.wait().await.unwrap();

    assert_eq!(summary.produced, 0);
    assert!(summary.consumers.is_empty());
    assert_eq!(summary.residual, 0);

    // The terminal summary hook fires even for an empty run.
    assert_eq!(observer.summaries().len(), 1);
}

#[tokio::test]
async fn pipeline_cannot_be_started_twice() {
    let mut pipeline = Pipeline::new(PIPELINE_ID, test_config(), MemoryObserver::new());

    pipeline.start().await.unwrap();
    let err = pipeline.start().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);

    pipeline.shutdown_and_wait().await.unwrap();
}

#[tokio::test]
async fn invalid_configuration_is_rejected_at_start() {
    let config = PipelineConfig {
        buffer_size: 0,
        ..Default::default()
    };

    let mut pipeline = Pipeline::new(PIPELINE_ID, config, MemoryObserver::new());
    let err = pipeline.start().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
}
