use clap::Parser;
use conveyor::config::PipelineConfig;
use conveyor::processors::Processor;

/// Processing policies assigned to consumers, cycled in this order.
const POLICIES: [Processor; 3] = [
    Processor::RollingMode,
    Processor::RunningStats,
    Processor::RunningSum,
];

/// Bounded-buffer producer/consumer demo runner.
///
/// One producer feeds random values into a fixed-capacity queue while
/// several consumers drain it, each applying its own streaming reduction.
/// Cancel at any time with Ctrl+C; the run ends with a summary of how many
/// items each consumer processed and how many were left in the queue.
#[derive(Debug, Parser)]
#[command(name = "conveyor-runner")]
pub struct RunnerArgs {
    /// Capacity of the shared bounded queue.
    #[arg(long, default_value_t = 10)]
    pub buffer_size: usize,

    /// Maximum iterations each worker loop runs.
    #[arg(long, default_value_t = 20)]
    pub iterations: u64,

    /// Pause between productions, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub producer_delay_ms: u64,

    /// Pause between consumptions, in milliseconds.
    #[arg(long, default_value_t = 1500)]
    pub consumer_delay_ms: u64,

    /// Number of consumers; processing policies are assigned round-robin.
    #[arg(long, default_value_t = 3)]
    pub consumers: usize,

    /// Seed for the producer's random number generator, for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Cancel the run automatically after this many seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl RunnerArgs {
    /// Builds the pipeline configuration these arguments describe.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        let processors = (0..self.consumers)
            .map(|index| POLICIES[index % POLICIES.len()])
            .collect();

        PipelineConfig {
            buffer_size: self.buffer_size,
            max_iterations: self.iterations,
            producer_delay_ms: self.producer_delay_ms,
            consumer_delay_ms: self.consumer_delay_ms,
            processors,
            rng_seed: self.seed,
            ..Default::default()
        }
    }
}
