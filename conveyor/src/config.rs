//! Pipeline configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::processors::Processor;
use crate::types::Item;

/// Errors raised by [`PipelineConfig::validate`].
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("buffer_size must be at least 1")]
    ZeroBufferSize,
    #[error("at least one consumer processor must be configured")]
    NoProcessors,
    #[error("value_min ({0}) must not exceed value_max ({1})")]
    InvalidValueRange(Item, Item),
}

/// Configuration for a conveyor pipeline run.
///
/// The defaults reproduce the canonical demo: a queue of capacity 10, one
/// producer emitting 20 values in `[1, 10]` at one-second intervals, and
/// three consumers draining at 1.5-second intervals, one per processing
/// policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Capacity of the shared bounded queue.
    pub buffer_size: usize,
    /// Maximum number of iterations each worker loop runs before exiting on
    /// its own.
    pub max_iterations: u64,
    /// Pause between productions, in milliseconds. Pacing only: it makes
    /// backpressure externally observable but carries no correctness weight.
    pub producer_delay_ms: u64,
    /// Pause between consumptions, in milliseconds.
    pub consumer_delay_ms: u64,
    /// Lower bound (inclusive) of produced values.
    pub value_min: Item,
    /// Upper bound (inclusive) of produced values.
    pub value_max: Item,
    /// Processing policies to run; one consumer is spawned per entry.
    pub processors: Vec<Processor>,
    /// Optional seed for the producer's random number generator. When unset,
    /// the producer seeds itself from OS entropy.
    pub rng_seed: Option<u64>,
}

impl PipelineConfig {
    /// Validates the configuration before a run is started.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.buffer_size == 0 {
            return Err(ValidationError::ZeroBufferSize);
        }

        if self.processors.is_empty() {
            return Err(ValidationError::NoProcessors);
        }

        if self.value_min > self.value_max {
            return Err(ValidationError::InvalidValueRange(
                self.value_min,
                self.value_max,
            ));
        }

        Ok(())
    }

    /// Pause between productions.
    pub fn producer_delay(&self) -> Duration {
        Duration::from_millis(self.producer_delay_ms)
    }

    /// Pause between consumptions.
    pub fn consumer_delay(&self) -> Duration {
        Duration::from_millis(self.consumer_delay_ms)
    }

    /// Inclusive range produced values are drawn from.
    pub fn value_range(&self) -> RangeInclusive<Item> {
        self.value_min..=self.value_max
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_size: 10,
            max_iterations: 20,
            producer_delay_ms: 1000,
            consumer_delay_ms: 1500,
            value_min: 1,
            value_max: 10,
            processors: vec![
                Processor::RollingMode,
                Processor::RunningStats,
                Processor::RunningSum,
            ],
            rng_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.buffer_size, 10);
        assert_eq!(config.max_iterations, 20);
        assert_eq!(config.value_range(), 1..=10);
        assert_eq!(config.processors.len(), 3);
    }

    #[test]
    fn zero_buffer_size_is_rejected() {
        let config = PipelineConfig {
            buffer_size: 0,
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ValidationError::ZeroBufferSize)
        ));
    }

    #[test]
    fn empty_processors_are_rejected() {
        let config = PipelineConfig {
            processors: vec![],
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(ValidationError::NoProcessors)));
    }

    #[test]
    fn inverted_value_range_is_rejected() {
        let config = PipelineConfig {
            value_min: 10,
            value_max: 1,
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidValueRange(10, 1))
        ));
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.buffer_size, config.buffer_size);
        assert_eq!(parsed.producer_delay_ms, config.producer_delay_ms);
        assert_eq!(parsed.processors, config.processors);
    }
}
