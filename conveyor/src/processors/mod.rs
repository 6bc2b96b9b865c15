//! Per-consumer stream processing policies.
//!
//! Each consumer owns exactly one policy and feeds it the full history plus
//! the newest item after every dequeue. The policy set is closed by design:
//! there are three fixed reductions and no plugin surface.

mod mode;
mod stats;
mod sum;

pub use mode::{MODE_WINDOW, calculate_mode};
pub use stats::{Statistics, calculate_statistics};
pub use sum::calculate_sum;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Item;

/// Processing policy a consumer applies to its history.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Processor {
    /// Most frequent values within the last [`MODE_WINDOW`] items.
    RollingMode,
    /// Mean, population variance, and population standard deviation over the
    /// full history.
    RunningStats,
    /// Sum over the full history.
    RunningSum,
}

impl Processor {
    /// Runs the policy over the consumer's history.
    ///
    /// `newest` is the item appended by the dequeue that triggered this call;
    /// it is always the last element of `history`. Returns `None` when the
    /// policy has nothing to report yet (the rolling mode needs a full
    /// window before it produces anything).
    pub fn process(&self, history: &[Item], newest: Item) -> Option<Report> {
        match self {
            Processor::RollingMode => {
                if history.len() < MODE_WINDOW {
                    return None;
                }

                let window = &history[history.len() - MODE_WINDOW..];

                Some(Report::Mode {
                    values: calculate_mode(window),
                })
            }
            Processor::RunningStats => Some(Report::Stats(calculate_statistics(history))),
            Processor::RunningSum => Some(Report::Sum {
                sum: calculate_sum(history),
                count: history.len() as u64,
                last: newest,
            }),
        }
    }
}

impl fmt::Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Processor::RollingMode => write!(f, "rolling_mode"),
            Processor::RunningStats => write!(f, "running_stats"),
            Processor::RunningSum => write!(f, "running_sum"),
        }
    }
}

/// Derived report emitted by a [`Processor`] after a consumption event.
///
/// Immutable snapshot: recomputed in full from the history on every event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Report {
    /// Up to [`MODE_WINDOW`] values by descending frequency within the most
    /// recent window.
    Mode { values: Vec<Item> },
    /// Running statistics over the full history.
    Stats(Statistics),
    /// Running sum over the full history.
    Sum { sum: u64, count: u64, last: Item },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_mode_stays_silent_below_a_full_window() {
        assert_eq!(Processor::RollingMode.process(&[4], 4), None);
        assert_eq!(Processor::RollingMode.process(&[4, 2], 2), None);
    }

    #[test]
    fn rolling_mode_reports_over_the_last_window_only() {
        let report = Processor::RollingMode.process(&[9, 9, 2, 2, 5], 5);

        assert_eq!(
            report,
            Some(Report::Mode {
                values: vec![2, 5]
            })
        );
    }

    #[test]
    fn running_stats_reports_on_every_item() {
        let report = Processor::RunningStats.process(&[4], 4);

        assert_eq!(
            report,
            Some(Report::Stats(Statistics {
                mean: 4.0,
                variance: 0.0,
                std_dev: 0.0
            }))
        );
    }

    #[test]
    fn running_sum_counts_every_consumed_item() {
        let history = [2, 3, 5];
        let report = Processor::RunningSum.process(&history, 5);

        assert_eq!(
            report,
            Some(Report::Sum {
                sum: 10,
                count: 3,
                last: 5
            })
        );
    }
}
