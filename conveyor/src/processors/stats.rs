//! Running statistics over a consumer's full history.

use serde::Serialize;

use crate::types::Item;

/// Snapshot of mean, population variance, and population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
}

/// Computes population statistics over `history`.
///
/// Population statistics divide by the item count, not count − 1. An empty
/// history yields all zeros.
pub fn calculate_statistics(history: &[Item]) -> Statistics {
    if history.is_empty() {
        return Statistics {
            mean: 0.0,
            variance: 0.0,
            std_dev: 0.0,
        };
    }

    let count = history.len() as f64;
    let mean = history.iter().map(|&value| f64::from(value)).sum::<f64>() / count;
    let variance = history
        .iter()
        .map(|&value| {
            let deviation = f64::from(value) - mean;
            deviation * deviation
        })
        .sum::<f64>()
        / count;

    Statistics {
        mean,
        variance,
        std_dev: variance.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_history_has_zero_spread() {
        let stats = calculate_statistics(&[4, 4, 4]);

        assert_eq!(stats.mean, 4.0);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn statistics_are_population_statistics() {
        // Mean 5, squared deviations (9 + 1 + 1 + 9) / 4 = 5.
        let stats = calculate_statistics(&[2, 4, 6, 8]);

        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.variance, 5.0);
        assert!((stats.std_dev - 5.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_history_yields_zeros() {
        let stats = calculate_statistics(&[]);

        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
    }
}
