//! Running sum over a consumer's full history.

use crate::types::Item;

/// Sums the full history.
pub fn calculate_sum(history: &[Item]) -> u64 {
    history.iter().map(|&value| u64::from(value)).sum()
}
