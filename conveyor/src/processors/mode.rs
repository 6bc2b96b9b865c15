//! Rolling mode over the most recent consumption window.

use std::collections::BTreeMap;

use crate::types::Item;

/// Number of most recent history items the rolling mode looks at.
pub const MODE_WINDOW: usize = 3;

/// Returns the values of `window` ordered by descending frequency.
///
/// At most [`MODE_WINDOW`] values are returned. Ties are broken
/// deterministically by smaller value first, so `[2, 2, 5]` yields `[2, 5]`
/// and `[5, 2, 2]` yields the same.
pub fn calculate_mode(window: &[Item]) -> Vec<Item> {
    let mut frequencies: BTreeMap<Item, usize> = BTreeMap::new();
    for &value in window {
        *frequencies.entry(value).or_insert(0) += 1;
    }

    let mut ranked: Vec<(Item, usize)> = frequencies.into_iter().collect();
    // Descending frequency; the ascending-value tie-break falls out of the
    // stable sort over the BTreeMap's ordered entries.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(MODE_WINDOW)
        .map(|(value, _)| value)
        .collect()
}
