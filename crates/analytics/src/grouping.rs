//! Grouped sums and counts over row-aligned columns, plus the rounding and
//! zero-denominator rules shared by every ratio KPI.

use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Rounds to two decimals.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole × 100` rounded to two decimals; `0` when `whole` is zero.
#[must_use]
pub fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        round2(part / whole * 100.0)
    }
}

/// `numerator / denominator` rounded to two decimals; `0` when `denominator` is zero.
#[must_use]
pub fn average(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        round2(numerator / as_f64(denominator))
    }
}

#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn as_f64(count: usize) -> f64 {
    count as f64
}

/// Sum of `values` per key, keys in first-appearance order.
#[must_use]
pub fn sum_by(keys: &[String], values: &[f64]) -> IndexMap<String, f64> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for (key, value) in keys.iter().zip(values) {
        *totals.entry(key.clone()).or_insert(0.0) += value;
    }
    totals
}

/// Sum of `values` per key, keys ascending.
#[must_use]
pub fn sum_by_sorted(keys: &[String], values: &[f64]) -> BTreeMap<String, f64> {
    sum_by(keys, values).into_iter().collect()
}

/// Row count per key, keys ascending.
#[must_use]
pub fn count_by_sorted<'a>(keys: impl IntoIterator<Item = &'a String>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key.clone()).or_insert(0) += 1;
    }
    counts
}

/// Entries ordered by descending value. The sort is stable, so ties keep
/// their incoming (first-appearance) order.
#[must_use]
pub fn rank_desc<V: Copy + PartialOrd>(entries: IndexMap<String, V>, limit: usize) -> IndexMap<String, V> {
    let mut ranked: Vec<(String, V)> = entries.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.into_iter().take(limit).collect()
}
