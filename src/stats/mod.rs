//! Small group-by aggregation helpers.
//!
//! Every chart in the dashboard is a group-by plus a mean or a sum. These
//! helpers keep that logic in one place and deterministic: results come back
//! in sorted key order, so identical inputs always produce identical tables.

use std::collections::BTreeMap;

/// Group `items` by `key` and return the arithmetic mean of `value` per group.
pub fn mean_by<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> Vec<(K, f64)>
where
    K: Ord,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for item in items {
        let entry = groups.entry(key(item)).or_insert((0.0, 0));
        entry.0 += value(item);
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Group `items` by `key` and return the sum of `value` per group.
pub fn sum_by<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> Vec<(K, f64)>
where
    K: Ord,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<K, f64> = BTreeMap::new();
    for item in items {
        *groups.entry(key(item)).or_insert(0.0) += value(item);
    }
    groups.into_iter().collect()
}

/// An `f64` usable as a group-by key.
///
/// Uses `total_cmp`, so NaN rates would sort last instead of poisoning the
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedF64(pub f64);

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        group: &'static str,
        value: f64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { group: "a", value: 1.0 },
            Row { group: "b", value: 10.0 },
            Row { group: "a", value: 3.0 },
            Row { group: "b", value: 20.0 },
            Row { group: "a", value: 5.0 },
        ]
    }

    #[test]
    fn mean_by_is_exact_arithmetic_mean() {
        let out = mean_by(&rows(), |r| r.group, |r| r.value);
        assert_eq!(out, vec![("a", 3.0), ("b", 15.0)]);
    }

    #[test]
    fn sum_by_totals_per_group() {
        let out = sum_by(&rows(), |r| r.group, |r| r.value);
        assert_eq!(out, vec![("a", 9.0), ("b", 30.0)]);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let out = mean_by(&[] as &[Row], |r| r.group, |r| r.value);
        assert!(out.is_empty());
    }

    #[test]
    fn ordered_f64_sorts_numerically() {
        let mut keys = vec![OrderedF64(5.5), OrderedF64(3.1), OrderedF64(4.2)];
        keys.sort();
        assert_eq!(keys, vec![OrderedF64(3.1), OrderedF64(4.2), OrderedF64(5.5)]);
    }
}
