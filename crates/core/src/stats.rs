// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Rank-based order statistics over benchmark samples.
//!
//! The median is taken positionally: values are sorted ascending, ranked
//! from 1, and the elements at ranks `(n + 1) / 2` and `(n + 2) / 2`
//! (integer division) are averaged. For odd `n` both ranks are the same
//! middle element; for even `n` they are the two central elements. The
//! storage layer runs the same rule in SQL.

use crate::sample::{BenchmarkSample, GroupKey, MedianResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Median of `values` in the same unit as the input, or `None` if empty.
pub fn rank_median(values: &[u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let count = sorted.len();
    let low_rank = (count + 1) / 2;
    let high_rank = (count + 2) / 2;

    let low = sorted[low_rank - 1] as f64;
    let high = sorted[high_rank - 1] as f64;
    Some((low + high) / 2.0)
}

/// Per-group medians of sample durations, in seconds.
///
/// Rows are ordered by group key. Groups are only emitted when they hold at
/// least one sample.
pub fn median_by_group(samples: &[BenchmarkSample]) -> Vec<MedianResult> {
    let mut groups: BTreeMap<GroupKey, Vec<u64>> = BTreeMap::new();
    for sample in samples {
        groups
            .entry(sample.group_key())
            .or_default()
            .push(sample.duration_ms);
    }

    groups
        .into_iter()
        .filter_map(|(key, durations)| {
            rank_median(&durations).map(|median_ms| MedianResult {
                target: key.target,
                database: key.database,
                collection: key.collection,
                median_duration: median_ms / 1_000.0,
            })
        })
        .collect()
}

/// Summary of a set of sample durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    /// Number of samples
    pub count: usize,
    /// Fastest run in milliseconds
    pub min_ms: u64,
    /// Slowest run in milliseconds
    pub max_ms: u64,
    /// Rank median in milliseconds
    pub median_ms: f64,
}

impl SampleStats {
    /// Summarize the durations of `samples`, or `None` if there are none.
    pub fn from_samples(samples: &[BenchmarkSample]) -> Option<Self> {
        let durations: Vec<u64> = samples.iter().map(|s| s.duration_ms).collect();
        let median_ms = rank_median(&durations)?;
        Some(Self {
            count: durations.len(),
            min_ms: durations.iter().copied().min()?,
            max_ms: durations.iter().copied().max()?,
            median_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleContext;
    use crate::timing::Timing;
    use chrono::{TimeZone, Utc};

    fn sample(key: &GroupKey, seconds: u64) -> BenchmarkSample {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let end = start + chrono::Duration::seconds(seconds as i64);
        let context = SampleContext::new(key.clone(), "7.0.0");
        BenchmarkSample::new(&context, &Timing::from_bounds(start, end))
    }

    #[test]
    fn test_rank_median_odd() {
        assert_eq!(rank_median(&[3, 1, 2]), Some(2.0));
    }

    #[test]
    fn test_rank_median_even() {
        assert_eq!(rank_median(&[4, 1, 3, 2]), Some(2.5));
    }

    #[test]
    fn test_rank_median_singleton_and_empty() {
        assert_eq!(rank_median(&[5]), Some(5.0));
        assert_eq!(rank_median(&[]), None);
    }

    #[test]
    fn test_rank_median_duplicates() {
        assert_eq!(rank_median(&[7, 7, 7, 1]), Some(7.0));
        assert_eq!(rank_median(&[2, 2, 9, 9]), Some(5.5));
    }

    #[test]
    fn test_median_by_group_isolates_groups() {
        let a = GroupKey::new("mongodb://a", "shop", "orders");
        let b = GroupKey::new("mongodb://b", "shop", "orders");
        let samples = vec![
            sample(&a, 1),
            sample(&b, 10),
            sample(&a, 2),
            sample(&a, 3),
            sample(&b, 20),
        ];

        let rows = median_by_group(&samples);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group_key(), a);
        assert_eq!(rows[0].median_duration, 2.0);
        assert_eq!(rows[1].group_key(), b);
        assert_eq!(rows[1].median_duration, 15.0);
    }

    #[test]
    fn test_sample_stats() {
        let key = GroupKey::new("t", "d", "c");
        let samples: Vec<_> = [4, 1, 3, 2].iter().map(|s| sample(&key, *s)).collect();

        let stats = SampleStats::from_samples(&samples).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min_ms, 1_000);
        assert_eq!(stats.max_ms, 4_000);
        assert_eq!(stats.median_ms, 2_500.0);
        assert!(SampleStats::from_samples(&[]).is_none());
    }
}
