// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark sample and aggregation row types.

use crate::duration::format_duration;
use crate::timing::Timing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `(target, database, collection)` tuple samples are grouped by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    /// Connection endpoint identifier.
    pub target: String,
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
}

impl GroupKey {
    /// Create a new group key.
    pub fn new(
        target: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            database: database.into(),
            collection: collection.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.target, self.database, self.collection)
    }
}

/// Context a run is recorded under: the group key plus the server version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleContext {
    /// Group the samples belong to.
    pub key: GroupKey,
    /// Version reported by the benchmarked server.
    pub server_version: String,
}

impl SampleContext {
    /// Create a new sample context.
    pub fn new(key: GroupKey, server_version: impl Into<String>) -> Self {
        Self {
            key,
            server_version: server_version.into(),
        }
    }
}

/// One measured execution of the benchmarked pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkSample {
    /// Connection endpoint identifier.
    pub target: String,
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Wall-clock time immediately before the operation was invoked.
    pub start_time: DateTime<Utc>,
    /// Wall-clock time immediately after the operation completed.
    pub end_time: DateTime<Utc>,
    /// `end_time - start_time` in whole milliseconds.
    pub duration_ms: u64,
    /// `duration_ms` rendered as `HH:MM:SS`.
    pub duration_text: String,
    /// Server version at the time of the run.
    pub server_version: String,
}

impl BenchmarkSample {
    /// Build a sample from a completed timing under the given context.
    pub fn new(context: &SampleContext, timing: &Timing) -> Self {
        Self {
            target: context.key.target.clone(),
            database: context.key.database.clone(),
            collection: context.key.collection.clone(),
            start_time: timing.start_time,
            end_time: timing.end_time,
            duration_ms: timing.duration_ms,
            duration_text: timing.duration_text.clone(),
            server_version: context.server_version.clone(),
        }
    }

    /// The group this sample aggregates under.
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(&self.target, &self.database, &self.collection)
    }
}

/// Median duration of one sample group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianResult {
    /// Connection endpoint identifier.
    pub target: String,
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Median duration in seconds.
    pub median_duration: f64,
}

impl MedianResult {
    /// The group this row describes.
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(&self.target, &self.database, &self.collection)
    }

    /// Median rendered as `HH:MM:SS`, truncated to whole seconds.
    pub fn median_duration_text(&self) -> String {
        let millis = (self.median_duration.max(0.0) * 1_000.0).floor();
        // f64 -> u64 casts saturate, so absurd values clamp instead of wrapping.
        format_duration(millis as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn timing(ms: u64) -> Timing {
        let start_time = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Timing::from_bounds(start_time, start_time + chrono::Duration::milliseconds(ms as i64))
    }

    #[test]
    fn test_sample_from_timing() {
        let context = SampleContext::new(GroupKey::new("mongodb://a", "shop", "orders"), "7.0.2");
        let sample = BenchmarkSample::new(&context, &timing(61_500));

        assert_eq!(sample.group_key(), context.key);
        assert_eq!(sample.duration_ms, 61_500);
        assert_eq!(sample.duration_text, "00:01:01");
        assert_eq!(sample.server_version, "7.0.2");
        assert!(sample.end_time >= sample.start_time);
    }

    #[test]
    fn test_median_duration_text() {
        let row = MedianResult {
            target: "t".into(),
            database: "d".into(),
            collection: "c".into(),
            median_duration: 3_661.75,
        };
        assert_eq!(row.median_duration_text(), "01:01:01");
    }

    #[test]
    fn test_group_key_display() {
        let key = GroupKey::new("mongodb://localhost:27017", "shop", "orders");
        assert_eq!(key.to_string(), "mongodb://localhost:27017/shop.orders");
    }
}
