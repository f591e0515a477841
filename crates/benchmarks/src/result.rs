//! Run summary types.
//!
//! This module provides the RunSummary struct returned once every run of a
//! benchmark session has been measured and stored.

use aggbench_core::{BenchmarkSample, GroupKey, SampleStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one benchmark session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Group the samples were recorded under.
    pub key: GroupKey,
    /// Server version recorded with the samples.
    pub server_version: String,
    /// Samples recorded by this session, in run order.
    pub samples: Vec<BenchmarkSample>,
    /// Statistics over this session's samples only.
    pub stats: Option<SampleStats>,
    /// Timestamp when the last run was stored.
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    /// Create a new RunSummary.
    pub fn new(key: GroupKey, server_version: impl Into<String>, samples: Vec<BenchmarkSample>) -> Self {
        let stats = SampleStats::from_samples(&samples);
        Self {
            key,
            server_version: server_version.into(),
            samples,
            stats,
            completed_at: Utc::now(),
        }
    }

    /// Number of runs recorded.
    pub fn runs(&self) -> usize {
        self.samples.len()
    }
}
