//! Sequential benchmark run loop.
//!
//! Each iteration times one pipeline execution and stores the sample before
//! the next iteration starts. The first failure ends the session: a run
//! that fails to measure is never stored, and nothing is retried.

use crate::result::RunSummary;
use aggbench_adapters::{AggregationTarget, Pipeline, TargetError};
use aggbench_core::{measure, BenchmarkSample, GroupKey, SampleContext};
use aggbench_storage::{SampleStore, StoreError};
use indicatif::ProgressBar;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that end a benchmark session.
#[derive(Debug, Error)]
pub enum RunError {
    /// The pipeline failed while being measured
    #[error("run {run} failed to measure")]
    Measure {
        /// 1-based run index
        run: u32,
        /// Target failure
        #[source]
        source: TargetError,
    },

    /// The measured sample could not be stored
    #[error("run {run} failed to persist")]
    Persist {
        /// 1-based run index
        run: u32,
        /// Storage failure
        #[source]
        source: StoreError,
    },
}

/// Result type for run operations.
pub type Result<T> = std::result::Result<T, RunError>;

/// Number of runs in a session, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunCount(u32);

impl RunCount {
    /// A single run.
    pub const ONE: Self = Self(1);

    /// Accept a requested count, falling back to one run if it is below one.
    pub fn from_requested(requested: i64) -> Self {
        match u32::try_from(requested) {
            Ok(n) if n >= 1 => Self(n),
            _ => {
                warn!(requested, "Invalid run count, using default value of 1");
                Self::ONE
            }
        }
    }

    /// Parse a count typed by the operator, falling back to one run if it is
    /// not a positive integer.
    pub fn parse_lenient(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(requested) => Self::from_requested(requested),
            Err(_) => {
                warn!(requested = text, "Invalid run count, using default value of 1");
                Self::ONE
            }
        }
    }

    /// The count.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for RunCount {
    fn default() -> Self {
        Self::ONE
    }
}

/// Everything a session records samples under.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Group key and server version stamped on each sample.
    pub sample: SampleContext,
    /// How many times to run the pipeline.
    pub runs: RunCount,
}

impl RunContext {
    /// Create a new run context.
    pub fn new(key: GroupKey, server_version: impl Into<String>, runs: RunCount) -> Self {
        Self {
            sample: SampleContext::new(key, server_version),
            runs,
        }
    }
}

/// Drives a target through a benchmark session, storing each sample.
pub struct Runner<'a> {
    store: &'a SampleStore,
    target: &'a dyn AggregationTarget,
    progress: ProgressBar,
}

impl<'a> Runner<'a> {
    /// Create a runner with no progress display.
    pub fn new(store: &'a SampleStore, target: &'a dyn AggregationTarget) -> Self {
        Self {
            store,
            target,
            progress: ProgressBar::hidden(),
        }
    }

    /// Advance `progress` once per stored run.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Run the session described by `context`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Measure`] if the pipeline fails and
    /// [`RunError::Persist`] if a sample cannot be stored. Runs completed
    /// before the failure stay stored.
    pub async fn run(&self, context: &RunContext, pipeline: &Pipeline) -> Result<RunSummary> {
        let runs = context.runs.get();
        let mut samples = Vec::new();
        self.progress.set_length(u64::from(runs));

        for run in 1..=runs {
            info!(run, runs, "Running aggregation");

            let measured = measure(|| self.target.run_pipeline(pipeline))
                .await
                .map_err(|source| {
                    error!(run, error = %source, "Aggregation failed");
                    RunError::Measure { run, source }
                })?;

            let sample = BenchmarkSample::new(&context.sample, &measured.timing);
            self.store.insert(&sample).await.map_err(|source| {
                error!(run, error = %source, "Failed to store sample");
                RunError::Persist { run, source }
            })?;

            info!(
                run,
                duration = %sample.duration_text,
                duration_ms = sample.duration_ms,
                documents = measured.output,
                "Query executed"
            );
            self.progress.inc(1);
            samples.push(sample);
        }

        self.progress.finish_and_clear();
        info!(runs, "All queries completed, performance data saved");

        Ok(RunSummary::new(
            context.sample.key.clone(),
            context.sample.server_version.clone(),
            samples,
        ))
    }
}
