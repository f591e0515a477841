// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Timing harness for a single asynchronous unit of work.
//!
//! [`measure`] records the wall-clock start immediately before invoking the
//! operation and derives the end time from a monotonic clock once the
//! operation completes, so `end_time >= start_time` holds even if the system
//! clock steps backwards mid-run.
//!
//! Both bounds are kept at millisecond precision, the precision samples are
//! stored at, so `duration_ms` always equals the stored `end - start`.
//!
//! # Example
//!
//! ```no_run
//! use aggbench_core::timing::measure;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), std::io::Error> {
//! let measured = measure(|| async {
//!     tokio::time::sleep(Duration::from_millis(10)).await;
//!     Ok::<_, std::io::Error>(())
//! })
//! .await?;
//! assert!(measured.timing.duration_ms >= 10);
//! # Ok(())
//! # }
//! ```

use crate::duration::format_duration;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Instant;

/// Start, end and elapsed time of one measured operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Wall-clock time before invocation.
    pub start_time: DateTime<Utc>,
    /// Wall-clock time after completion.
    pub end_time: DateTime<Utc>,
    /// `end_time - start_time` in whole milliseconds.
    pub duration_ms: u64,
    /// `duration_ms` formatted as `HH:MM:SS`.
    pub duration_text: String,
}

impl Timing {
    /// Build a timing from its two bounds.
    ///
    /// Both bounds are truncated to whole milliseconds. An `end_time`
    /// earlier than `start_time` is clamped to `start_time`.
    pub fn from_bounds(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        let start_time = start_time.trunc_subsecs(3);
        let end_time = end_time.trunc_subsecs(3).max(start_time);
        let duration_ms = u64::try_from((end_time - start_time).num_milliseconds()).unwrap_or(0);
        Self {
            start_time,
            end_time,
            duration_ms,
            duration_text: format_duration(duration_ms),
        }
    }
}

/// Output of a measured operation together with its timing.
#[derive(Debug, Clone)]
pub struct Measured<T> {
    /// Timing of the operation.
    pub timing: Timing,
    /// Value the operation produced.
    pub output: T,
}

/// Run `operation` once and time it.
///
/// The operation is not retried and its error is not caught: on failure the
/// error is returned unchanged and no timing is produced.
///
/// # Errors
///
/// Returns whatever error `operation` fails with.
pub async fn measure<F, Fut, T, E>(operation: F) -> Result<Measured<T>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start_time = Utc::now().trunc_subsecs(3);
    let clock = Instant::now();

    let output = operation().await?;

    let elapsed = clock.elapsed();
    let end_time = chrono::Duration::from_std(elapsed)
        .ok()
        .and_then(|delta| start_time.checked_add_signed(delta))
        .unwrap_or_else(Utc::now);

    let timing = Timing::from_bounds(start_time, end_time);
    tracing::debug!(
        duration_ms = timing.duration_ms,
        duration = %timing.duration_text,
        "Operation measured"
    );

    Ok(Measured { timing, output })
}
