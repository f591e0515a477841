// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Measurement and statistics primitives for aggbench.
//!
//! This crate holds the pieces of the benchmark pipeline that do not touch
//! a database or the network:
//!
//! - [`duration`] - `HH:MM:SS` formatting and parsing of elapsed time
//! - [`timing`] - the harness that times one asynchronous unit of work
//! - [`sample`] - the `BenchmarkSample` and `MedianResult` records
//! - [`stats`] - rank-based median computation over grouped samples
//!
//! # Quick Start
//!
//! ```no_run
//! use aggbench_core::timing::measure;
//!
//! # async fn example() -> Result<(), std::io::Error> {
//! let measured = measure(|| async { Ok::<_, std::io::Error>(42) }).await?;
//! println!("took {}", measured.timing.duration_text);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod duration;
pub mod sample;
pub mod stats;
pub mod timing;

pub use duration::{format_duration, parse_duration_text, DurationError};
pub use sample::{BenchmarkSample, GroupKey, MedianResult, SampleContext};
pub use stats::{median_by_group, rank_median, SampleStats};
pub use timing::{measure, Measured, Timing};
