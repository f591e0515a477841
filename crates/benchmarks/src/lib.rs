//! Benchmark sessions, reports and charts for aggbench.
//!
//! This crate ties the measurement core to its collaborators: it runs a
//! pipeline against an [`AggregationTarget`](aggbench_adapters::AggregationTarget)
//! a configured number of times, stores every sample, and renders the
//! stored medians for people to read.
//!
//! # Quick Start
//!
//! ```no_run
//! use aggbench_benchmarks::{RunContext, RunCount, Runner};
//! use aggbench_adapters::{AggregationTarget, ConnectionParams, MongoTarget, Pipeline};
//! use aggbench_storage::SampleStore;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SampleStore::open(Path::new("performance.db")).await?;
//! store.initialize().await?;
//!
//! let params = ConnectionParams::new("mongodb://localhost:27017", "shop", "orders")?;
//! let target = MongoTarget::connect(params.clone()).await?;
//! let pipeline = Pipeline::parse(r#"[{"$match": {"status": "A"}}]"#)?;
//!
//! let version = target.server_version().await?;
//! let context = RunContext::new(params.group_key(), version, RunCount::from_requested(5));
//! let summary = Runner::new(&store, &target).run(&context, &pipeline).await?;
//! println!("{} runs recorded", summary.runs());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`runner`] - the sequential run loop
//! - [`result`] - the `RunSummary` struct
//! - [`io`] - JSON and markdown report files
//! - [`markdown`] - markdown report generation
//! - [`chart`] - HTML bar chart of medians

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod chart;
pub mod io;
pub mod markdown;
pub mod result;
pub mod runner;

pub use result::RunSummary;
pub use runner::{RunContext, RunCount, RunError, Runner};
