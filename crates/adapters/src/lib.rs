// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Collaborator adapters for aggbench.
//!
//! The measurement core treats the pipeline and the database as opaque.
//! This crate supplies those collaborators:
//!
//! - [`pipeline`] - parsing of aggregation pipeline text into stages
//! - [`source`] - where pipeline text comes from (file, stdin, clipboard)
//! - [`target`] - the [`AggregationTarget`] trait the run loop drives
//! - [`mongo`] - an `AggregationTarget` backed by the MongoDB driver
//!
//! # Example
//!
//! ```no_run
//! use aggbench_adapters::{AggregationTarget, ConnectionParams, MongoTarget, Pipeline, PipelineSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let text = PipelineSource::Stdin.read().await?;
//! let pipeline = Pipeline::parse(&text)?;
//! let params = ConnectionParams::new("mongodb://localhost:27017", "shop", "orders")?;
//! let target = MongoTarget::connect(params).await?;
//! let docs = target.run_pipeline(&pipeline).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod mongo;
pub mod pipeline;
pub mod source;
pub mod target;

pub use mongo::MongoTarget;
pub use pipeline::{Pipeline, PipelineError};
pub use source::PipelineSource;
pub use target::{AggregationTarget, ConnectionParams, TargetError};

#[cfg(any(test, feature = "mock"))]
pub use target::MockAggregationTarget;
