// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Persistent sample storage for aggbench.
//!
//! Samples live in a single SQLite table, `query_performance`, one row per
//! benchmark run. The store is append-only: rows are never updated or
//! deleted here. Medians are computed on demand by a windowed query over
//! the numeric `duration_ms` column.
//!
//! # Modules
//!
//! - [`schema`] - table definition and legacy upgrade
//! - [`store`] - the [`SampleStore`] handle
//! - [`median`] - the grouped median query
//! - [`error`] - storage error type

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod median;
pub mod schema;
pub mod store;

pub use error::{Result, StoreError};
pub use store::SampleStore;
