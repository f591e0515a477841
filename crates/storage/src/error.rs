// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Storage errors.

use aggbench_core::DurationError;
use thiserror::Error;

/// Errors that can occur while reading or writing samples.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite or connection pool failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Could not prepare the database file location
    #[error("failed to prepare database path: {0}")]
    Io(#[from] std::io::Error),

    /// A stored timestamp did not parse as RFC 3339
    #[error("invalid {column} timestamp '{value}': {source}")]
    InvalidTimestamp {
        /// Column the value was read from
        column: &'static str,
        /// Raw stored text
        value: String,
        /// Parse failure
        #[source]
        source: chrono::ParseError,
    },

    /// A legacy row's `query_duration` text could not be converted
    #[error("row {rowid} has unusable query_duration: {source}")]
    InvalidDurationText {
        /// SQLite rowid of the offending row
        rowid: i64,
        /// Parse failure
        #[source]
        source: DurationError,
    },

    /// A duration does not fit SQLite's signed integer range
    #[error("duration {0} ms exceeds the storable range")]
    DurationOutOfRange(u64),

    /// A stored duration was negative
    #[error("stored duration {0} ms is negative")]
    NegativeDuration(i64),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
