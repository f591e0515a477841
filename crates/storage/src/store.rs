// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! SQLite-backed sample store.
//!
//! # Example
//!
//! ```no_run
//! use aggbench_storage::SampleStore;
//! use std::path::Path;
//!
//! # async fn example() -> aggbench_storage::Result<()> {
//! let store = SampleStore::open(Path::new("performance.db")).await?;
//! store.initialize().await?;
//!
//! for row in store.query_median_durations().await? {
//!     println!("{}: {:.3}s", row.group_key(), row.median_duration);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, StoreError};
use crate::{median, schema};
use aggbench_core::BenchmarkSample;
use aggbench_core::MedianResult;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Handle to the persistent sample table.
///
/// Inserts are single autocommitted statements, so every sample is durable
/// once [`SampleStore::insert`] returns.
#[derive(Debug, Clone)]
pub struct SampleStore {
    pool: SqlitePool,
}

/// Serialize a timestamp the way it is stored: RFC 3339, milliseconds, `Z`.
pub fn timestamp_text(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(row: &SqliteRow, column: &'static str) -> Result<DateTime<Utc>> {
    let value: String = row.try_get(column)?;
    DateTime::parse_from_rfc3339(&value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| StoreError::InvalidTimestamp {
            column,
            value,
            source,
        })
}

impl SampleStore {
    /// Open (creating if missing) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true),
            )
            .await?;

        debug!(path = %path.display(), "Opened sample store");
        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// The pool holds exactly one connection that never expires, since each
    /// SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;
        Ok(Self { pool })
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Ensure the sample table exists. Idempotent and non-destructive.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be created or a legacy row
    /// cannot be upgraded.
    pub async fn initialize(&self) -> Result<()> {
        schema::ensure_schema(&self.pool).await
    }

    /// Append one sample.
    ///
    /// No deduplication or validation is done beyond the type conversions
    /// the table requires.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails; it is never swallowed.
    pub async fn insert(&self, sample: &BenchmarkSample) -> Result<()> {
        let duration_ms = i64::try_from(sample.duration_ms)
            .map_err(|_| StoreError::DurationOutOfRange(sample.duration_ms))?;

        sqlx::query(
            r#"
            INSERT INTO query_performance
                (uri, "database", collection, start_time, end_time,
                 query_duration, mongod_version, duration_ms)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&sample.target)
        .bind(&sample.database)
        .bind(&sample.collection)
        .bind(timestamp_text(&sample.start_time))
        .bind(timestamp_text(&sample.end_time))
        .bind(&sample.duration_text)
        .bind(&sample.server_version)
        .bind(duration_ms)
        .execute(&self.pool)
        .await?;

        debug!(
            uri = %sample.target,
            database = %sample.database,
            collection = %sample.collection,
            duration_ms = sample.duration_ms,
            "Sample inserted"
        );
        Ok(())
    }

    /// Read every stored sample in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row holds malformed values.
    pub async fn samples(&self) -> Result<Vec<BenchmarkSample>> {
        let rows = sqlx::query(
            r#"
            SELECT uri, "database", collection, start_time, end_time,
                   query_duration, mongod_version, duration_ms
            FROM query_performance
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(sample_from_row).collect()
    }

    /// Number of stored samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM query_performance")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Median duration per `(target, database, collection)` group.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn query_median_durations(&self) -> Result<Vec<MedianResult>> {
        median::query_median_durations(&self.pool).await
    }

    /// Close the pool, waiting for in-flight statements.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn sample_from_row(row: &SqliteRow) -> Result<BenchmarkSample> {
    let duration_ms: i64 = row.try_get("duration_ms")?;
    let duration_ms =
        u64::try_from(duration_ms).map_err(|_| StoreError::NegativeDuration(duration_ms))?;

    Ok(BenchmarkSample {
        target: row.try_get("uri")?,
        database: row.try_get("database")?,
        collection: row.try_get("collection")?,
        start_time: parse_timestamp(row, "start_time")?,
        end_time: parse_timestamp(row, "end_time")?,
        duration_ms,
        duration_text: row.try_get("query_duration")?,
        server_version: row.try_get("mongod_version")?,
    })
}
