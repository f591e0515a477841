// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Table definition and in-place upgrade of older databases.
//!
//! Databases written before `duration_ms` existed only carry the formatted
//! `query_duration` text. [`ensure_schema`] adds the numeric column and
//! backfills it from the text in one transaction, so aggregation never has
//! to order or average `HH:MM:SS` strings.

use crate::error::{Result, StoreError};
use aggbench_core::parse_duration_text;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Name of the sample table.
pub const TABLE: &str = "query_performance";

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS query_performance (
        uri TEXT,
        "database" TEXT,
        collection TEXT,
        start_time TEXT,
        end_time TEXT,
        query_duration TEXT,
        mongod_version TEXT,
        duration_ms INTEGER
    )
"#;

/// Create the sample table if missing and upgrade legacy layouts.
///
/// Safe to call on every start; existing rows are preserved.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_TABLE).execute(pool).await?;

    let mut tx = pool.begin().await?;

    let columns = sqlx::query("SELECT name FROM pragma_table_info('query_performance')")
        .fetch_all(&mut *tx)
        .await?;
    let has_duration_ms = columns
        .iter()
        .filter_map(|row| row.try_get::<String, _>("name").ok())
        .any(|name| name == "duration_ms");

    if !has_duration_ms {
        info!(table = TABLE, "Adding duration_ms column to legacy table");
        sqlx::query("ALTER TABLE query_performance ADD COLUMN duration_ms INTEGER")
            .execute(&mut *tx)
            .await?;
    }

    let pending = sqlx::query(
        "SELECT rowid, query_duration FROM query_performance WHERE duration_ms IS NULL",
    )
    .fetch_all(&mut *tx)
    .await?;

    for row in &pending {
        let rowid: i64 = row.try_get("rowid")?;
        let text: Option<String> = row.try_get("query_duration")?;
        let duration_ms = parse_duration_text(text.as_deref().unwrap_or_default())
            .map_err(|source| StoreError::InvalidDurationText { rowid, source })?;
        let duration_ms =
            i64::try_from(duration_ms).map_err(|_| StoreError::DurationOutOfRange(duration_ms))?;

        sqlx::query("UPDATE query_performance SET duration_ms = ? WHERE rowid = ?")
            .bind(duration_ms)
            .bind(rowid)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    if !pending.is_empty() {
        info!(rows = pending.len(), "Backfilled numeric durations");
    }
    Ok(())
}
