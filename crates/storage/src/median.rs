// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Grouped median query.
//!
//! Rows are partitioned by `(uri, database, collection)` and ranked by
//! numeric `duration_ms`, with `rowid` breaking ties so ranks are purely
//! positional. The rows at ranks `(count + 1) / 2` and `(count + 2) / 2`
//! are averaged, which selects one middle row for odd counts and the two
//! central rows for even counts. Empty groups never appear.

use crate::error::Result;
use aggbench_core::MedianResult;
use sqlx::{Row, SqlitePool};

const MEDIAN_QUERY: &str = r#"
    SELECT uri, "database", collection,
           AVG(duration_ms) / 1000.0 AS median_duration
    FROM (
        SELECT uri, "database", collection, duration_ms,
               ROW_NUMBER() OVER (
                   PARTITION BY uri, "database", collection
                   ORDER BY duration_ms, rowid
               ) AS row_num,
               COUNT(*) OVER (
                   PARTITION BY uri, "database", collection
               ) AS row_count
        FROM query_performance
        WHERE duration_ms IS NOT NULL
    ) ranked
    WHERE row_num IN ((row_count + 1) / 2, (row_count + 2) / 2)
    GROUP BY uri, "database", collection
    ORDER BY uri, "database", collection
"#;

/// Run the grouped median query. Medians are reported in seconds.
pub async fn query_median_durations(pool: &SqlitePool) -> Result<Vec<MedianResult>> {
    let rows = sqlx::query(MEDIAN_QUERY).fetch_all(pool).await?;

    rows.iter()
        .map(|row| {
            Ok(MedianResult {
                target: row.try_get("uri")?,
                database: row.try_get("database")?,
                collection: row.try_get("collection")?,
                median_duration: row.try_get("median_duration")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::SampleStore;
    use aggbench_core::{median_by_group, BenchmarkSample, GroupKey, SampleContext, Timing};
    use chrono::{TimeZone, Utc};

    fn sample(key: &GroupKey, duration_ms: u64) -> BenchmarkSample {
        let start = Utc.with_ymd_and_hms(2025, 2, 14, 8, 0, 0).unwrap();
        let end = start + chrono::Duration::milliseconds(duration_ms as i64);
        let context = SampleContext::new(key.clone(), "7.0.0");
        BenchmarkSample::new(&context, &Timing::from_bounds(start, end))
    }

    async fn store_with(samples: &[BenchmarkSample]) -> SampleStore {
        let store = SampleStore::in_memory().await.unwrap();
        store.initialize().await.unwrap();
        for s in samples {
            store.insert(s).await.unwrap();
        }
        store
    }

    fn key() -> GroupKey {
        GroupKey::new("mongodb://localhost:27017", "shop", "orders")
    }

    #[tokio::test]
    async fn test_median_odd_group() {
        let k = key();
        let store = store_with(&[sample(&k, 3_000), sample(&k, 1_000), sample(&k, 2_000)]).await;

        let rows = store.query_median_durations().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group_key(), k);
        assert_eq!(rows[0].median_duration, 2.0);
    }

    #[tokio::test]
    async fn test_median_even_group() {
        let k = key();
        let samples: Vec<_> = [4_000, 2_000, 1_000, 3_000]
            .iter()
            .map(|ms| sample(&k, *ms))
            .collect();
        let store = store_with(&samples).await;

        let rows = store.query_median_durations().await.unwrap();
        assert_eq!(rows[0].median_duration, 2.5);
    }

    #[tokio::test]
    async fn test_median_singleton_group() {
        let k = key();
        let store = store_with(&[sample(&k, 5_000)]).await;

        let rows = store.query_median_durations().await.unwrap();
        assert_eq!(rows[0].median_duration, 5.0);
    }

    #[tokio::test]
    async fn test_median_empty_store() {
        let store = store_with(&[]).await;
        assert!(store.query_median_durations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_median_orders_numerically_not_lexically() {
        // Lexically "100:00:00" sorts before "20:00:00".
        let k = key();
        let store = store_with(&[
            sample(&k, 360_000_000),
            sample(&k, 72_000_000),
            sample(&k, 9_000),
        ])
        .await;

        let rows = store.query_median_durations().await.unwrap();
        assert_eq!(rows[0].median_duration, 72_000.0);
    }

    #[tokio::test]
    async fn test_median_groups_are_isolated() {
        let a = key();
        let b = GroupKey::new("mongodb://replica:27017", "shop", "orders");
        let c = GroupKey::new("mongodb://localhost:27017", "shop", "invoices");

        let mut samples = vec![
            sample(&a, 1_000),
            sample(&a, 2_000),
            sample(&a, 3_000),
            sample(&b, 10_000),
            sample(&c, 7_000),
        ];
        let store = store_with(&samples).await;
        let before = store.query_median_durations().await.unwrap();

        let extra = sample(&b, 20_000);
        store.insert(&extra).await.unwrap();
        samples.push(extra);
        let after = store.query_median_durations().await.unwrap();

        let find = |rows: &[aggbench_core::MedianResult], k: &GroupKey| {
            rows.iter()
                .find(|r| &r.group_key() == k)
                .map(|r| r.median_duration)
        };
        assert_eq!(find(before.as_slice(), &a), Some(2.0));
        assert_eq!(find(after.as_slice(), &a), Some(2.0));
        assert_eq!(find(after.as_slice(), &c), Some(7.0));
        assert_eq!(find(before.as_slice(), &b), Some(10.0));
        assert_eq!(find(after.as_slice(), &b), Some(15.0));

        // The in-memory aggregator applies the same rank rule.
        let mut expected = median_by_group(&samples);
        let mut actual = after;
        let by_key = |r: &aggbench_core::MedianResult| r.group_key();
        expected.sort_by_key(by_key);
        actual.sort_by_key(by_key);
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_median_with_duplicate_durations_is_deterministic() {
        let k = key();
        let store = store_with(&[
            sample(&k, 2_000),
            sample(&k, 2_000),
            sample(&k, 2_000),
            sample(&k, 8_000),
        ])
        .await;

        let first = store.query_median_durations().await.unwrap();
        let second = store.query_median_durations().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].median_duration, 2.0);
    }
}
