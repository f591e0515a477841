//! Markdown output generation.
//!
//! This module renders median rows and single-session summaries as
//! markdown for operators and CI logs.

use crate::result::RunSummary;
use aggbench_core::{format_duration, MedianResult};
use std::fmt::{self, Write};

/// Generate a markdown table of median durations per group.
pub fn generate_summary(rows: &[MedianResult]) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail.
    let _ = write_summary(&mut output, rows);
    output
}

fn write_summary(output: &mut String, rows: &[MedianResult]) -> fmt::Result {
    writeln!(output, "# Query Performance Summary")?;
    writeln!(output)?;
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339())?;
    writeln!(output)?;
    writeln!(output, "| Target | Database | Collection | Median (s) | Median |")?;
    writeln!(output, "|--------|----------|------------|------------|--------|")?;

    for row in rows {
        writeln!(
            output,
            "| {} | {} | {} | {:.3} | {} |",
            row.target,
            row.database,
            row.collection,
            row.median_duration,
            row.median_duration_text()
        )?;
    }

    writeln!(output)?;
    writeln!(output, "---")?;
    writeln!(output, "Total groups: {}", rows.len())
}

/// Generate a per-run report for one benchmark session.
pub fn generate_run_report(summary: &RunSummary) -> String {
    let mut output = String::new();
    let _ = write_run_report(&mut output, summary);
    output
}

fn write_run_report(output: &mut String, summary: &RunSummary) -> fmt::Result {
    writeln!(output, "## {}", summary.key)?;
    writeln!(output)?;
    writeln!(output, "**Server version:** {}", summary.server_version)?;
    writeln!(output, "**Completed:** {}", summary.completed_at.to_rfc3339())?;
    writeln!(output)?;
    writeln!(output, "| Run | Start | Duration | ms |")?;
    writeln!(output, "|-----|-------|----------|----|")?;

    for (index, sample) in summary.samples.iter().enumerate() {
        writeln!(
            output,
            "| {} | {} | {} | {} |",
            index + 1,
            sample.start_time.format("%Y-%m-%d %H:%M:%S%.3f UTC"),
            sample.duration_text,
            sample.duration_ms
        )?;
    }

    if let Some(stats) = &summary.stats {
        writeln!(output)?;
        writeln!(
            output,
            "Median {} ({:.1} ms), min {} ms, max {} ms over {} runs",
            format_duration(stats.median_ms as u64),
            stats.median_ms,
            stats.min_ms,
            stats.max_ms,
            stats.count
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggbench_core::{BenchmarkSample, GroupKey, SampleContext, Timing};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_summary_lists_every_group() {
        let rows = vec![
            MedianResult {
                target: "a".into(),
                database: "d".into(),
                collection: "c".into(),
                median_duration: 61.0,
            },
            MedianResult {
                target: "b".into(),
                database: "d".into(),
                collection: "c".into(),
                median_duration: 0.25,
            },
        ];

        let summary = generate_summary(&rows);
        assert!(summary.contains("| a | d | c | 61.000 | 00:01:01 |"));
        assert!(summary.contains("| b | d | c | 0.250 | 00:00:00 |"));
        assert!(summary.contains("Total groups: 2"));
    }

    #[test]
    fn test_run_report_includes_stats() {
        let key = GroupKey::new("mongodb://a", "shop", "orders");
        let context = SampleContext::new(key.clone(), "7.0.4");
        let start = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        let samples = [1_000, 3_000]
            .iter()
            .map(|ms| {
                let end = start + chrono::Duration::milliseconds(*ms);
                BenchmarkSample::new(&context, &Timing::from_bounds(start, end))
            })
            .collect();

        let report = generate_run_report(&RunSummary::new(key, "7.0.4", samples));
        assert!(report.starts_with("## mongodb://a/shop.orders"));
        assert!(report.contains("| 2 | 2025-05-01 10:00:00.000 UTC | 00:00:03 | 3000 |"));
        assert!(report.contains("Median 00:00:02 (2000.0 ms), min 1000 ms, max 3000 ms over 2 runs"));
    }
}
