//! I/O operations for median reports.
//!
//! This module writes and reads the median rows computed by the sample
//! store, as JSON and as a markdown summary.

use crate::markdown;
use aggbench_core::MedianResult;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default report directory path.
pub const OUTPUT_DIR: &str = "benchmarks/output";

/// File name of the JSON median rows.
pub const MEDIANS_FILE: &str = "medians.json";

/// File name of the markdown summary.
pub const SUMMARY_FILE: &str = "summary.md";

/// Paths written by [`write_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// JSON median rows.
    pub medians: PathBuf,
    /// Markdown summary.
    pub summary: PathBuf,
}

/// Write median rows to a JSON file.
pub fn write_medians_json(rows: &[MedianResult], path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(rows)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

/// Read median rows from a JSON file.
pub fn read_medians_json(path: impl AsRef<Path>) -> io::Result<Vec<MedianResult>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Write the JSON rows and markdown summary into `dir`, creating it.
pub fn write_report(rows: &[MedianResult], dir: impl AsRef<Path>) -> io::Result<ReportPaths> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let paths = ReportPaths {
        medians: dir.join(MEDIANS_FILE),
        summary: dir.join(SUMMARY_FILE),
    };
    write_medians_json(rows, &paths.medians)?;
    fs::write(&paths.summary, markdown::generate_summary(rows))?;

    Ok(paths)
}
