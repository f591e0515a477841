//! Layered configuration.
//!
//! Values come from built-in defaults, then an optional config file
//! (`aggbench.toml` in the working directory, or an explicit path), then
//! `AGGBENCH_*` environment variables. Command-line flags override the
//! result.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "AGGBENCH";

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// SQLite database holding the samples.
    pub database_path: PathBuf,
    /// Default number of runs when `-n` is not given.
    pub runs: i64,
    /// Where `charts` writes its page.
    pub chart_path: PathBuf,
    /// Where `report` writes its files.
    pub report_dir: PathBuf,
}

impl Settings {
    /// Load settings. An explicit `path` must exist; the implicit
    /// `aggbench.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("aggbench").required(false),
        };

        Config::builder()
            .set_default("database_path", "performance.db")?
            .set_default("runs", 1_i64)?
            .set_default("chart_path", aggbench_benchmarks::chart::CHART_FILE)?
            .set_default("report_dir", aggbench_benchmarks::io::OUTPUT_DIR)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("aggbench-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "database_path = \"data/bench.db\"\nruns = 5\n").unwrap();

        let settings = Settings::load(Some(path.as_path())).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(settings.database_path, PathBuf::from("data/bench.db"));
        assert_eq!(settings.runs, 5);
        assert_eq!(settings.chart_path, PathBuf::from("query_performance_chart.html"));
        assert_eq!(settings.report_dir, PathBuf::from("benchmarks/output"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let path = std::env::temp_dir().join(format!("aggbench-missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(Settings::load(Some(path.as_path())).is_err());
    }
}
