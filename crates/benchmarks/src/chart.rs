//! HTML chart rendering of median durations.
//!
//! The page loads Chart.js from a CDN and embeds a bar chart config built
//! from the median rows, one bar per group.

use aggbench_core::MedianResult;
use serde_json::{json, Value};
use std::fs;
use std::io;
use std::path::Path;

/// Default chart file name.
pub const CHART_FILE: &str = "query_performance_chart.html";

/// Chart.js bar chart configuration for `rows`.
pub fn chart_config(rows: &[MedianResult]) -> Value {
    let labels: Vec<String> = rows
        .iter()
        .map(|row| format!("{}\n{}\n{}", row.target, row.database, row.collection))
        .collect();
    let data: Vec<f64> = rows.iter().map(|row| row.median_duration).collect();

    json!({
        "type": "bar",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": "Median Query Duration (seconds)",
                "data": data,
                "backgroundColor": "rgba(75, 192, 192, 0.6)",
                "borderColor": "rgba(75, 192, 192, 1)",
                "borderWidth": 1
            }]
        },
        "options": {
            "responsive": true,
            "scales": {
                "y": {
                    "beginAtZero": true,
                    "title": { "display": true, "text": "Duration (seconds)" }
                }
            },
            "plugins": {
                "title": {
                    "display": true,
                    "text": "Median Query Duration by URI, Database, and Collection"
                },
                "legend": { "display": false }
            }
        }
    })
}

/// Render the full HTML page for `rows`.
pub fn render_chart_html(rows: &[MedianResult]) -> String {
    // `<` is escaped so a label cannot close the script element.
    let config = chart_config(rows).to_string().replace('<', "\\u003c");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Query Performance Chart</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
</head>
<body>
  <canvas id="myChart" width="800" height="400"></canvas>
  <script>
    const ctx = document.getElementById('myChart').getContext('2d');
    new Chart(ctx, {config});
  </script>
</body>
</html>
"#
    )
}

/// Write the chart page for `rows` to `path`.
pub fn write_chart(rows: &[MedianResult], path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_chart_html(rows))
}
