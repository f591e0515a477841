// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Aggregation pipeline parsing.
//!
//! Pipelines are accepted as strict JSON. Text copied out of a shell or a
//! driver snippet usually is not: keys are bare (`$match: {...}`) and
//! strings are single-quoted. When strict parsing fails the text is
//! normalized once and parsed again.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Bare object keys, including `$`-prefixed operators and dotted paths.
static BARE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([{,]\s*)(\$?[A-Za-z_][\w.]*)\s*:").expect("bare key pattern is valid")
});

/// Errors that can occur while obtaining or parsing a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source could not be read
    #[error("failed to read pipeline: {0}")]
    Read(#[from] std::io::Error),

    /// Source produced no text
    #[error("pipeline input is empty")]
    Empty,

    /// Text is not JSON, even after normalization
    #[error("invalid pipeline JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level value is not an array
    #[error("pipeline must be an array of stages")]
    NotAnArray,

    /// A stage is not an object
    #[error("pipeline stage {index} is not an object")]
    StageNotObject {
        /// Zero-based stage position
        index: usize,
    },

    /// No clipboard reader for this platform
    #[error("clipboard access is not supported on {0}")]
    ClipboardUnsupported(&'static str),

    /// Clipboard command exited unsuccessfully
    #[error("clipboard command '{command}' failed: {stderr}")]
    ClipboardCommand {
        /// Command that was run
        command: String,
        /// Captured standard error
        stderr: String,
    },
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// A parsed, array-shaped aggregation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    stages: Vec<Map<String, Value>>,
}

impl Pipeline {
    /// Parse pipeline text, normalizing shell-style syntax if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty, is not JSON after
    /// normalization, or is not an array of objects.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::Empty);
        }

        let value = match serde_json::from_str::<Value>(text) {
            Ok(value) => value,
            Err(strict_err) => {
                let normalized = normalize(text);
                tracing::debug!(%normalized, "Strict JSON parse failed, retrying normalized text");
                serde_json::from_str::<Value>(&normalized).map_err(|_| strict_err)?
            }
        };

        Self::from_value(value)
    }

    /// Build a pipeline from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not an array of objects.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(PipelineError::NotAnArray);
        };

        let stages = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(stage) => Ok(stage),
                _ => Err(PipelineError::StageNotObject { index }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { stages })
    }

    /// Pipeline stages in order.
    pub fn stages(&self) -> &[Map<String, Value>] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The pipeline as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Array(self.stages.iter().cloned().map(Value::Object).collect())
    }

    /// Indented JSON text for echoing back to the operator.
    pub fn to_pretty(&self) -> String {
        let value = self.to_value();
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }
}

/// Quote bare keys and convert single-quoted strings to double quotes.
fn normalize(text: &str) -> String {
    let double_quoted = text.replace('\'', "\"");
    BARE_KEY
        .replace_all(&double_quoted, r#"${1}"${2}":"#)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_strict_json() {
        let pipeline = Pipeline::parse(r#"[{"$match": {"status": "A"}}, {"$limit": 5}]"#).unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.stages()[1]["$limit"], json!(5));
    }

    #[test]
    fn test_parse_shell_syntax() {
        let text = "[{$match: {status: 'A'}}, {$group: {_id: '$cust_id', total: {$sum: '$amount'}}}]";
        let pipeline = Pipeline::parse(text).unwrap();

        assert_eq!(
            pipeline.to_value(),
            json!([
                {"$match": {"status": "A"}},
                {"$group": {"_id": "$cust_id", "total": {"$sum": "$amount"}}}
            ])
        );
    }

    #[test]
    fn test_parse_dotted_keys() {
        let pipeline = Pipeline::parse("[{$match: {address.city: 'Oslo'}}]").unwrap();
        assert_eq!(pipeline.stages()[0]["$match"]["address.city"], json!("Oslo"));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            Pipeline::parse(r#"{"$match": {}}"#),
            Err(PipelineError::NotAnArray)
        ));
    }

    #[test]
    fn test_parse_rejects_non_object_stage() {
        assert!(matches!(
            Pipeline::parse(r#"[{"$match": {}}, 3]"#),
            Err(PipelineError::StageNotObject { index: 1 })
        ));
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert!(matches!(Pipeline::parse("   "), Err(PipelineError::Empty)));
        assert!(matches!(Pipeline::parse("[{oops"), Err(PipelineError::Json(_))));
    }

    #[test]
    fn test_pretty_output_round_trips() {
        let pipeline = Pipeline::parse(r#"[{"$count": "n"}]"#).unwrap();
        assert_eq!(Pipeline::parse(&pipeline.to_pretty()).unwrap(), pipeline);
    }
}
