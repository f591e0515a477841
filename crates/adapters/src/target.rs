// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The database collaborator the run loop benchmarks against.

use crate::pipeline::Pipeline;
use aggbench_core::GroupKey;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by aggregation targets.
#[derive(Debug, Error)]
pub enum TargetError {
    /// A required connection parameter was empty
    #[error("{0} is required")]
    MissingParameter(&'static str),

    /// The driver failed to connect or run a command
    #[error("database error: {0}")]
    Driver(#[from] mongodb::error::Error),

    /// A pipeline stage is not valid extended JSON
    #[error("stage {index} is not valid extended JSON: {source}")]
    InvalidStage {
        /// 0-based stage position
        index: usize,
        /// Conversion failure
        #[source]
        source: mongodb::bson::extjson::de::Error,
    },

    /// The server's reply lacked an expected field
    #[error("unexpected server response: {0}")]
    UnexpectedResponse(String),
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;

/// Connection endpoint and namespace a benchmark runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Connection string, e.g. `mongodb://localhost:27017`
    pub uri: String,
    /// Database name
    pub database: String,
    /// Collection name
    pub collection: String,
}

impl ConnectionParams {
    /// Create connection parameters, rejecting empty values.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::MissingParameter`] naming the first empty field.
    pub fn new(
        uri: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Result<Self> {
        let params = Self {
            uri: uri.into().trim().to_string(),
            database: database.into().trim().to_string(),
            collection: collection.into().trim().to_string(),
        };

        if params.uri.is_empty() {
            return Err(TargetError::MissingParameter("connection URI"));
        }
        if params.database.is_empty() {
            return Err(TargetError::MissingParameter("database name"));
        }
        if params.collection.is_empty() {
            return Err(TargetError::MissingParameter("collection name"));
        }
        Ok(params)
    }

    /// Group key samples against these parameters are recorded under.
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(&self.uri, &self.database, &self.collection)
    }
}

/// A database that can run an aggregation pipeline.
///
/// The run loop treats both operations as opaque: it only awaits them and
/// times `run_pipeline`.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait AggregationTarget: Send + Sync {
    /// Version string of the server, recorded with every sample.
    async fn server_version(&self) -> Result<String>;

    /// Run the pipeline to completion and return the number of documents.
    async fn run_pipeline(&self, pipeline: &Pipeline) -> Result<u64>;
}
