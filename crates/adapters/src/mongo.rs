// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! `AggregationTarget` backed by the MongoDB driver.
//!
//! One [`MongoTarget`] holds one client for the whole session. The client
//! connects lazily, so the first round trip pays for the handshake; the CLI
//! makes that round trip with [`AggregationTarget::server_version`] before
//! any run is timed. Each `run_pipeline` call then covers only the
//! aggregation and the draining of its cursor.

use crate::pipeline::Pipeline;
use crate::target::{AggregationTarget, ConnectionParams, Result, TargetError};
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};
use tracing::debug;

/// Runs pipelines against a MongoDB deployment through a shared client.
#[derive(Debug, Clone)]
pub struct MongoTarget {
    client: Client,
    collection: Collection<Document>,
}

impl MongoTarget {
    /// Build a client for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Driver`] if the connection string is invalid
    /// or cannot be resolved.
    pub async fn connect(params: ConnectionParams) -> Result<Self> {
        let client = Client::with_uri_str(&params.uri).await?;
        let collection = client
            .database(&params.database)
            .collection::<Document>(&params.collection);

        debug!(uri = %params.uri, database = %params.database, collection = %params.collection, "Client created");
        Ok(Self { client, collection })
    }
}

/// Convert each stage from extended JSON to BSON.
fn stage_documents(pipeline: &Pipeline) -> Result<Vec<Document>> {
    pipeline
        .stages()
        .iter()
        .enumerate()
        .map(|(index, stage)| {
            Document::try_from(stage.clone())
                .map_err(|source| TargetError::InvalidStage { index, source })
        })
        .collect()
}

#[async_trait]
impl AggregationTarget for MongoTarget {
    async fn server_version(&self) -> Result<String> {
        let info = self
            .client
            .database("admin")
            .run_command(doc! { "buildInfo": 1 })
            .await?;

        info.get_str("version")
            .map(str::to_string)
            .map_err(|_| TargetError::UnexpectedResponse("buildInfo has no version".to_string()))
    }

    async fn run_pipeline(&self, pipeline: &Pipeline) -> Result<u64> {
        let stages = stage_documents(pipeline)?;
        let mut cursor = self.collection.aggregate(stages).await?;

        let mut documents = 0;
        while cursor.advance().await? {
            documents += 1;
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_stages_convert_extended_json() {
        let pipeline = Pipeline::parse(
            r#"[{"$match": {"_id": {"$oid": "507f1f77bcf86cd799439011"}, "status": "A"}}]"#,
        )
        .unwrap();

        let stages = stage_documents(&pipeline).unwrap();
        let filter = stages[0].get_document("$match").unwrap();

        assert_eq!(
            filter.get_object_id("_id").unwrap(),
            ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap()
        );
        assert_eq!(filter.get_str("status").unwrap(), "A");
    }

    #[test]
    fn test_invalid_stage_reports_index() {
        let pipeline = Pipeline::parse(
            r#"[{"$limit": 1}, {"$match": {"_id": {"$oid": "not-an-object-id"}}}]"#,
        )
        .unwrap();

        let result = stage_documents(&pipeline);
        assert!(matches!(result, Err(TargetError::InvalidStage { index: 1, .. })));
    }

    #[tokio::test]
    async fn test_malformed_uri_is_driver_error() {
        let params = ConnectionParams::new("localhost:27017", "shop", "orders").unwrap();
        let result = MongoTarget::connect(params).await;
        assert!(matches!(result, Err(TargetError::Driver(_))));
    }
}
