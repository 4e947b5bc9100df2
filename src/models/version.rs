//! Model version records and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::client::ReplicateClient;
use crate::error::Result;
use crate::models::model::ModelRef;
use crate::pagination::Page;
use crate::raw::{self, RawJson};
use crate::traits::{Get, List};

/// One pushed version of a model.
///
/// Keeps the JSON it was decoded from; see [`Model`](crate::Model).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct ModelVersion {
    /// The version ID (a content hash).
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Version of Cog used to build the version.
    #[serde(default)]
    pub cog_version: Option<String>,
    /// OpenAPI schema of the version's inputs and outputs, kept as opaque JSON.
    #[serde(default)]
    pub openapi_schema: Option<serde_json::Value>,

    #[serde(skip)]
    raw_json: RawJson,
}

impl ModelVersion {
    /// The JSON this version was decoded from, if it was decoded.
    pub fn raw_json(&self) -> Option<&RawValue> {
        self.raw_json.as_deref()
    }

    /// First 12 characters of the ID, as shown on replicate.com.
    pub fn short_id(&self) -> &str {
        self.id.get(..12).unwrap_or(&self.id)
    }
}

impl Serialize for ModelVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        raw::emit(&self.raw_json, serializer, |s| ModelVersion::serialize(self, s))
    }
}

impl<'de> Deserialize<'de> for ModelVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let (mut version, raw) =
            raw::capture(deserializer, |json| ModelVersion::deserialize(json))?;
        version.raw_json = Some(raw);
        Ok(version)
    }
}

/// Query type for fetching a single version: the model and the version ID.
pub type VersionQuery = (ModelRef, String);

#[async_trait]
impl Get for ModelVersion {
    type Id = VersionQuery;

    #[tracing::instrument(skip(client))]
    async fn get(client: &ReplicateClient, id: VersionQuery) -> Result<Self> {
        let (model, version_id) = id;
        let path = format!(
            "{}/versions/{}",
            model.path(),
            urlencoding::encode(&version_id)
        );
        client.get_json(&path).await
    }
}

#[async_trait]
impl List for ModelVersion {
    type Query = ModelRef;

    #[tracing::instrument(skip(client))]
    async fn list(client: &ReplicateClient, model: &ModelRef) -> Result<Page<Self>> {
        client.get_json(&format!("{}/versions", model.path())).await
    }
}

// Convenience functions for working with versions

/// Fetch the first page of a model's versions, newest first.
pub async fn list_model_versions(client: &ReplicateClient, model: &ModelRef) -> Result<Page<ModelVersion>> {
    ModelVersion::list(client, model).await
}

/// Get a single version of a model.
pub async fn get_model_version(
    client: &ReplicateClient,
    model: &ModelRef,
    version_id: &str,
) -> Result<ModelVersion> {
    ModelVersion::get(client, (model.clone(), version_id.to_string())).await
}
