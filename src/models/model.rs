//! Model records and trait implementations.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::client::ReplicateClient;
use crate::error::{ReplicateError, Result};
use crate::models::version::ModelVersion;
use crate::pagination::Page;
use crate::raw::{self, RawJson};
use crate::traits::{Get, List};

/// A model hosted on Replicate.
///
/// Like every record returned by the API, a decoded model keeps the JSON it
/// was decoded from and serializes back to exactly those bytes. Field edits
/// made after decoding are not reflected in its serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Model {
    /// API URL of the model page.
    #[serde(default)]
    pub url: Option<String>,
    /// The user or organization that owns the model.
    pub owner: String,
    /// The model name.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// "public" or "private".
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub paper_url: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    /// Number of times the model has been run.
    #[serde(default)]
    pub run_count: u64,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// Example prediction shown on the model page, kept as opaque JSON.
    #[serde(default)]
    pub default_example: Option<serde_json::Value>,
    /// The most recently pushed version.
    #[serde(default)]
    pub latest_version: Option<ModelVersion>,

    #[serde(skip)]
    raw_json: RawJson,
}

impl Model {
    /// The JSON this model was decoded from, if it was decoded.
    pub fn raw_json(&self) -> Option<&RawValue> {
        self.raw_json.as_deref()
    }

    /// The `owner/name` reference of this model.
    pub fn model_ref(&self) -> ModelRef {
        ModelRef::new(&self.owner, &self.name)
    }

    /// Whether the model is publicly visible.
    pub fn is_public(&self) -> bool {
        self.visibility.as_deref() == Some("public")
    }

    /// List every version of this model.
    pub async fn versions(&self, client: &ReplicateClient) -> Result<Vec<ModelVersion>> {
        ModelVersion::list_all(client, &self.model_ref()).await
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        raw::emit(&self.raw_json, serializer, |s| Model::serialize(self, s))
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let (mut model, raw) = raw::capture(deserializer, |json| Model::deserialize(json))?;
        model.raw_json = Some(raw);
        Ok(model)
    }
}

/// An `owner/name` reference to a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelRef {
    pub owner: String,
    pub name: String,
}

impl ModelRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// API path of the model, relative to the base URL.
    pub(crate) fn path(&self) -> String {
        format!(
            "models/{}/{}",
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.name)
        )
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for ModelRef {
    type Err = ReplicateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(ReplicateError::InvalidArgument(format!(
                "'{s}': expected a model reference like 'owner/name'"
            ))),
        }
    }
}

/// Options for creating a model.
#[derive(Debug, Clone, Serialize)]
pub struct CreateModelOptions {
    /// "public" or "private".
    pub visibility: String,
    /// Hardware SKU to run the model on (e.g. "gpu-a40-large").
    pub hardware: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

impl CreateModelOptions {
    pub fn new(visibility: impl Into<String>, hardware: impl Into<String>) -> Self {
        Self {
            visibility: visibility.into(),
            hardware: hardware.into(),
            description: None,
            github_url: None,
            paper_url: None,
            license_url: None,
            cover_image_url: None,
        }
    }
}

#[async_trait]
impl Get for Model {
    type Id = ModelRef;

    #[tracing::instrument(skip(client))]
    async fn get(client: &ReplicateClient, model: ModelRef) -> Result<Self> {
        client.get_json(&model.path()).await
    }
}

#[async_trait]
impl List for Model {
    /// Public models are listed without parameters.
    type Query = ();

    #[tracing::instrument(skip(client))]
    async fn list(client: &ReplicateClient, _query: &()) -> Result<Page<Self>> {
        client.get_json("models").await
    }
}

// Convenience functions for working with models

/// Fetch the first page of public models.
pub async fn list_models(client: &ReplicateClient) -> Result<Page<Model>> {
    Model::list(client, &()).await
}

/// Get a single model.
///
/// # Example
///
/// ```ignore
/// use replicate::{ReplicateClient, get_model, ModelRef};
///
/// let client = ReplicateClient::from_env()?;
/// let model = get_model(&client, &ModelRef::new("replicate", "hello-world")).await?;
/// println!("Runs: {}", model.run_count);
/// ```
pub async fn get_model(client: &ReplicateClient, model: &ModelRef) -> Result<Model> {
    Model::get(client, model.clone()).await
}

/// Create a new model owned by `model.owner`.
#[tracing::instrument(skip(client, options))]
pub async fn create_model(
    client: &ReplicateClient,
    model: &ModelRef,
    options: &CreateModelOptions,
) -> Result<Model> {
    #[derive(Serialize)]
    struct CreateModelRequest<'a> {
        owner: &'a str,
        name: &'a str,
        #[serde(flatten)]
        options: &'a CreateModelOptions,
    }

    let body = CreateModelRequest {
        owner: &model.owner,
        name: &model.name,
        options,
    };

    client.post_json("models", &body).await
}
