//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::ReplicateClient;
use crate::error::Result;

/// Fetch a single resource by ID.
///
/// # Example
///
/// ```ignore
/// use replicate::{ReplicateClient, Model, ModelRef, Get};
///
/// let client = ReplicateClient::from_env()?;
/// let model = Model::get(&client, "stability-ai/sdxl".parse()?).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this resource (e.g. a [`ModelRef`](crate::ModelRef)).
    type Id: Send;

    /// Fetch the resource by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not found, the request fails, or
    /// the response cannot be decoded.
    async fn get(client: &ReplicateClient, id: Self::Id) -> Result<Self>;
}
