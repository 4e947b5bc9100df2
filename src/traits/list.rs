//! List trait for fetching cursor-paginated collections.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::client::ReplicateClient;
use crate::error::Result;
use crate::pagination::Page;
use crate::stream::{paginate_stream, PageStream};

/// List resources through cursor pagination.
///
/// Implementors only fetch the first page; following pages are reached
/// through the page's `next` cursor by [`paginate`](crate::paginate).
///
/// # Example
///
/// ```ignore
/// use replicate::{ReplicateClient, Model, List};
///
/// let client = ReplicateClient::from_env()?;
///
/// // Fetch the first page
/// let page = Model::list(&client, &()).await?;
///
/// // Fetch every page
/// let all_models = Model::list_all(&client, &()).await?;
/// ```
#[async_trait]
pub trait List: DeserializeOwned + Send + 'static {
    /// Parameters identifying the collection.
    type Query: Send + Sync;

    /// Fetch the first page of the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the page cannot be decoded.
    async fn list(client: &ReplicateClient, query: &Self::Query) -> Result<Page<Self>>;

    /// Fetch the first page and stream every page after it.
    ///
    /// # Errors
    ///
    /// Returns an error if the first page cannot be fetched. Errors on later
    /// pages are yielded by the stream.
    async fn list_stream(
        client: &ReplicateClient,
        query: &Self::Query,
        cancel: CancellationToken,
    ) -> Result<PageStream<Self>> {
        let first = Self::list(client, query).await?;
        Ok(paginate_stream(client.clone(), first, cancel))
    }

    /// Fetch every page of the collection, flattened in server order.
    ///
    /// # Errors
    ///
    /// Returns the first error hit on any page.
    async fn list_all(client: &ReplicateClient, query: &Self::Query) -> Result<Vec<Self>> {
        let pages = Self::list_stream(client, query, CancellationToken::new()).await?;
        let all = pages.collect_all().await?;
        tracing::debug!(items = all.len(), "listed all pages");
        Ok(all)
    }
}
