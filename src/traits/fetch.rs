//! Fetch trait for raw HTTP operations.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

use crate::error::Result;

/// Perform a raw request and return the response body.
///
/// This is the capability the pagination streamer consumes. It is
/// implemented by [`ReplicateClient`](crate::ReplicateClient); tests and
/// alternative transports can supply their own.
///
/// `url` is either an absolute URL or a path relative to the API base. Page
/// cursors are passed through exactly as the server returned them.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Send `method` to `url` with an optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the server responds
    /// with a non-success status.
    async fn fetch(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Bytes>;
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for std::sync::Arc<F> {
    async fn fetch(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Bytes> {
        (**self).fetch(method, url, body).await
    }
}
