//! Replicate API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on resource types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{ReplicateError, Result};
use crate::traits::Fetch;

const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";
const USER_AGENT: &str = concat!("replicate-rs/", env!("CARGO_PKG_VERSION"));

/// Low-level Replicate API client.
///
/// Handles authentication and HTTP requests, and is the [`Fetch`]
/// implementation used for pagination. Resource-specific operations are
/// implemented via the `Get` and `List` traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use replicate::ReplicateClient;
///
/// # fn example() -> replicate::Result<()> {
/// // Create from environment variables
/// let client = ReplicateClient::from_env()?;
///
/// // Or configure manually
/// let client = ReplicateClient::new("r8_your-token", "https://api.replicate.com/v1")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ReplicateClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
}

impl std::fmt::Debug for ReplicateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicateClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ReplicateClient {
    /// Create a client from environment variables.
    ///
    /// Uses `REPLICATE_API_TOKEN` for authentication and optionally
    /// `REPLICATE_BASE_URL` for the base URL (defaults to
    /// `https://api.replicate.com/v1`).
    ///
    /// # Errors
    ///
    /// Returns an error if `REPLICATE_API_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("REPLICATE_API_TOKEN").map_err(|_| {
            ReplicateError::ConfigMissing(
                "REPLICATE_API_TOKEN environment variable not set".to_string(),
            )
        })?;

        let base_url =
            env::var("REPLICATE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self::new(&token, &base_url)
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with / so joins keep its path
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(ReplicateError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request target against the base URL.
    ///
    /// Absolute URLs (such as page cursors) are used as-is. Anything else is
    /// treated as a path under the base URL.
    pub fn resolve(&self, target: &str) -> Result<Url> {
        match Url::parse(target) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(self.base_url.join(target.trim_start_matches('/'))?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Make a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.request(Method::GET, path, None).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Make a POST request with a JSON body and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.request(Method::POST, path, Some(&body)).await?;
        Ok(serde_json::from_slice(&response)?)
    }

    /// Send a request and return the raw response body.
    #[tracing::instrument(skip(self, body))]
    pub async fn request(
        &self,
        method: Method,
        target: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Bytes> {
        let url = self.resolve(target)?;

        let mut request = self.http.request(method, url).bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ReplicateError::HttpError)?;
        let response = Self::check_response(response).await?;

        response.bytes().await.map_err(ReplicateError::HttpError)
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(ReplicateError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(ReplicateError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        // Replicate problem documents carry `detail`; older endpoints use others
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            for key in ["detail", "title", "message", "error"] {
                if let Some(msg) = json.get(key).and_then(|m| m.as_str()) {
                    return msg.to_string();
                }
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}

#[async_trait]
impl Fetch for ReplicateClient {
    async fn fetch(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Bytes> {
        self.request(method, url, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = ReplicateClient::new("r8_secret", "https://api.replicate.com/v1").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("ReplicateClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("r8_secret"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = ReplicateClient::new("token", "https://api.replicate.com/v1").unwrap();
        let client2 = ReplicateClient::new("token", "https://api.replicate.com/v1/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_resolve_keeps_base_path() {
        let client = ReplicateClient::new("token", "https://api.replicate.com/v1").unwrap();
        assert_eq!(
            client.resolve("/models").unwrap().as_str(),
            "https://api.replicate.com/v1/models"
        );
        assert_eq!(
            client.resolve("models/a/b/versions").unwrap().as_str(),
            "https://api.replicate.com/v1/models/a/b/versions"
        );
    }

    #[test]
    fn test_resolve_passes_absolute_cursor_through() {
        let client = ReplicateClient::new("token", "https://api.replicate.com/v1").unwrap();
        let cursor = "https://api.replicate.com/v1/models?cursor=cD0yMDIz";
        assert_eq!(client.resolve(cursor).unwrap().as_str(), cursor);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ReplicateClient::new("token", "not a url").unwrap_err();
        assert!(matches!(err, ReplicateError::UrlError(_)));
    }
}
