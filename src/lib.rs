//! Replicate API client library.
//!
//! A Rust library for the Replicate HTTP API, built around two pieces:
//!
//! - [`Page`], the envelope of every listing response. A decoded page keeps
//!   the exact JSON it came from and serializes back to it byte for byte.
//! - [`paginate`], which walks a listing's `next` cursors on a background
//!   task and delivers each page's items on a channel, with failures on a
//!   second channel.
//!
//! # Quick Start
//!
//! ```no_run
//! use replicate::{List, Model, ModelRef, ModelVersion, ReplicateClient};
//!
//! #[tokio::main]
//! async fn main() -> replicate::Result<()> {
//!     // Create client from environment variables
//!     let client = ReplicateClient::from_env()?;
//!
//!     // First page of public models
//!     let page = Model::list(&client, &()).await?;
//!     println!("First page has {} models", page.len());
//!
//!     // Every version of one model, across all pages
//!     let hello_world = ModelRef::new("replicate", "hello-world");
//!     let versions = ModelVersion::list_all(&client, &hello_world).await?;
//!     println!("Found {} versions", versions.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Streaming pages
//!
//! ```no_run
//! use replicate::{paginate, CancellationToken, List, Model, ReplicateClient};
//!
//! # async fn example() -> replicate::Result<()> {
//! let client = ReplicateClient::from_env()?;
//! let first = Model::list(&client, &()).await?;
//!
//! let (mut batches, mut errors) = paginate(client.clone(), first, CancellationToken::new());
//! loop {
//!     tokio::select! {
//!         Some(batch) = batches.recv() => println!("{} models", batch.len()),
//!         Some(err) = errors.recv() => return Err(err),
//!         else => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`PageStream`] wraps the two channels when a single stream of
//! `Result<Vec<T>>` is more convenient.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `REPLICATE_API_TOKEN` (required) - Your Replicate API token
//! - `REPLICATE_BASE_URL` (optional) - Base URL (defaults to `https://api.replicate.com/v1`)

pub mod cli;
mod client;
mod error;
mod models;
pub mod output;
mod pagination;
mod raw;
mod stream;
mod traits;

// Re-export core types
pub use client::ReplicateClient;
pub use error::{ReplicateError, Result};
pub use pagination::Page;
pub use stream::{paginate, paginate_stream, PageStream};
pub use tokio_util::sync::CancellationToken;

// Re-export traits
pub use traits::{Fetch, Get, List};

// Re-export models
pub use models::{CreateModelOptions, Model, ModelRef, ModelVersion, VersionQuery};

// Re-export convenience functions
pub use models::{create_model, get_model, list_models};
pub use models::{get_model_version, list_model_versions};
