//! Trait definitions for Replicate operations.
//!
//! Each resource type implements the traits it supports, encapsulating
//! endpoint differences in the implementations. [`Fetch`] is the raw
//! transport capability everything else is built on.

mod fetch;
mod get;
mod list;

pub use fetch::Fetch;
pub use get::Get;
pub use list::List;
