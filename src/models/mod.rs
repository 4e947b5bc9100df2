//! Replicate API model types.

mod model;
mod version;

pub use model::*;
pub use version::*;
