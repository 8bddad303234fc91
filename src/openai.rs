//! OpenAI-compatible API implementation
//!
//! This module provides the core implementation for submitting batch jobs to
//! an OpenAI-compatible API.

mod batches;
mod client;
mod files;
mod http;
mod types;

pub use client::Client;

/// Re-export of types module for public use
pub mod prelude {
    pub use super::files::FileObject;
    pub use super::types::*;
    pub use crate::error::Error;
    pub use crate::error::Result;
}
