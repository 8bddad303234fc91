//! # Stratus - Batch API Client for Rust
//!
//! This crate provides an idiomatic Rust interface for submitting batch jobs
//! to OpenAI-compatible APIs. A batch is a server-side grouped collection of
//! independent requests processed asynchronously within a bounded completion
//! window; this client builds the input file for a batch, uploads it, and
//! submits the batch-creation call.
//!
//! ## Features
//!
//! - Typed wire-format structures for batch requests and resources
//! - Serialization of job descriptors to a batch input file and upload
//! - Batch creation with the beta feature-version header the API requires
//! - Optional retry with backoff for rate-limited requests
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use stratus::openai::Client;
//! use stratus::openai::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::with_api_key("your-api-key");
//!
//!     let requests = vec![BatchRequestItem {
//!         custom_id: "job-1".to_string(),
//!         method: "POST".to_string(),
//!         url: "/v1/chat/completions".to_string(),
//!         body: BatchRequestBody {
//!             model: "gpt-4o-mini".to_string(),
//!             messages: vec![ChatMessage {
//!                 role: "user".to_string(),
//!                 content: "Summarize this document.".to_string(),
//!             }],
//!             max_tokens: 256,
//!         },
//!     }];
//!
//!     let input_file = client.batches().create_input_file(&requests).await?;
//!
//!     let batch = client
//!         .batches()
//!         .create(CreateBatchRequest {
//!             input_file_id: input_file.id,
//!             end_point: "/v1/chat/completions".to_string(),
//!             completion_window: 86400,
//!         })
//!         .await?;
//!
//!     println!("batch {} is {}", batch.id, batch.status);
//!     Ok(())
//! }
//! ```

mod error;
pub mod openai;

pub use error::Error;

/// Re-export of the crate's error types
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
