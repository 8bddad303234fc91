//! Type definitions for the stratus crate
//!
//! This module contains the wire-format data structures for the batch API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single role/content message pair in a batch request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message author (e.g., "system", "user")
    pub role: String,

    /// The message text
    pub content: String,
}

/// The request payload one batch job executes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequestBody {
    /// Model name the job runs against
    pub model: String,

    /// Ordered conversation messages
    pub messages: Vec<ChatMessage>,

    /// Maximum number of output tokens
    pub max_tokens: u32,
}

/// One job descriptor in a batch input file
///
/// Immutable once constructed; exists only to be serialized into the input
/// file uploaded ahead of batch creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequestItem {
    /// Caller-chosen identifier used to correlate results later
    pub custom_id: String,

    /// HTTP method the job executes
    pub method: String,

    /// Target path the job executes against
    pub url: String,

    /// The request payload
    pub body: BatchRequestBody,
}

/// Request body for creating a batch from an uploaded input file
///
/// The `end_point` spelling and the integer `completion_window` are part of
/// the wire contract. The completion window is passed through unvalidated;
/// its unit is owned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBatchRequest {
    /// ID of the uploaded file containing the batch requests
    pub input_file_id: String,

    /// Endpoint category the batch targets
    pub end_point: String,

    /// Time bound within which the batch should finish
    pub completion_window: u64,
}

/// Aggregate request counters for a batch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestCounts {
    pub total: u64,
    pub completed: u64,
    pub failed: u64,
}

/// Caller-supplied metadata echoed back on the batch resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchMetadata {
    #[serde(default)]
    pub customer_id: String,

    #[serde(default)]
    pub batch_description: String,
}

/// A server-side batch resource, observed at a point in time
///
/// Produced by deserializing the server's response and never mutated locally;
/// the batch lifecycle is entirely server-side state.
#[derive(Debug, Clone, Deserialize)]
pub struct Batch {
    /// Batch identifier
    pub id: String,

    /// Resource kind tag (always "batch")
    pub object: String,

    /// Endpoint the batch targets
    pub endpoint: String,

    /// Server-reported errors; shape varies (null, object, or array), so the
    /// document is held opaquely and interpretation is left to the caller
    #[serde(default)]
    pub errors: Option<serde_json::Value>,

    /// The uploaded input file the batch reads
    pub input_file_id: String,

    /// Completion window as echoed by the server
    #[serde(default)]
    pub completion_window: String,

    /// Current lifecycle status; the enumeration is owned by the server
    /// (e.g., "validating", "in_progress", "completed", "failed")
    pub status: String,

    /// Result file, present once output exists
    #[serde(default)]
    pub output_file_id: Option<String>,

    /// Error file, present once failed requests exist
    #[serde(default)]
    pub error_file_id: Option<String>,

    #[serde(default)]
    pub created_at: i64,

    #[serde(default)]
    pub in_progress_at: i64,

    #[serde(default)]
    pub expires_at: i64,

    #[serde(default)]
    pub finalizing_at: i64,

    #[serde(default)]
    pub completed_at: i64,

    /// Set only when the batch failed
    #[serde(default)]
    pub failed_at: Option<i64>,

    /// Set only when the batch expired
    #[serde(default)]
    pub expired_at: Option<i64>,

    /// Set only while cancellation is in flight
    #[serde(default)]
    pub cancelling_at: Option<i64>,

    /// Set only when the batch was cancelled
    #[serde(default)]
    pub cancelled_at: Option<i64>,

    #[serde(default)]
    pub request_counts: RequestCounts,

    #[serde(default)]
    pub metadata: BatchMetadata,
}

/// HTTP options for client configuration
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// API version path segment
    pub api_version: String,

    /// Beta feature-version marker sent as the `OpenAI-Beta` header on
    /// requests that require it
    pub beta_version: Option<String>,

    /// Additional HTTP headers
    pub headers: HashMap<String, String>,

    /// Whether to automatically retry requests when rate limited
    pub retry_on_rate_limit: bool,

    /// Maximum number of retry attempts for rate-limited requests
    pub max_retries: u32,

    /// Default retry delay in seconds if no Retry-After header is provided
    pub default_retry_after_secs: u64,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            api_version: "v1".to_string(),
            beta_version: Some("assistants=v2".to_string()),
            headers: HashMap::new(),
            retry_on_rate_limit: false,
            max_retries: 3,
            default_retry_after_secs: 60,
        }
    }
}
