//! Client implementation for the stratus crate
//!
//! This module provides the main client interface for the batch API.

use crate::openai::batches::BatchesService;
use crate::openai::files::FilesService;
use crate::openai::http::HttpClient;
use crate::openai::types::HttpOptions;

/// Client for an OpenAI-compatible batch API
///
/// This is the main entry point. It owns the shared HTTP collaborator and
/// hands out the services for batches and files. Configuration (base URL,
/// credentials, feature-version marker) is fixed at construction time.
///
/// # Examples
///
/// ```no_run
/// use stratus::openai::Client;
///
/// let client = Client::with_api_key("your-api-key");
/// let batches = client.batches();
/// ```
#[derive(Clone)]
pub struct Client {
    http_client: HttpClient,
}

impl Client {
    /// Create a new client with an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::with_api_key(api_key.into()),
        }
    }

    /// Create a new client with an API key and custom HTTP options
    pub fn with_api_key_and_options(api_key: impl Into<String>, options: HttpOptions) -> Self {
        Self {
            http_client: HttpClient::with_api_key_and_options(api_key.into(), options),
        }
    }

    /// Access the files service
    pub fn files(&self) -> FilesService {
        FilesService::new(self.http_client.clone())
    }

    /// Access the batches service
    pub fn batches(&self) -> BatchesService {
        BatchesService::new(self.http_client.clone(), self.files())
    }
}
