//! HTTP client implementation for the stratus crate
//!
//! This module provides the HTTP client for making requests to an
//! OpenAI-compatible API.

use crate::error::{Error, Result};
use crate::openai::types::HttpOptions;
use rand::{Rng, thread_rng};
use reqwest::multipart::Form;
use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default base URL for API requests
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// HTTP client for making requests to an OpenAI-compatible API
///
/// This client handles authentication, request formatting, and response
/// parsing. Requests flagged as beta additionally carry the configured
/// feature-version marker as the `OpenAI-Beta` header.
///
/// The client can be configured to automatically retry requests when rate
/// limited (HTTP 429 responses). This behavior is controlled by the
/// `retry_on_rate_limit`, `max_retries`, and `default_retry_after_secs`
/// options in the `HttpOptions` struct.
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL for API requests
    base_url: String,

    /// API key used as a bearer token
    api_key: String,

    /// API version path segment
    api_version: String,

    /// Feature-version marker for beta endpoints
    beta_version: Option<String>,

    /// Additional headers attached to every request
    headers: HashMap<String, String>,

    /// Whether to automatically retry requests when rate limited
    retry_on_rate_limit: bool,

    /// Maximum number of retry attempts for rate-limited requests
    max_retries: u32,

    /// Default retry delay in seconds if no Retry-After header is provided
    default_retry_after_secs: u64,
}

#[cfg(test)]
impl HttpClient {
    /// Set the base URL (for testing only)
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }
}

impl HttpClient {
    /// Create a new HTTP client with an API key
    pub fn with_api_key(api_key: String) -> Self {
        Self::with_api_key_and_options(api_key, HttpOptions::default())
    }

    /// Create a new HTTP client with an API key and custom options
    pub fn with_api_key_and_options(api_key: String, options: HttpOptions) -> Self {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            api_version: options.api_version,
            beta_version: options.beta_version,
            headers: options.headers,
            retry_on_rate_limit: options.retry_on_rate_limit,
            max_retries: options.max_retries,
            default_retry_after_secs: options.default_retry_after_secs,
        }
    }

    /// Build a URL from the base URL, version segment, and path
    fn build_url(&self, path: &str) -> Result<Url> {
        let url = format!("{}/{}/{}", self.base_url, self.api_version, path);
        Url::parse(&url).map_err(|e| Error::InvalidRequest(format!("invalid URL: {}", e)))
    }

    /// Attach authentication and configured headers to a request
    fn apply_headers(&self, mut request: RequestBuilder, beta: bool) -> RequestBuilder {
        request = request.bearer_auth(&self.api_key);
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        if beta {
            if let Some(version) = &self.beta_version {
                request = request.header("OpenAI-Beta", version);
            }
        }
        request
    }

    /// Prepare a GET request
    #[instrument(skip(self), level = "debug")]
    pub async fn get<T: DeserializeOwned>(&self, path: &str, beta: bool) -> Result<T> {
        let url = self.build_url(path)?;
        let request = self.apply_headers(self.client.get(url), beta);

        debug!("Sending GET request to {}", path);
        self.execute_request(request).await
    }

    /// Prepare a POST request with a JSON body
    #[instrument(skip(self, body), level = "debug")]
    pub async fn post<T: DeserializeOwned, B: Serialize + std::fmt::Debug>(
        &self,
        path: &str,
        body: &B,
        beta: bool,
    ) -> Result<T> {
        let url = self.build_url(path)?;
        let request = self.apply_headers(self.client.post(url), beta).json(body);

        debug!("Sending POST request to {}", path);
        self.execute_request(request).await
    }

    /// Prepare a DELETE request
    #[instrument(skip(self), level = "debug")]
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, beta: bool) -> Result<T> {
        let url = self.build_url(path)?;
        let request = self.apply_headers(self.client.delete(url), beta);

        debug!("Sending DELETE request to {}", path);
        self.execute_request(request).await
    }

    /// Send a POST request with a multipart form body
    ///
    /// Multipart bodies are not replayable, so this path never retries; a
    /// rate-limited response surfaces directly as an error.
    #[instrument(skip(self, form), level = "debug")]
    pub async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let url = self.build_url(path)?;
        let request = self
            .apply_headers(self.client.post(url), false)
            .multipart(form);

        debug!("Sending multipart POST request to {}", path);
        let response = request.send().await.map_err(Error::Http)?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_secs(&response, self.default_retry_after_secs);
            let response_text = response.text().await.map_err(Error::Http)?;
            error!("API error: {} - {}", status, response_text);
            return Err(Error::RateLimit {
                retry_after_secs: retry_after,
            });
        }

        let response_text = response.text().await.map_err(Error::Http)?;
        parse_response(status, response_text)
    }

    /// Execute an HTTP request and handle the response
    async fn execute_request<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let mut attempts = 0;

        loop {
            // Clone the request builder for each attempt
            let request_clone = request.try_clone().ok_or_else(|| {
                Error::InvalidRequest("request body cannot be cloned for retry".to_string())
            })?;

            let response = request_clone.send().await.map_err(Error::Http)?;
            let status = response.status();

            // Check for rate limit response
            if status == StatusCode::TOO_MANY_REQUESTS {
                attempts += 1;

                let retry_after = retry_after_secs(&response, self.default_retry_after_secs);

                let response_text = response.text().await.map_err(Error::Http)?;
                error!("API error: {} - {}", status, response_text);

                // Check if we should retry
                if self.retry_on_rate_limit && attempts <= self.max_retries {
                    // Calculate backoff with exponential increase and jitter
                    let base_delay = retry_after;
                    let max_delay = 60; // Cap at 60 seconds

                    let exp_factor = u64::pow(2, attempts - 1);
                    let mut delay = base_delay.saturating_mul(exp_factor);

                    // Add jitter (±20%)
                    if delay > 1 {
                        let jitter_factor = thread_rng().gen_range(0.8..1.2);
                        delay = ((delay as f64) * jitter_factor) as u64;
                    }

                    delay = std::cmp::min(delay, max_delay);

                    debug!(
                        "Rate limited. Retrying after {} seconds (attempt {}/{})",
                        delay, attempts, self.max_retries
                    );

                    tokio::time::sleep(Duration::from_secs(delay)).await;
                    continue;
                }

                // If we're not retrying or have exceeded max retries, return the error
                return Err(Error::RateLimit {
                    retry_after_secs: retry_after,
                });
            }

            // For non-rate-limit responses, process normally
            let response_text = response.text().await.map_err(Error::Http)?;
            return parse_response(status, response_text);
        }
    }
}

/// Extract the Retry-After header value, falling back to a default
fn retry_after_secs(response: &reqwest::Response, default_secs: u64) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default_secs)
}

/// Map a response status and body to a typed result
fn parse_response<T: DeserializeOwned>(status: StatusCode, body: String) -> Result<T> {
    if status.is_success() {
        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse response: {}", e);
            Error::UnexpectedResponse(format!("Failed to parse response: {}", e))
        })
    } else {
        error!("API error: {} - {}", status, body);

        if status == StatusCode::UNAUTHORIZED {
            Err(Error::Auth("Invalid API key or credentials".to_string()))
        } else {
            Err(Error::Api {
                status_code: status.as_u16(),
                message: body,
            })
        }
    }
}
