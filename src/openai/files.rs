//! Files service for the stratus crate
//!
//! This module provides functionality for managing files with the API.
//! Files can be uploaded, retrieved, and deleted; batch input files are
//! uploaded through this service.

use crate::error::Result;
use crate::openai::http::HttpClient;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, instrument};

/// An uploaded file handle returned by the files endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileObject {
    /// The file identifier
    pub id: String,

    /// Resource kind tag (always "file")
    #[serde(default)]
    pub object: String,

    /// Size of the file in bytes
    #[serde(default)]
    pub bytes: u64,

    /// Unix timestamp of the upload
    #[serde(default)]
    pub created_at: i64,

    /// Original filename
    #[serde(default)]
    pub filename: String,

    /// Purpose tag supplied at upload time
    #[serde(default)]
    pub purpose: String,
}

/// Service for managing files
#[derive(Clone)]
pub struct FilesService {
    /// HTTP client for making API requests
    http_client: HttpClient,
}

impl FilesService {
    /// Create a new files service
    pub(crate) fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Upload a local file with the given purpose tag
    ///
    /// The file is read into memory and sent as a multipart form with a
    /// `purpose` field and a `file` part carrying the original filename.
    #[instrument(skip(self), level = "debug")]
    pub async fn upload(
        &self,
        path: impl AsRef<Path> + std::fmt::Debug,
        purpose: impl Into<String> + std::fmt::Debug,
    ) -> Result<FileObject> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        let form = Form::new()
            .text("purpose", purpose.into())
            .part("file", Part::bytes(data).file_name(filename));

        debug!("Uploading file {}", path.display());
        self.http_client.post_form("files", form).await
    }

    /// Get file information
    #[instrument(skip(self), level = "debug")]
    pub async fn get(&self, id: impl Into<String> + std::fmt::Debug) -> Result<FileObject> {
        let id = id.into();
        debug!("Getting file information for {}", id);
        self.http_client.get(&format!("files/{}", id), false).await
    }

    /// Delete a file
    #[instrument(skip(self), level = "debug")]
    pub async fn delete(&self, id: impl Into<String> + std::fmt::Debug) -> Result<()> {
        let id = id.into();
        debug!("Deleting file {}", id);
        self.http_client
            .delete::<serde_json::Value>(&format!("files/{}", id), false)
            .await?;
        Ok(())
    }
}
