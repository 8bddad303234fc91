//! Batches service for the stratus crate
//!
//! This module provides functionality for submitting batch jobs: serializing
//! job descriptors to a local input file, uploading it, and creating the
//! batch that references it.

use crate::error::{Error, Result};
use crate::openai::files::{FileObject, FilesService};
use crate::openai::http::HttpClient;
use crate::openai::types::{Batch, BatchRequestItem, CreateBatchRequest};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, instrument};

/// Purpose tag attached to uploaded batch input files
const BATCH_FILE_PURPOSE: &str = "batch";

/// Service for managing batch operations
#[derive(Clone)]
pub struct BatchesService {
    /// HTTP client for making API requests
    http_client: HttpClient,

    /// Files service used to upload batch input files
    files: FilesService,
}

impl BatchesService {
    /// Create a new batches service
    pub(crate) fn new(http_client: HttpClient, files: FilesService) -> Self {
        Self { http_client, files }
    }

    /// Serialize job descriptors to a local input file and upload it
    ///
    /// The file is named `batch_request_<custom_id>.json` after the first
    /// descriptor's custom ID and written to the working directory as one
    /// JSON array. On a successful upload the local file is removed; on any
    /// failure it is left in place so the payload can be inspected.
    ///
    /// The descriptor slice must not be empty. A single slice produces a
    /// single file and a single upload call; slices exceeding the service's
    /// size constraints surface as upload errors.
    #[instrument(skip(self, requests), level = "debug")]
    pub async fn create_input_file(&self, requests: &[BatchRequestItem]) -> Result<FileObject> {
        let first = requests.first().ok_or_else(|| {
            Error::InvalidRequest("batch request list must not be empty".to_string())
        })?;
        let file_name = format!("batch_request_{}.json", first.custom_id);

        write_requests(Path::new(&file_name), requests)?;

        debug!("Uploading batch input file {}", file_name);
        let response = self.files.upload(&file_name, BATCH_FILE_PURPOSE).await?;

        if let Err(e) = tokio::fs::remove_file(&file_name).await {
            debug!("Failed to remove batch input file {}: {}", file_name, e);
        }

        Ok(response)
    }

    /// Create a new batch referencing an uploaded input file
    ///
    /// Issues a single creation call and returns the server's snapshot of
    /// the batch, typically still in its initial "validating" status.
    /// Tracking later state transitions is up to the caller.
    #[instrument(skip(self, request), level = "debug")]
    pub async fn create(&self, request: CreateBatchRequest) -> Result<Batch> {
        debug!("Creating batch for input file {}", request.input_file_id);
        self.http_client.post("batches", &request, true).await
    }
}

/// Write the descriptor slice to `path` as one JSON array
///
/// The file handle is flushed and dropped on every exit path, success or
/// failure.
fn write_requests(path: &Path, requests: &[BatchRequestItem]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, requests)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::types::{BatchRequestBody, ChatMessage};
    use mockito::Server;

    fn request_with_id(custom_id: &str) -> BatchRequestItem {
        BatchRequestItem {
            custom_id: custom_id.to_string(),
            method: "POST".to_string(),
            url: "/v1/chat/completions".to_string(),
            body: BatchRequestBody {
                model: "gpt-4o-mini".to_string(),
                messages: vec![ChatMessage {
                    role: "user".to_string(),
                    content: "Hello".to_string(),
                }],
                max_tokens: 100,
            },
        }
    }

    fn test_service(server: &Server) -> BatchesService {
        let mut client = HttpClient::with_api_key("test-key".to_string());
        client.set_base_url(server.url());
        BatchesService::new(client.clone(), FilesService::new(client))
    }

    #[test]
    fn test_artifact_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch_request_abc.json");
        let requests = vec![request_with_id("abc"), request_with_id("def")];

        write_requests(&path, &requests).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let decoded: Vec<BatchRequestItem> = serde_json::from_str(&contents).unwrap();
        assert_eq!(decoded, requests);
    }

    #[tokio::test]
    async fn test_create_input_file() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/v1/files")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"file-123","object":"file","bytes":200,"created_at":1690000000,"filename":"batch_request_upload-ok.json","purpose":"batch"}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let service = test_service(&server);
        let requests = vec![request_with_id("upload-ok")];
        let response = service.create_input_file(&requests).await.unwrap();

        assert_eq!(response.id, "file-123");
        assert_eq!(response.purpose, "batch");

        // artifact is removed once the upload succeeds
        assert!(!Path::new("batch_request_upload-ok.json").exists());

        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_input_file_empty() {
        let server = Server::new_async().await;

        let service = test_service(&server);
        let result = service.create_input_file(&[]).await;

        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_create_input_file_upload_error() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/v1/files")
            .with_status(500)
            .with_body(r#"{"error": {"message": "internal error"}}"#)
            .expect(1)
            .create_async()
            .await;

        let service = test_service(&server);
        let requests = vec![request_with_id("abc")];
        let result = service.create_input_file(&requests).await;

        match result {
            Err(Error::Api {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 500);
                assert!(message.contains("internal error"));
            }
            other => panic!("expected Api error, got {:?}", other.err()),
        }

        // the artifact is left in place on failure, named after the first
        // descriptor's custom ID
        let artifact = Path::new("batch_request_abc.json");
        assert!(artifact.exists());
        std::fs::remove_file(artifact).unwrap();

        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_batch() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/v1/batches")
            .match_header("authorization", "Bearer test-key")
            .match_header("OpenAI-Beta", "assistants=v2")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "input_file_id": "file-123",
                "end_point": "/v1/chat/completions",
                "completion_window": 86400
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "id": "batch_abc123",
                    "object": "batch",
                    "endpoint": "/v1/chat/completions",
                    "errors": null,
                    "input_file_id": "file-123",
                    "completion_window": "24h",
                    "status": "validating",
                    "created_at": 1690000000,
                    "request_counts": {"total": 0, "completed": 0, "failed": 0},
                    "metadata": {"customer_id": "cust-1", "batch_description": "nightly run"}
                }"#,
            )
            .expect(1)
            .create_async()
            .await;

        let service = test_service(&server);
        let batch = service
            .create(CreateBatchRequest {
                input_file_id: "file-123".to_string(),
                end_point: "/v1/chat/completions".to_string(),
                completion_window: 86400,
            })
            .await
            .unwrap();

        assert_eq!(batch.id, "batch_abc123");
        assert_eq!(batch.object, "batch");
        assert_eq!(batch.status, "validating");
        assert_eq!(batch.input_file_id, "file-123");
        assert_eq!(batch.created_at, 1690000000);
        assert!(batch.errors.is_none());
        assert!(batch.failed_at.is_none());

        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_batch_server_error() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/v1/batches")
            .with_status(400)
            .with_body(r#"{"error": {"message": "No such file: file-123"}}"#)
            .expect(1)
            .create_async()
            .await;

        let service = test_service(&server);
        let result = service
            .create(CreateBatchRequest {
                input_file_id: "file-123".to_string(),
                end_point: "/v1/chat/completions".to_string(),
                completion_window: 86400,
            })
            .await;

        match result {
            Err(Error::Api {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 400);
                assert!(message.contains("No such file"));
            }
            other => panic!("expected Api error, got {:?}", other.err()),
        }

        m.assert_async().await;
    }
}
