//! Upload operations for the Google Drive API
//!
//! The transfer strategy is chosen by payload size:
//! - [`upload_simple`] - single multipart/related request for payloads
//!   below 5 MiB
//! - [`upload_resumable`] - resumable session with 8 MiB chunks for
//!   payloads at or above the threshold
//!
//! After a successful transfer, best-effort metadata hints are applied:
//! an OCR/format-conversion hint for small content and an indexable-text
//! hint for larger content. Hint failures are logged and never abort the
//! upload.

use reqwest::{Method, StatusCode};
use tracing::{debug, info, warn};

use skybridge_core::domain::errors::AdapterError;
use skybridge_core::domain::newtypes::RemoteId;
use skybridge_core::ports::remote_store::EntityDescriptor;
use skybridge_core::retry::RetryPolicy;

use crate::client::{classify_error, DriveClient};
use crate::files::{DriveFile, FILE_FIELDS};

/// Payloads below this size use the single-request strategy: 5 MiB
pub const SIMPLE_UPLOAD_THRESHOLD: u64 = 5 * 1024 * 1024;

/// Payloads below this size get the conversion hint, above it the
/// indexable-text hint: 1 MiB
const HINT_THRESHOLD: u64 = 1024 * 1024;

/// Chunk size for resumable uploads: 8 MiB (a multiple of the provider's
/// required 256 KiB granularity)
const CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// Boundary string for multipart/related bodies
const MULTIPART_BOUNDARY: &str = "skybridge_upload_boundary";

// ============================================================================
// Strategy selection
// ============================================================================

/// Transfer strategy for an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStrategy {
    /// Single multipart/related request
    Simple,
    /// Resumable session with chunked transfer
    Resumable,
}

/// Selects the transfer strategy for a payload size
pub fn select_strategy(size: u64) -> TransferStrategy {
    if size < SIMPLE_UPLOAD_THRESHOLD {
        TransferStrategy::Simple
    } else {
        TransferStrategy::Resumable
    }
}

// ============================================================================
// Simple upload (multipart/related)
// ============================================================================

/// Builds a multipart/related body: metadata part, then media part
///
/// The provider rejects multipart/form-data on this endpoint; the body
/// has to be constructed by hand with an explicit boundary.
fn build_multipart_body(metadata: &serde_json::Value, content: &[u8], mime_type: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// Uploads a payload below the threshold in a single request
pub async fn upload_simple(
    client: &DriveClient,
    name: &str,
    parent: &RemoteId,
    content: &[u8],
    mime_type: &str,
) -> Result<EntityDescriptor, AdapterError> {
    let metadata = serde_json::json!({
        "name": name,
        "parents": [parent.as_str()],
    });
    let body = build_multipart_body(&metadata, content, mime_type);
    let path = format!("/files?uploadType=multipart&fields={FILE_FIELDS}");
    let content_type = format!("multipart/related; boundary={MULTIPART_BOUNDARY}");

    debug!(name, size = content.len(), "Simple upload");

    let policy = RetryPolicy::MUTATION;
    let mut attempt: u32 = 0;
    loop {
        let request = client
            .upload_request(Method::POST, &path)
            .header("Content-Type", &content_type)
            .body(body.clone());

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                let file: DriveFile = response
                    .json()
                    .await
                    .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
                info!(id = %file.id, name, "Simple upload completed");
                return Ok(file.into_descriptor());
            }
            Ok(response) => {
                let code = response.status().as_u16();
                if AdapterError::is_retryable_status(code) && policy.should_retry(attempt) {
                    warn!(name, code, attempt, "Upload server error, retrying");
                    tokio::time::sleep(policy.delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(classify_error(response).await);
            }
            Err(err) if policy.should_retry(attempt) => {
                warn!(name, %err, attempt, "Upload transport failure, retrying");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => return Err(AdapterError::RemoteUnavailable(err.to_string())),
        }
    }
}

// ============================================================================
// Resumable upload
// ============================================================================

/// Opens a resumable upload session; returns the session URL
pub async fn create_upload_session(
    client: &DriveClient,
    name: &str,
    parent: &RemoteId,
    mime_type: &str,
    total_size: u64,
) -> Result<String, AdapterError> {
    let metadata = serde_json::json!({
        "name": name,
        "parents": [parent.as_str()],
    });

    let response = client
        .upload_request(Method::POST, "/files?uploadType=resumable")
        .header("X-Upload-Content-Type", mime_type)
        .header("X-Upload-Content-Length", total_size.to_string())
        .json(&metadata)
        .send()
        .await
        .map_err(|e| AdapterError::RemoteUnavailable(e.to_string()))?;

    if !response.status().is_success() {
        return Err(classify_error(response).await);
    }

    let session_url = response
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            AdapterError::InvalidResponse("upload session response missing Location".to_string())
        })?;

    debug!(name, "Opened resumable upload session");
    Ok(session_url)
}

/// Uploads one chunk within a session
///
/// Returns `None` while the session is incomplete (HTTP 308) and the
/// completed file on the final chunk.
async fn upload_chunk(
    client: &DriveClient,
    session_url: &str,
    chunk: &[u8],
    offset: u64,
    total: u64,
) -> Result<Option<DriveFile>, AdapterError> {
    let range_end = offset + chunk.len() as u64 - 1;
    let content_range = format!("bytes {offset}-{range_end}/{total}");

    let response = client
        .http_client()
        .put(session_url)
        .bearer_auth(client.access_token())
        .header("Content-Length", chunk.len().to_string())
        .header("Content-Range", &content_range)
        .body(chunk.to_vec())
        .send()
        .await
        .map_err(|e| AdapterError::RemoteUnavailable(e.to_string()))?;

    let status = response.status();
    // 308 Resume Incomplete acknowledges an intermediate chunk
    if status == StatusCode::PERMANENT_REDIRECT {
        debug!(content_range, "Chunk accepted");
        return Ok(None);
    }
    if status.is_success() {
        let file: DriveFile = response
            .json()
            .await
            .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
        return Ok(Some(file));
    }
    Err(classify_error(response).await)
}

/// Uploads a payload at or above the threshold via a resumable session
pub async fn upload_resumable(
    client: &DriveClient,
    name: &str,
    parent: &RemoteId,
    content: &[u8],
    mime_type: &str,
) -> Result<EntityDescriptor, AdapterError> {
    let total = content.len() as u64;
    info!(
        name,
        total,
        chunks = (total as usize).div_ceil(CHUNK_SIZE),
        "Starting resumable upload"
    );

    let session_url = create_upload_session(client, name, parent, mime_type, total).await?;

    let mut offset: usize = 0;
    let mut completed: Option<DriveFile> = None;
    while offset < content.len() {
        let end = usize::min(offset + CHUNK_SIZE, content.len());
        let chunk = &content[offset..end];
        if let Some(file) =
            upload_chunk(client, &session_url, chunk, offset as u64, total).await?
        {
            completed = Some(file);
        }
        offset = end;
    }

    let file = completed.ok_or_else(|| {
        AdapterError::InvalidResponse("session ended without a completed file".to_string())
    })?;
    info!(id = %file.id, name, "Resumable upload completed");
    Ok(file.into_descriptor())
}

// ============================================================================
// Post-upload hints (best-effort)
// ============================================================================

/// Applies the size-appropriate post-upload hint, never failing the upload
async fn apply_upload_hints(client: &DriveClient, id: &str, content: &[u8], mime_type: &str) {
    let result = if (content.len() as u64) < HINT_THRESHOLD {
        apply_conversion_hint(client, id).await
    } else {
        apply_indexable_text_hint(client, id, content, mime_type).await
    };
    if let Err(err) = result {
        warn!(id, %err, "Post-upload hint did not take effect");
    }
}

/// Requests OCR/format conversion on the uploaded content
async fn apply_conversion_hint(client: &DriveClient, id: &str) -> Result<(), AdapterError> {
    let path = format!("/files/{id}");
    let body = serde_json::json!({});
    let query = [("ocrLanguage", "en")];
    let response = client
        .request(Method::PATCH, &path)
        .query(&query)
        .json(&body)
        .send()
        .await
        .map_err(|e| AdapterError::RemoteUnavailable(e.to_string()))?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(classify_error(response).await)
    }
}

/// Attaches an indexable-text content hint for searchable text payloads
async fn apply_indexable_text_hint(
    client: &DriveClient,
    id: &str,
    content: &[u8],
    mime_type: &str,
) -> Result<(), AdapterError> {
    if !mime_type.starts_with("text/") {
        return Ok(());
    }
    // The hint field is capped well below the payload size; send a prefix.
    let prefix_len = usize::min(content.len(), 4096);
    let text = String::from_utf8_lossy(&content[..prefix_len]).to_string();

    let path = format!("/files/{id}");
    let body = serde_json::json!({
        "contentHints": { "indexableText": text }
    });
    let response = client
        .request(Method::PATCH, &path)
        .json(&body)
        .send()
        .await
        .map_err(|e| AdapterError::RemoteUnavailable(e.to_string()))?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(classify_error(response).await)
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Uploads file content, choosing the strategy by payload size
pub async fn upload(
    client: &DriveClient,
    name: &str,
    parent: &RemoteId,
    content: Vec<u8>,
    mime_type: &str,
) -> Result<EntityDescriptor, AdapterError> {
    let descriptor = match select_strategy(content.len() as u64) {
        TransferStrategy::Simple => {
            upload_simple(client, name, parent, &content, mime_type).await?
        }
        TransferStrategy::Resumable => {
            upload_resumable(client, name, parent, &content, mime_type).await?
        }
    };

    apply_upload_hints(client, &descriptor.id, &content, mime_type).await;
    Ok(descriptor)
}
