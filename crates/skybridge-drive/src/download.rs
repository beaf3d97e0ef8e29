//! Download operations for the Google Drive API
//!
//! Provider-native document formats have no byte representation of their
//! own and must be exported to a portable format first. The export target
//! is resolved from the source MIME type; everything else downloads raw
//! bytes via `alt=media`.

use reqwest::Method;
use tracing::{debug, info};

use skybridge_core::domain::errors::AdapterError;
use skybridge_core::domain::newtypes::RemoteId;
use skybridge_core::ports::remote_store::DownloadedContent;
use skybridge_core::retry::RetryPolicy;

use crate::client::DriveClient;
use crate::files;

/// Export targets for provider-native document formats
///
/// Maps the source MIME type to the export MIME type and the file
/// extension appended to the served name.
const EXPORT_FORMATS: &[(&str, &str, &str)] = &[
    (
        "application/vnd.google-apps.document",
        "application/pdf",
        "pdf",
    ),
    (
        "application/vnd.google-apps.spreadsheet",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xlsx",
    ),
    (
        "application/vnd.google-apps.presentation",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "pptx",
    ),
    ("application/vnd.google-apps.drawing", "image/png", "png"),
];

/// Resolves the export target for a source MIME type
///
/// Returns `(export_mime_type, extension)` for provider-native formats,
/// `None` for everything else.
pub fn export_target(mime_type: &str) -> Option<(&'static str, &'static str)> {
    EXPORT_FORMATS
        .iter()
        .find(|(source, _, _)| *source == mime_type)
        .map(|(_, target, ext)| (*target, *ext))
}

/// Downloads entity content, exporting provider-native formats
pub async fn download(
    client: &DriveClient,
    id: &RemoteId,
) -> Result<DownloadedContent, AdapterError> {
    let metadata = files::get_metadata(client, id).await?;
    let source_mime = metadata.mime_type.unwrap_or_default();

    let (response, file_name, mime_type) = match export_target(&source_mime) {
        Some((target_mime, extension)) => {
            debug!(id = %id, target_mime, "Exporting provider-native document");
            let path = format!("/files/{}/export", id.as_str());
            let query = [("mimeType", target_mime)];
            let response = client
                .execute_with_retry(Method::GET, &path, &query, None, RetryPolicy::READ)
                .await?;
            let file_name = format!("{}.{}", metadata.name, extension);
            (response, file_name, target_mime.to_string())
        }
        None => {
            let path = format!("/files/{}", id.as_str());
            let query = [("alt", "media")];
            let response = client
                .execute_with_retry(Method::GET, &path, &query, None, RetryPolicy::READ)
                .await?;
            let mime = if source_mime.is_empty() {
                "application/octet-stream".to_string()
            } else {
                source_mime
            };
            (response, metadata.name, mime)
        }
    };

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AdapterError::RemoteUnavailable(e.to_string()))?
        .to_vec();

    info!(id = %id, file_name, size = bytes.len(), "Downloaded content");
    Ok(DownloadedContent {
        bytes,
        file_name,
        mime_type,
    })
}
