//! Integration tests for metadata operations: listing, lookup, folder
//! creation, deletion, move, and the best-effort mutations. Also covers
//! the retry/classification contract against a live mock server.

use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skybridge_core::domain::errors::AdapterError;
use skybridge_core::domain::newtypes::RemoteId;
use skybridge_drive::files;

use crate::common::{file_json, mount_listing, mount_metadata, setup_drive_mock};

fn id(s: &str) -> RemoteId {
    s.parse().expect("valid remote id")
}

#[tokio::test]
async fn test_list_children_maps_descriptors() {
    let (server, client) = setup_drive_mock().await;
    mount_listing(
        &server,
        serde_json::json!([
            file_json("folder-1", "Docs", "application/vnd.google-apps.folder", None),
            file_json("file-1", "notes.txt", "text/plain", Some(512)),
        ]),
    )
    .await;

    let children = files::list_children(&client, &id("root-id"), None)
        .await
        .unwrap();

    assert_eq!(children.len(), 2);
    assert!(children[0].is_folder);
    assert_eq!(children[1].name, "notes.txt");
    assert_eq!(children[1].size, Some(512));
    assert_eq!(children[1].created_by.as_deref(), Some("test@example.com"));
}

#[tokio::test]
async fn test_list_children_sends_parent_query() {
    let (server, client) = setup_drive_mock().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param(
            "q",
            "'root-id' in parents and trashed = false and name contains 'report'",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"files": []})))
        .expect(1)
        .mount(&server)
        .await;

    let children = files::list_children(&client, &id("root-id"), Some("report"))
        .await
        .unwrap();
    assert!(children.is_empty());
}

#[tokio::test]
async fn test_get_metadata_not_found_is_classified() {
    let (server, client) = setup_drive_mock().await;
    Mock::given(method("GET"))
        .and(path("/files/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("File not found"))
        .expect(1)
        .mount(&server)
        .await;

    let err = files::get_metadata(&client, &id("missing")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_server_error_is_retried_until_success() {
    let (server, client) = setup_drive_mock().await;
    Mock::given(method("GET"))
        .and(path("/files/flaky"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/flaky"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(file_json("flaky", "a.txt", "text/plain", Some(1))),
        )
        .mount(&server)
        .await;

    let descriptor = files::get_metadata(&client, &id("flaky")).await.unwrap();
    assert_eq!(descriptor.id, "flaky");
}

#[tokio::test]
async fn test_client_error_is_never_retried() {
    let (server, client) = setup_drive_mock().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficientPermissions"))
        .expect(1)
        .mount(&server)
        .await;

    let err = files::create_folder(&client, "Blocked", &id("root-id"))
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::RemoteRejected { code: 403, .. }));
}

#[tokio::test]
async fn test_create_folder_sends_folder_mime() {
    let (server, client) = setup_drive_mock().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_partial_json(serde_json::json!({
            "name": "Reports",
            "mimeType": "application/vnd.google-apps.folder",
            "parents": ["root-id"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json(
            "new-folder",
            "Reports",
            "application/vnd.google-apps.folder",
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = files::create_folder(&client, "Reports", &id("root-id"))
        .await
        .unwrap();
    assert_eq!(descriptor.id, "new-folder");
    assert!(descriptor.is_folder);
}

#[tokio::test]
async fn test_move_reads_current_parents_first() {
    let (server, client) = setup_drive_mock().await;
    mount_metadata(
        &server,
        "doc-1",
        file_json("doc-1", "doc.txt", "text/plain", Some(10)),
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path("/files/doc-1"))
        .and(query_param("addParents", "new-parent"))
        .and(query_param("removeParents", "parent-001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "doc-1",
            "parents": ["new-parent"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    files::move_entity(&client, &id("doc-1"), &id("new-parent"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_issues_delete_request() {
    let (server, client) = setup_drive_mock().await;
    Mock::given(method("DELETE"))
        .and(path("/files/gone"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    files::delete(&client, &id("gone")).await.unwrap();
}

#[tokio::test]
async fn test_rename_failure_degrades_without_raising() {
    let (server, client) = setup_drive_mock().await;
    Mock::given(method("PATCH"))
        .and(path("/files/locked"))
        .respond_with(ResponseTemplate::new(403).set_body_string("cannotModify"))
        .mount(&server)
        .await;

    let outcome = files::rename(&client, &id("locked"), "new-name")
        .await
        .unwrap();
    assert!(!outcome.applied());
}

#[tokio::test]
async fn test_set_trashed_applies() {
    let (server, client) = setup_drive_mock().await;
    Mock::given(method("PATCH"))
        .and(path("/files/doc-1"))
        .and(body_partial_json(serde_json::json!({"trashed": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "doc-1", "trashed": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = files::set_trashed(&client, &id("doc-1"), true).await.unwrap();
    assert!(outcome.applied());
}

#[tokio::test]
async fn test_transport_failure_is_remote_unavailable() {
    // Nothing listens on this port; connection is refused immediately.
    let client = skybridge_drive::DriveClient::with_base_urls(
        "token",
        "http://127.0.0.1:1",
        "http://127.0.0.1:1/upload",
    )
    .unwrap();

    let err = files::get_metadata(&client, &id("any")).await.unwrap_err();
    assert!(matches!(err, AdapterError::RemoteUnavailable(_)));
}
