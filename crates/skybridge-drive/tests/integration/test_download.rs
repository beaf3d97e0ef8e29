//! Integration tests for downloads, including export-format resolution
//! for provider-native document types.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use skybridge_core::domain::newtypes::RemoteId;
use skybridge_drive::download;

use crate::common::{file_json, mount_metadata, setup_drive_mock};

fn id(s: &str) -> RemoteId {
    s.parse().expect("valid remote id")
}

#[tokio::test]
async fn test_regular_file_downloads_raw_bytes() {
    let (server, client) = setup_drive_mock().await;
    mount_metadata(
        &server,
        "file-1",
        file_json("file-1", "notes.txt", "text/plain", Some(5)),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/files/file-1"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let content = download::download(&client, &id("file-1")).await.unwrap();
    assert_eq!(content.bytes, b"hello");
    assert_eq!(content.file_name, "notes.txt");
    assert_eq!(content.mime_type, "text/plain");
}

#[tokio::test]
async fn test_native_document_is_exported_to_pdf() {
    let (server, client) = setup_drive_mock().await;
    mount_metadata(
        &server,
        "doc-1",
        file_json(
            "doc-1",
            "Quarterly Report",
            "application/vnd.google-apps.document",
            None,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/files/doc-1/export"))
        .and(query_param("mimeType", "application/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let content = download::download(&client, &id("doc-1")).await.unwrap();
    assert_eq!(content.file_name, "Quarterly Report.pdf");
    assert_eq!(content.mime_type, "application/pdf");
    assert!(content.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_spreadsheet_is_exported_to_xlsx() {
    let (server, client) = setup_drive_mock().await;
    mount_metadata(
        &server,
        "sheet-1",
        file_json(
            "sheet-1",
            "Budget",
            "application/vnd.google-apps.spreadsheet",
            None,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/files/sheet-1/export"))
        .and(query_param(
            "mimeType",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let content = download::download(&client, &id("sheet-1")).await.unwrap();
    assert_eq!(content.file_name, "Budget.xlsx");
}

#[tokio::test]
async fn test_download_of_missing_file_is_not_found() {
    let (server, client) = setup_drive_mock().await;
    Mock::given(method("GET"))
        .and(path("/files/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("File not found"))
        .mount(&server)
        .await;

    let err = download::download(&client, &id("missing")).await.unwrap_err();
    assert!(err.is_not_found());
}
