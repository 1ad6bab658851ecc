use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use docverter::extract::DOCX_CONTENT_TYPE;
use docverter::server::{build_router, AppState};
use docverter::Converter;
use std::io::{Cursor, Write};
use tower::ServiceExt;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const BOUNDARY: &str = "docverter-test-boundary";

fn app() -> Router {
    build_router(AppState::new(Converter::default()), 1024 * 1024)
}

/// A multipart body with a single part
fn multipart(name: &str, file_name: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn convert_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/convert")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_error(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    value["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn serves_the_upload_page() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let page = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8_lossy(&page);
    assert!(page.contains("/api/convert"));
    assert!(page.contains("converted-document.pdf"));
}

#[tokio::test]
async fn converts_a_text_upload() {
    let text = lipsum::lipsum(2_000);
    let body = multipart("file", "notes.txt", "text/plain", text.as_bytes());
    let response = app().oneshot(convert_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"converted-document.pdf\""
    );

    let pdf = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&pdf).contains("/Title (notes)"));
}

#[tokio::test]
async fn converts_a_docx_upload() {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer
        .write_all(
            br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Minutes</w:t></w:r></w:p></w:body></w:document>"#,
        )
        .unwrap();
    let docx = writer.finish().unwrap().into_inner();

    let body = multipart("file", "minutes.docx", DOCX_CONTENT_TYPE, &docx);
    let response = app().oneshot(convert_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
}

#[tokio::test]
async fn unsupported_types_still_convert() {
    let body = multipart("file", "photo.png", "image/png", b"\x89PNG\r\n");
    let response = app().oneshot(convert_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_file_is_a_bad_request() {
    let body = multipart("attachment", "notes.txt", "text/plain", b"hello");
    let response = app().oneshot(convert_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_error(response).await, "File not provided.");
}

#[tokio::test]
async fn broken_docx_is_a_conversion_failure() {
    let body = multipart("file", "broken.docx", DOCX_CONTENT_TYPE, b"not a zip archive");
    let response = app().oneshot(convert_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_error(response).await, "File conversion failed.");
}

#[tokio::test]
async fn malformed_multipart_is_rejected() {
    let response = app()
        .oneshot(convert_request(b"this is not a multipart body".to_vec()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_uploads_are_rejected() {
    let app = build_router(AppState::new(Converter::default()), 64);
    let body = multipart("file", "big.txt", "text/plain", &[b'a'; 4096]);
    let response = app.oneshot(convert_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
