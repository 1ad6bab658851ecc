use super::{AppError, AppState, DOWNLOAD_FILE_NAME};
use crate::convert::Conversion;
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;

const UPLOAD_PAGE: &str = include_str!("upload.html");

#[derive(Serialize)]
pub(super) struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /
pub(super) async fn upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE)
}

/// GET /health
pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// An uploaded file as the client described it
struct Upload {
    bytes: Bytes,
    content_type: Option<String>,
    file_name: Option<String>,
}

/// POST /api/convert
///
/// Takes a multipart form with the document in its `file` field and answers
/// with the PDF as an attachment.
pub(super) async fn convert(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(|s| s.to_string());
        let file_name = field.file_name().map(|s| s.to_string());
        let bytes = field.bytes().await?;
        upload = Some(Upload {
            bytes,
            content_type,
            file_name,
        });
        break;
    }
    let upload = upload.ok_or(AppError::MissingFile)?;

    tracing::info!(
        file_name = ?upload.file_name,
        content_type = ?upload.content_type,
        size = upload.bytes.len(),
        "converting upload"
    );

    let converter = state.converter.clone();
    let Conversion { pdf, page_count } = tokio::task::spawn_blocking(move || {
        converter.convert(
            &upload.bytes,
            upload.content_type.as_deref(),
            upload.file_name.as_deref(),
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    tracing::info!(pages = page_count, bytes = pdf.len(), "conversion finished");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\""),
            ),
        ],
        pdf,
    ))
}
