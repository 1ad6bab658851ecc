//! HTTP surface: an upload page and a multipart conversion endpoint

mod error;
mod routes;

pub use error::AppError;

use crate::convert::Converter;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// File name the converted PDF is offered for download under
pub const DOWNLOAD_FILE_NAME: &str = "converted-document.pdf";

#[derive(Clone)]
pub struct AppState {
    pub converter: Arc<Converter>,
}

impl AppState {
    pub fn new(converter: Converter) -> AppState {
        AppState {
            converter: Arc::new(converter),
        }
    }
}

/// The full application: routes plus tracing, CORS and the upload size limit
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(routes::upload_page))
        .route("/health", get(routes::health))
        .route("/api/convert", post(routes::convert))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
