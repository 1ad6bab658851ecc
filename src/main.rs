//! Docverter: upload a `.docx` or `.txt` file, get it back as a PDF.

use anyhow::Context;
use docverter::config::Config;
use docverter::server::{build_router, AppState};
use docverter::{Converter, DocumentFont, Font, PdfRenderer};
use std::net::SocketAddr;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("docverter={0},tower_http={0}", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting docverter v{}", env!("CARGO_PKG_VERSION"));

    let font: DocumentFont = match &config.font_path {
        Some(path) => {
            let font = Font::from_file(path)
                .with_context(|| format!("failed to load font {}", path.display()))?;
            tracing::info!("Embedding font {} from {}", font.postscript_name(), path.display());
            font.into()
        }
        None => {
            tracing::info!("Using the built-in Helvetica font");
            DocumentFont::default()
        }
    };
    tracing::info!(
        "Pages are {} x {} with a {} margin, text set at {}",
        config.layout.page_width,
        config.layout.page_height,
        config.layout.margin,
        config.layout.font_size
    );

    let converter = Converter::new(config.layout, PdfRenderer::new(font));
    let app = build_router(AppState::new(converter), config.max_upload_bytes);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
