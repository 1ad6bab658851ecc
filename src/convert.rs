//! The upload-to-PDF pipeline: extract text, lay it out, render it.

use crate::document::{PdfRenderer, Renderer};
use crate::error::{LayoutError, PDFError};
use crate::extract::{extract_text, ExtractError, SourceKind};
use crate::info::Info;
use crate::layout::{layout_text, LayoutConfig};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to extract text: {0}")]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("failed to render PDF: {0}")]
    Render(#[from] PDFError),
}

/// A finished conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    pub pdf: Vec<u8>,
    pub page_count: usize,
}

/// Converts uploads into PDFs with one fixed page geometry and font
#[derive(Debug, Default)]
pub struct Converter {
    pub config: LayoutConfig,
    pub renderer: PdfRenderer,
}

impl Converter {
    pub fn new(config: LayoutConfig, renderer: PdfRenderer) -> Converter {
        Converter { config, renderer }
    }

    /// Convert the raw bytes of an upload. `content_type` and `file_name` are
    /// whatever the client declared; either may be missing.
    pub fn convert(
        &self,
        bytes: &[u8],
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Conversion, ConvertError> {
        let kind = SourceKind::detect(content_type, file_name);
        tracing::debug!(?kind, ?content_type, ?file_name, size = bytes.len(), "detected upload kind");

        let text = extract_text(bytes, kind)?;
        tracing::debug!(chars = text.chars().count(), "extracted text");

        let pages = layout_text(&text, self.config, &self.renderer.font)?;
        tracing::debug!(pages = pages.len(), lines = pages.line_count(), "laid out text");

        let pdf = match file_name.filter(|name| !name.trim().is_empty()) {
            Some(name) => {
                let info = Info::for_source(name);
                self.renderer.render_document(&pages, &self.config, Some(&info))?
            }
            None => self.renderer.render(&pages, &self.config)?,
        };
        tracing::debug!(bytes = pdf.len(), "rendered PDF");

        Ok(Conversion {
            pdf,
            page_count: pages.len(),
        })
    }
}
