use crate::{
    error::PDFError,
    font::DocumentFont,
    info::Info,
    layout::{LayoutConfig, PageSet},
    page::write_page,
    refs::{ObjectReferences, RefType},
};
use pdf_writer::{Pdf, Ref};
use std::io::Write;

/// Turns laid out pages into the bytes of some document format. Renderers
/// draw what they are given: every line at its page and position, nothing
/// re-measured and nothing moved.
pub trait Renderer {
    type Error;

    fn render(&self, pages: &PageSet, config: &LayoutConfig) -> Result<Vec<u8>, Self::Error>;
}

/// Renders a [PageSet] as a PDF, set in a single font
#[derive(Debug, Default)]
pub struct PdfRenderer {
    pub font: DocumentFont,
    pub info: Option<Info>,
}

impl PdfRenderer {
    pub fn new<F: Into<DocumentFont>>(font: F) -> PdfRenderer {
        PdfRenderer {
            font: font.into(),
            info: None,
        }
    }

    /// Sets information about the document. If not provided, no information
    /// block will be written to the PDF
    pub fn with_info(self, info: Info) -> PdfRenderer {
        PdfRenderer {
            info: Some(info),
            ..self
        }
    }

    /// Render `pages` and write the PDF to `w`. The whole document is built in
    /// memory first.
    pub fn write<W: Write>(&self, pages: &PageSet, config: &LayoutConfig, mut w: W) -> Result<(), PDFError> {
        let bytes = self.render(pages, config)?;
        w.write_all(&bytes).map_err(Into::into)
    }
}

impl Renderer for PdfRenderer {
    type Error = PDFError;

    fn render(&self, pages: &PageSet, config: &LayoutConfig) -> Result<Vec<u8>, PDFError> {
        self.render_document(pages, config, self.info.as_ref())
    }
}

impl PdfRenderer {
    /// Render with `info` in place of the renderer's own metadata
    pub fn render_document(
        &self,
        pages: &PageSet,
        config: &LayoutConfig,
        info: Option<&Info>,
    ) -> Result<Vec<u8>, PDFError> {
        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = pages
            .iter()
            .map(|page| refs.gen(RefType::Page(page.index)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        self.font.write(&mut refs, &mut writer)?;

        for page in pages.iter() {
            write_page(page, &mut refs, &self.font, config, &mut writer)?;
        }

        writer.catalog(catalog_id).pages(page_tree_id);

        Ok(writer.finish())
    }
}
