use crate::error::PDFError;
use crate::font::DocumentFont;
use crate::layout::{LayoutConfig, PageLayout};
use crate::refs::{ObjectReferences, RefType};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Str};

/// Resource name the document font is registered under on every page
pub(crate) const FONT_RESOURCE: &[u8] = b"F0";

/// Build the content stream that draws every line of `page` at its position
pub(crate) fn render_page(page: &PageLayout, font: &DocumentFont, config: &LayoutConfig) -> Vec<u8> {
    if page.lines.is_empty() {
        return Vec::default();
    }

    let mut content = Content::new();
    content.begin_text();
    content.set_font(Name(FONT_RESOURCE), config.font_size.into());
    for line in page.lines.iter() {
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, line.x.into(), line.y.into()]);
        content.show(Str(&font.encode(line.text())));
    }
    content.end_text();
    content.finish()
}

/// Write the page object for `page` and its compressed content stream. The
/// page's own reference and the font's must already be allocated.
pub(crate) fn write_page(
    page: &PageLayout,
    refs: &mut ObjectReferences,
    font: &DocumentFont,
    config: &LayoutConfig,
    writer: &mut Pdf,
) -> Result<(), PDFError> {
    let id = refs
        .get(RefType::Page(page.index))
        .ok_or(PDFError::PageMissing(page.index))?;
    let page_tree_id = refs.get(RefType::PageTree).ok_or(PDFError::PageMissing(page.index))?;
    let font_id = refs.get(RefType::Font).ok_or(PDFError::PageMissing(page.index))?;
    let content_id = refs.gen(RefType::ContentForPage(page.index));

    let margin: f32 = config.margin.into();
    let (width, height): (f32, f32) = (config.page_width.into(), config.page_height.into());

    let mut pdf_page = writer.page(id);
    pdf_page
        .media_box(Rect::new(0.0, 0.0, width, height))
        .art_box(Rect::new(margin, margin, width - margin, height - margin))
        .parent(page_tree_id)
        .contents(content_id);
    pdf_page.resources().fonts().pair(Name(FONT_RESOURCE), font_id);
    pdf_page.finish();

    let rendered = render_page(page, font, config);
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&rendered, 6);
    writer
        .stream(content_id, compressed.as_slice())
        .filter(Filter::FlateDecode);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Line, PositionedLine};
    use crate::Pt;

    fn page_with(lines: &[(&str, f32)]) -> PageLayout {
        PageLayout {
            index: 0,
            lines: lines
                .iter()
                .map(|&(text, y)| PositionedLine {
                    line: Line {
                        text: text.to_string(),
                        width: Pt(0.0),
                    },
                    page_index: 0,
                    x: Pt(50.0),
                    y: Pt(y),
                })
                .collect(),
        }
    }

    #[test]
    fn draws_each_line_at_its_position() {
        let page = page_with(&[("Hello", 750.0), ("world", 735.5)]);
        let content = render_page(&page, &DocumentFont::default(), &LayoutConfig::default());
        let content = String::from_utf8_lossy(&content);

        assert!(content.starts_with("BT"));
        assert!(content.contains("/F0 12 Tf"));
        assert!(content.contains("1 0 0 1 50 750 Tm"));
        assert!(content.contains("(Hello) Tj"));
        assert!(content.contains("1 0 0 1 50 735.5 Tm"));
        assert!(content.trim_end().ends_with("ET"));
    }

    #[test]
    fn blank_pages_have_no_content() {
        let content = render_page(&page_with(&[]), &DocumentFont::default(), &LayoutConfig::default());
        assert!(content.is_empty());
    }
}
