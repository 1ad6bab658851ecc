use super::config::LayoutConfig;
use super::wrap::{LayoutItem, Line};
use crate::error::LayoutError;
use crate::units::Pt;

/// A line of text pinned to a spot on a page. `x` is always the left margin
/// and `y` is the baseline, measured up from the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLine {
    pub line: Line,
    pub page_index: usize,
    pub x: Pt,
    pub y: Pt,
}

impl PositionedLine {
    pub fn text(&self) -> &str {
        &self.line.text
    }
}

/// The lines placed on one page, top to bottom
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub index: usize,
    pub lines: Vec<PositionedLine>,
}

impl PageLayout {
    fn new(index: usize) -> PageLayout {
        PageLayout {
            index,
            lines: Vec::new(),
        }
    }
}

/// Every page of a laid out document. Never empty: a document with no text
/// still has one blank page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSet {
    pages: Vec<PageLayout>,
}

impl PageSet {
    pub fn pages(&self) -> &[PageLayout] {
        &self.pages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageLayout> {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always `false`; present for symmetry with [PageSet::len]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All positioned lines in document order
    pub fn lines(&self) -> impl Iterator<Item = &PositionedLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|page| page.lines.len()).sum()
    }
}

impl<'a> IntoIterator for &'a PageSet {
    type Item = &'a PageLayout;
    type IntoIter = std::slice::Iter<'a, PageLayout>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Assign each line a page and a baseline.
///
/// Lines and paragraph breaks each take one `line_advance` of vertical space,
/// starting at `page_height - margin`. Before anything is placed, if it would
/// reach below the bottom margin a new page is started, so neither a line nor a
/// separator ever straddles a page boundary. Paragraph breaks move the cursor
/// without recording anything.
pub fn paginate<I>(items: I, config: LayoutConfig) -> Result<PageSet, LayoutError>
where
    I: IntoIterator<Item = LayoutItem>,
{
    config.validate()?;

    let advance = config.line_advance();
    let top = config.top();
    let bottom = config.margin;

    let mut pages: Vec<PageLayout> = vec![PageLayout::new(0)];
    // number of line slots already consumed on the current page
    let mut slot: usize = 0;

    for item in items {
        if top - advance * ((slot + 1) as f32) < bottom {
            pages.push(PageLayout::new(pages.len()));
            slot = 0;
        }

        if let LayoutItem::Line(line) = item {
            let page_index = pages.len() - 1;
            let y = top - advance * (slot as f32);
            if let Some(page) = pages.last_mut() {
                page.lines.push(PositionedLine {
                    line,
                    page_index,
                    x: config.margin,
                    y,
                });
            }
        }
        slot += 1;
    }

    Ok(PageSet { pages })
}
