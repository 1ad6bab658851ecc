//! Text layout: turning a body of plain text into positioned lines on pages.
//!
//! Layout happens in two pure steps:
//!
//! - [`wrap`](crate::layout::wrap) splits the text into paragraphs and greedily
//!   breaks each one into lines that fit the usable page width, measuring with a
//!   caller supplied [`TextMeasure`](crate::layout::TextMeasure)
//! - [`paginate`](crate::layout::paginate) stacks those lines down the page,
//!   starting a new page whenever the next line would cross the bottom margin
//!
//! [`layout_text`](crate::layout::layout_text) does both. Neither step touches a
//! font file or a PDF; any width function will do, and the resulting
//! [`PageSet`](crate::layout::PageSet) can be handed to any renderer.
//!
//! # Example
//!
//! ```
//! use docverter::layout::{layout_text, LayoutConfig};
//! use docverter::{pagesize, Pt};
//!
//! // a crude monospace measure: every character is half an em wide
//! let measure = |text: &str, size: Pt| size * 0.5 * text.chars().count() as f32;
//!
//! let config = LayoutConfig::new(pagesize::DOCVERTER, Pt(50.0), Pt(12.0), 1.2)
//!     .expect("page has room for text");
//! let pages = layout_text("Hello, world!\nSecond paragraph.", config, &measure)
//!     .expect("measure never fails");
//!
//! assert_eq!(pages.len(), 1);
//! let lines: Vec<&str> = pages.lines().map(|line| line.text()).collect();
//! assert_eq!(lines, ["Hello, world!", "Second paragraph."]);
//! ```

mod config;
mod measure;
mod paginate;
mod wrap;

pub use config::*;
pub use measure::*;
pub use paginate::*;
pub use wrap::*;

use crate::error::LayoutError;

/// Wrap `text` and paginate the result in one go
pub fn layout_text<M: TextMeasure + ?Sized>(
    text: &str,
    config: LayoutConfig,
    measure: &M,
) -> Result<PageSet, LayoutError> {
    let items = wrap(text, config, measure)?;
    paginate(items, config)
}
