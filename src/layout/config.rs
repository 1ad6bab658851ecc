use crate::error::LayoutError;
use crate::pagesize::{self, PageSize};
use crate::units::Pt;

/// Page geometry and type settings for one conversion.
///
/// The same margin applies to all four sides. Lines start at the left margin,
/// the first baseline sits at `page_height - margin`, and no line is placed
/// lower than `margin`. `line_height` is a multiplier of `font_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub page_width: Pt,
    pub page_height: Pt,
    pub margin: Pt,
    pub font_size: Pt,
    pub line_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_width: pagesize::DOCVERTER.0,
            page_height: pagesize::DOCVERTER.1,
            margin: Pt(50.0),
            font_size: Pt(12.0),
            line_height: 1.2,
        }
    }
}

impl LayoutConfig {
    /// Build a validated configuration
    pub fn new<M: Into<Pt>>(
        page_size: PageSize,
        margin: M,
        font_size: Pt,
        line_height: f32,
    ) -> Result<LayoutConfig, LayoutError> {
        let config = LayoutConfig {
            page_width: page_size.0,
            page_height: page_size.1,
            margin: margin.into(),
            font_size,
            line_height,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn page_size(&self) -> PageSize {
        (self.page_width, self.page_height)
    }

    /// Width available to a line: page width minus both side margins
    pub fn usable_width(&self) -> Pt {
        self.page_width - self.margin * 2.0
    }

    /// Height available to lines: page height minus top and bottom margins
    pub fn usable_height(&self) -> Pt {
        self.page_height - self.margin * 2.0
    }

    /// Vertical distance consumed by one line or one paragraph separator
    pub fn line_advance(&self) -> Pt {
        self.font_size * self.line_height
    }

    /// Baseline of the first line on a fresh page
    pub fn top(&self) -> Pt {
        self.page_height - self.margin
    }

    /// How many lines (or separators) fit on a single page
    pub fn lines_per_page(&self) -> usize {
        (self.usable_height().0 / self.line_advance().0).floor() as usize
    }

    /// Check that the geometry can hold text at all. Called by both
    /// [wrap](crate::layout::wrap) and [paginate](crate::layout::paginate) before
    /// any work is done; nothing is ever clamped.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let invalid = |reason: String| Err(LayoutError::InvalidConfiguration(reason));

        let values = [
            ("page width", self.page_width.0),
            ("page height", self.page_height.0),
            ("margin", self.margin.0),
            ("font size", self.font_size.0),
            ("line height", self.line_height),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{name} must be a finite number, got {value}"));
        }

        if self.page_width.0 <= 0.0 || self.page_height.0 <= 0.0 {
            return invalid(format!(
                "page size must be positive, got {} x {}",
                self.page_width, self.page_height
            ));
        }
        if self.margin.0 < 0.0 {
            return invalid(format!("margin must not be negative, got {}", self.margin));
        }
        if self.usable_width().0 <= 0.0 {
            return invalid(format!(
                "a margin of {} leaves no usable width on a page {} wide",
                self.margin, self.page_width
            ));
        }
        if self.usable_height().0 <= 0.0 {
            return invalid(format!(
                "a margin of {} leaves no usable height on a page {} tall",
                self.margin, self.page_height
            ));
        }
        if self.font_size.0 <= 0.0 {
            return invalid(format!("font size must be positive, got {}", self.font_size));
        }
        if self.line_height <= 0.0 {
            return invalid(format!(
                "line height multiplier must be positive, got {}",
                self.line_height
            ));
        }
        if self.line_advance() > self.usable_height() {
            return invalid(format!(
                "a line advance of {} does not fit in the usable height of {}",
                self.line_advance(),
                self.usable_height()
            ));
        }

        Ok(())
    }
}
