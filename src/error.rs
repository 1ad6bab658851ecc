use thiserror::Error;

/// Failures of the layout core (line breaking and pagination)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The page geometry leaves no room for text, or a value is not a usable number
    #[error("invalid layout configuration: {0}")]
    InvalidConfiguration(String),

    /// The width function failed, or produced a negative or non-finite width
    #[error("failed to measure {fragment:?}: {reason}")]
    MeasurementFailure { fragment: String, reason: String },
}

/// Error reported by a fallible width function
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct MeasureError(pub String);

impl MeasureError {
    pub fn new<S: ToString>(reason: S) -> MeasureError {
        MeasureError(reason.to_string())
    }
}

/// All errors that rendering a PDF can generate
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error("the font has no cmap table")]
    /// An embedded font cannot map characters to glyphs
    MissingCmap,

    #[error("page {0} has no object reference")]
    /// A page was rendered before its reference was allocated
    PageMissing(usize),
}
