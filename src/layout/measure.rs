use crate::error::{LayoutError, MeasureError};
use crate::units::Pt;
use std::fmt::Display;

/// Something that knows how wide a run of text is when drawn at a given size.
///
/// The layout core never looks inside a font; it only asks this question.
/// Implementations must be deterministic: the same text at the same size
/// always measures the same.
pub trait TextMeasure {
    fn measure(&self, text: &str, size: Pt) -> Result<Pt, MeasureError>;
}

/// Any plain width function is an infallible measure
impl<F> TextMeasure for F
where
    F: Fn(&str, Pt) -> Pt,
{
    fn measure(&self, text: &str, size: Pt) -> Result<Pt, MeasureError> {
        Ok(self(text, size))
    }
}

/// Adapts a width function that can fail
///
/// ```
/// use docverter::layout::{TryMeasure, TextMeasure};
/// use docverter::Pt;
///
/// let measure = TryMeasure(|text: &str, size: Pt| {
///     if text.is_ascii() {
///         Ok(size * 0.5 * text.len() as f32)
///     } else {
///         Err("no metrics for non-ascii text")
///     }
/// });
/// assert_eq!(measure.measure("abcd", Pt(10.0)).unwrap(), Pt(20.0));
/// assert!(measure.measure("é", Pt(10.0)).is_err());
/// ```
pub struct TryMeasure<F>(pub F);

impl<F, E> TextMeasure for TryMeasure<F>
where
    F: Fn(&str, Pt) -> Result<Pt, E>,
    E: Display,
{
    fn measure(&self, text: &str, size: Pt) -> Result<Pt, MeasureError> {
        (self.0)(text, size).map_err(MeasureError::new)
    }
}

/// Measure `text`, turning a failed, negative or non-finite width into a
/// [LayoutError::MeasurementFailure]
pub(crate) fn checked_width<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    size: Pt,
) -> Result<Pt, LayoutError> {
    let failure = |reason: String| LayoutError::MeasurementFailure {
        fragment: text.to_string(),
        reason,
    };

    let width = measure
        .measure(text, size)
        .map_err(|e| failure(e.to_string()))?;
    if !width.is_finite() {
        return Err(failure(format!("width is not finite ({})", width.0)));
    }
    if width.0 < 0.0 {
        return Err(failure(format!("width is negative ({width})")));
    }
    Ok(width)
}
