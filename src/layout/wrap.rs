use super::config::LayoutConfig;
use super::measure::{checked_width, TextMeasure};
use crate::error::LayoutError;
use crate::units::Pt;

/// A run of words joined by single spaces, together with its measured width
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: Pt,
}

/// One step of the line breaker's output
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    /// A line of text to draw
    Line(Line),
    /// The end of a paragraph; takes up one line of vertical space but draws nothing
    ParagraphBreak,
}

impl LayoutItem {
    pub fn as_line(&self) -> Option<&Line> {
        match self {
            LayoutItem::Line(line) => Some(line),
            LayoutItem::ParagraphBreak => None,
        }
    }
}

/// Break `text` into lines no wider than the configured usable width.
///
/// Every newline-delimited segment of the input is a paragraph (`\r\n` and a
/// bare `\r` count as newlines too). Its words are placed greedily: a word joins
/// the current line if the joined text still measures within the usable width,
/// otherwise the current line is finished and the word starts the next one. A
/// word that is too wide on its own becomes a line by itself and overflows;
/// words are never split. Each paragraph, including empty ones and the last one,
/// is followed by a [LayoutItem::ParagraphBreak].
///
/// Fails without producing any output if the configuration has no room for text
/// or the measure fails on any fragment.
pub fn wrap<M: TextMeasure + ?Sized>(
    text: &str,
    config: LayoutConfig,
    measure: &M,
) -> Result<Vec<LayoutItem>, LayoutError> {
    config.validate()?;

    let max_width = config.usable_width();
    let size = config.font_size;

    // normalize newlines
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut items: Vec<LayoutItem> = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = Pt(0.0);

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            let candidate_width = checked_width(measure, &candidate, size)?;

            if candidate_width <= max_width || current.is_empty() {
                // either it fits, or it is a lone word too wide for any line
                current = candidate;
                current_width = candidate_width;
            } else {
                items.push(LayoutItem::Line(Line {
                    text: std::mem::take(&mut current),
                    width: current_width,
                }));
                current_width = checked_width(measure, word, size)?;
                current = word.to_string();
            }
        }

        if !current.is_empty() {
            items.push(LayoutItem::Line(Line {
                text: current,
                width: current_width,
            }));
        }
        items.push(LayoutItem::ParagraphBreak);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use crate::layout::TryMeasure;

    /// every character is exactly 10pt wide regardless of size
    fn ten_per_char(text: &str, _size: Pt) -> Pt {
        Pt(10.0 * text.chars().count() as f32)
    }

    /// usable width of `width` points
    fn config_with_width(width: f32) -> LayoutConfig {
        LayoutConfig {
            page_width: Pt(width + 20.0),
            page_height: Pt(800.0),
            margin: Pt(10.0),
            ..LayoutConfig::default()
        }
    }

    fn lines(items: &[LayoutItem]) -> Vec<&str> {
        items
            .iter()
            .filter_map(LayoutItem::as_line)
            .map(|line| line.text.as_str())
            .collect()
    }

    fn breaks(items: &[LayoutItem]) -> usize {
        items
            .iter()
            .filter(|item| **item == LayoutItem::ParagraphBreak)
            .count()
    }

    #[test]
    fn wraps_greedily() {
        let items = wrap("aaa bbb ccc dddd e", config_with_width(70.0), &ten_per_char).unwrap();
        assert_eq!(lines(&items), vec!["aaa bbb", "ccc", "dddd e"]);
        assert_eq!(items.last(), Some(&LayoutItem::ParagraphBreak));
        assert_eq!(breaks(&items), 1);
    }

    #[test]
    fn lines_never_exceed_usable_width() {
        let config = config_with_width(230.0);
        let text = lipsum::lipsum(300);
        let items = wrap(&text, config, &ten_per_char).unwrap();
        for line in items.iter().filter_map(LayoutItem::as_line) {
            assert!(line.width <= config.usable_width(), "{line:?} overflows");
            assert_eq!(line.width, ten_per_char(&line.text, config.font_size));
        }
    }

    #[test]
    fn preserves_word_order() {
        let text = format!("{}\n\n{}\r\n{}", lipsum::lipsum(40), lipsum::lipsum(7), lipsum::lipsum(25));
        let items = wrap(&text, config_with_width(150.0), &ten_per_char).unwrap();
        let rejoined: Vec<&str> = lines(&items)
            .into_iter()
            .flat_map(str::split_whitespace)
            .collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn one_break_per_newline_delimited_segment() {
        let text = "first\n\n\nsecond\r\nthird\rfourth\n";
        let items = wrap(text, config_with_width(500.0), &ten_per_char).unwrap();
        assert_eq!(breaks(&items), 7);
        assert_eq!(lines(&items), vec!["first", "second", "third", "fourth"]);
        assert_eq!(
            items[..4],
            [
                LayoutItem::Line(Line {
                    text: "first".into(),
                    width: Pt(50.0)
                }),
                LayoutItem::ParagraphBreak,
                LayoutItem::ParagraphBreak,
                LayoutItem::ParagraphBreak,
            ]
        );
    }

    #[test]
    fn empty_text_is_a_single_empty_paragraph() {
        let items = wrap("", config_with_width(100.0), &ten_per_char).unwrap();
        assert_eq!(items, vec![LayoutItem::ParagraphBreak]);

        let items = wrap(" \t  ", config_with_width(100.0), &ten_per_char).unwrap();
        assert_eq!(items, vec![LayoutItem::ParagraphBreak]);
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        let items = wrap("  one \t two   three ", config_with_width(500.0), &ten_per_char).unwrap();
        assert_eq!(lines(&items), vec!["one two three"]);
    }

    #[test]
    fn an_overlong_word_overflows_on_its_own_line() {
        let items = wrap("abcdefgh", config_with_width(50.0), &ten_per_char).unwrap();
        assert_eq!(
            items,
            vec![
                LayoutItem::Line(Line {
                    text: "abcdefgh".into(),
                    width: Pt(80.0),
                }),
                LayoutItem::ParagraphBreak,
            ]
        );

        let items = wrap("ab abcdefgh cd ef", config_with_width(50.0), &ten_per_char).unwrap();
        assert_eq!(lines(&items), vec!["ab", "abcdefgh", "cd ef"]);
    }

    #[test]
    fn does_not_assume_measurement_is_additive() {
        // a kerning-like measure where joined text can be narrower than its parts
        let kerned = |text: &str, _: Pt| Pt(10.0 * text.chars().filter(|c| *c != 'v').count() as f32);
        let items = wrap("vvvvvvvv a", config_with_width(30.0), &kerned).unwrap();
        assert_eq!(lines(&items), vec!["vvvvvvvv a"]);
    }

    #[test]
    fn measurement_failure_aborts() {
        let measure = TryMeasure(|text: &str, _: Pt| {
            if text.contains('!') {
                Err(MeasureError::new("glyph not available"))
            } else {
                Ok(Pt(1.0))
            }
        });
        let err = wrap("fine words\nthen boom!", config_with_width(500.0), &measure).unwrap_err();
        assert!(matches!(err, LayoutError::MeasurementFailure { .. }));

        let negative = |_: &str, _: Pt| Pt(-3.0);
        assert!(matches!(
            wrap("anything", config_with_width(500.0), &negative),
            Err(LayoutError::MeasurementFailure { .. })
        ));
    }

    #[test]
    fn invalid_configuration_fails_before_measuring() {
        let config = LayoutConfig {
            margin: Pt(400.0),
            ..LayoutConfig::default()
        };
        let panicking = |_: &str, _: Pt| -> Pt { panic!("measured despite a bad config") };
        assert!(matches!(
            wrap("text", config, &panicking),
            Err(LayoutError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn is_deterministic() {
        let text = lipsum::lipsum(120);
        let config = config_with_width(180.0);
        assert_eq!(
            wrap(&text, config, &ten_per_char).unwrap(),
            wrap(&text, config, &ten_per_char).unwrap()
        );
    }
}
