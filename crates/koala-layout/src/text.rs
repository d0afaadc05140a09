//! Text measurement.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Shaping, bidi and hyphenation belong to the text collaborator; layout
//! only needs widths, vertical metrics and soft wrap opportunities.

use unicode_linebreak::{BreakOpportunity, linebreaks};

use crate::config::LayoutConfig;

/// Text measurement interface used by line layout.
pub trait TextMeasurer {
    /// Total advance width of `text` at `font_size`.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// Used value of `line-height: normal`.
    fn line_height(&self, font_size: f32) -> f32;

    /// Distance from the top of the content area to the baseline.
    fn ascent(&self, font_size: f32) -> f32;

    /// [§ 5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-break-details)
    ///
    /// Byte offsets inside `text` where a soft wrap may be taken, in
    /// ascending order. An offset `i` means the line may end right before
    /// `text[i..]`. The end of the text is not reported.
    fn break_opportunities(&self, text: &str) -> Vec<usize> {
        linebreaks(text)
            .filter(|&(offset, opportunity)| {
                offset < text.len() && matches!(opportunity, BreakOpportunity::Allowed)
            })
            .map(|(offset, _)| offset)
            .collect()
    }
}

/// Fixed-ratio metrics for when no font data is available.
///
/// Every character advances by `font_size * char_width_ratio`; this is the
/// measurer used by the CLI and by tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateTextMeasurer {
    char_width_ratio: f32,
    line_height_ratio: f32,
    ascent_ratio: f32,
}

impl ApproximateTextMeasurer {
    /// Build a measurer from the configured ratios.
    #[must_use]
    pub const fn new(config: &LayoutConfig) -> Self {
        Self {
            char_width_ratio: config.char_width_ratio,
            line_height_ratio: config.line_height_ratio,
            ascent_ratio: config.ascent_ratio,
        }
    }
}

impl Default for ApproximateTextMeasurer {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl TextMeasurer for ApproximateTextMeasurer {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.char_width_ratio
    }

    fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_ratio
    }

    fn ascent(&self, font_size: f32) -> f32 {
        font_size * self.ascent_ratio
    }
}
