//! Decides what happens to content that has not been committed to a line
//! yet.
//!
//! [§ 5 Line Breaking and Word Boundaries](https://www.w3.org/TR/css-text-3/#line-breaking)
//!
//! "When inline-level content is laid out into lines, it is broken across
//! line boxes. Such a break is called a line break."

use crate::box_tree::BoxTree;
use crate::style::{OverflowWrap, WordBreak};
use crate::text::TextMeasurer;

use super::item::{InlineItem, InlineTextItem};
use super::line::{LineMode, LineRun};

/// Slack allowed when comparing accumulated widths against the line.
const WIDTH_TOLERANCE: f32 = 1e-3;

/// An item waiting for the next soft wrap opportunity before it can be
/// committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateRun {
    /// Index of the item in the formatting context's item list.
    pub index: usize,
    /// The item, already cut to its remaining part for leading partial
    /// content.
    pub item: InlineItem,
    /// The run the item would produce.
    pub run: LineRun,
}

/// What to do with the uncommitted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakingResult {
    /// Put all of it on the current line.
    Keep,
    /// Commit the candidates before `run_index` and the first `length`
    /// bytes of the text at `run_index`, then close the line. A zero
    /// `length` breaks right before that text.
    Split {
        /// Candidate to split.
        run_index: usize,
        /// Prefix length in bytes.
        length: usize,
    },
    /// Leave all of it for the next line.
    Wrap,
}

/// Line breaking decisions for one formatting context.
pub struct LineBreaker<'a> {
    tree: &'a BoxTree,
    measurer: &'a dyn TextMeasurer,
    mode: LineMode,
}

impl<'a> LineBreaker<'a> {
    /// Create a breaker for lines built in `mode`.
    #[must_use]
    pub fn new(tree: &'a BoxTree, measurer: &'a dyn TextMeasurer, mode: LineMode) -> Self {
        Self { tree, measurer, mode }
    }

    /// Decide where `candidates` go given `available_width` left on the
    /// line.
    ///
    /// `line_is_empty` is true when nothing visible and no float is on the
    /// line yet; overflowing content is then kept rather than producing an
    /// empty line.
    #[must_use]
    pub fn break_content(&self, candidates: &[CandidateRun], available_width: f32, line_is_empty: bool) -> BreakingResult {
        // Widths are sums of measured advances; rounding must not push
        // content that was sized to fit onto the next line.
        let available_width = available_width + WIDTH_TOLERANCE;
        let width: f32 = candidates.iter().map(|c| c.run.logical_width).sum();
        if width <= available_width {
            return BreakingResult::Keep;
        }

        // [§ 4.1.3 Phase II](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
        //
        // "If spaces or tabs at the end of a line are non-collapsible but
        // have white-space set to pre-wrap the UA must either hang the white
        // space or visually collapse the character advance widths."
        // Collapsible spaces are removed at the end of the line anyway.
        // Whitespace on a line that already overflows hangs as well.
        if width - trailing_whitespace_width(candidates) <= available_width.max(0.0) {
            return BreakingResult::Keep;
        }

        // STEP 1: Find the candidate that crosses the line's end.
        let mut start = 0.0;
        let mut overflowing = None;
        for (run_index, candidate) in candidates.iter().enumerate() {
            if start + candidate.run.logical_width > available_width {
                overflowing = Some((run_index, start));
                break;
            }
            start += candidate.run.logical_width;
        }
        let Some((run_index, start)) = overflowing else {
            return BreakingResult::Keep;
        };

        // STEP 2: Split it when the style allows breaking inside words.
        let at_line_start = line_is_empty && candidates[..run_index].iter().all(|c| !c.run.has_content());
        if let Some(text) = candidates[run_index].item.as_text() {
            if self.is_splittable(text, at_line_start) {
                if let Some(length) = self.split_position(text, available_width - start, at_line_start) {
                    return BreakingResult::Split { run_index, length };
                }
            }
        }

        // STEP 3: Otherwise the whole chunk moves, unless nothing precedes it.
        if line_is_empty {
            BreakingResult::Keep
        } else {
            BreakingResult::Wrap
        }
    }

    /// [§ 5.2 Breaking Rules for Letters: the word-break property](https://www.w3.org/TR/css-text-3/#word-break-property)
    ///
    /// "break-all: Breaking is allowed within 'words'."
    ///
    /// [§ 5.5 Overflow Wrapping: the overflow-wrap property](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
    ///
    /// "break-word: An otherwise unbreakable sequence of characters may be
    /// broken at an arbitrary point if there are no otherwise-acceptable
    /// break points in the line." Soft wrap opportunities introduced by
    /// break-word are not considered when calculating min-content sizes.
    fn is_splittable(&self, text: &InlineTextItem, at_line_start: bool) -> bool {
        if text.is_whitespace || text.length == 0 {
            return false;
        }
        let style = self.tree.style(text.layout_box);
        match (style.word_break, style.overflow_wrap) {
            (WordBreak::BreakAll, _) => true,
            (WordBreak::Normal, OverflowWrap::BreakWord) => at_line_start && self.mode == LineMode::Layout,
            (WordBreak::Normal, OverflowWrap::Normal) => false,
        }
    }

    /// Longest prefix of `text` (at a character boundary) no wider than
    /// `space`.
    ///
    /// At least one character is taken at the start of a line so that
    /// every line makes progress. `None` when the only possible split is
    /// the whole text.
    fn split_position(&self, text: &InlineTextItem, space: f32, at_line_start: bool) -> Option<usize> {
        let content = text.content(self.tree);
        let mut fitting = 0;
        for (offset, _) in content.char_indices().skip(1) {
            if text.left(offset, self.tree, self.measurer).width > space {
                break;
            }
            fitting = offset;
        }
        if fitting == 0 && at_line_start {
            fitting = content.chars().next().map_or(0, char::len_utf8);
        }
        if fitting >= text.length {
            return None;
        }
        Some(fitting)
    }
}

/// Width of collapsible whitespace at the end of `candidates`, looking
/// through container boundaries.
fn trailing_whitespace_width(candidates: &[CandidateRun]) -> f32 {
    let mut width = 0.0;
    for candidate in candidates.iter().rev() {
        if candidate.run.is_container_boundary() {
            continue;
        }
        if !candidate.run.is_whitespace() {
            break;
        }
        width += candidate.run.logical_width;
    }
    width
}
