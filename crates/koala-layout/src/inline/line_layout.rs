//! One line of an inline formatting context.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "When several inline-level boxes cannot fit horizontally within a single
//! line box, they are distributed among two or more vertically-stacked
//! line boxes."
//!
//! Items are appended to an uncommitted buffer until the next soft wrap
//! opportunity. At each opportunity the [`LineBreaker`] decides whether
//! the buffer goes on this line, is split, or waits for the next line.

use serde::Serialize;
use tracing::trace;

use crate::box_tree::{BoxId, BoxTree};
use crate::display::{DisplayBox, TextRange};
use crate::layout_state::LayoutState;
use crate::style::{BoxStyle, FloatSide, TextAlign};
use crate::text::TextMeasurer;

use super::item::{InlineItem, InlineTextItem};
use super::line::{ClosedLine, InitialConstraints, Line, LineMode, LineRun, LineRunKind, RunMetrics, Strut};
use super::line_breaker::{BreakingResult, CandidateRun, LineBreaker};

/// The unconsumed end of a text item that did not fit on the previous
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartialContent {
    /// Length in bytes of the suffix still to be placed.
    pub length: usize,
}

/// Where a line starts.
#[derive(Debug, Clone, Copy)]
pub struct LineInput<'a> {
    /// Position, width and strut of the line.
    pub initial_constraints: InitialConstraints,
    /// The formatting context root's 'text-align'.
    pub text_align: TextAlign,
    /// Every item of the formatting context.
    pub items: &'a [InlineItem],
    /// First item to place.
    pub leading_index: usize,
    /// Suffix of the leading item left over from the previous line.
    pub leading_partial_content: Option<PartialContent>,
}

/// A float consumed by a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineFloat {
    /// The floating box.
    pub layout_box: BoxId,
    /// Whether the float was placed beside this line. A float that does not
    /// fit is positioned below it instead.
    pub fits_on_line: bool,
}

/// A finished line and where the next one starts.
#[derive(Debug, Clone, PartialEq)]
pub struct LineContent {
    /// First item of the next line; `None` when this line consumed
    /// nothing.
    pub trailing_inline_item_index: Option<usize>,
    /// The part of the trailing item still to be placed.
    pub trailing_partial_content: Option<PartialContent>,
    /// Floats consumed by this line, in item order.
    pub floats: Vec<LineFloat>,
    /// The closed line.
    pub line: ClosedLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    EndOfLine,
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "Each glyph's A and D are then computed: the leading L = 'line-height'
/// - AD is added, half above A and the other half below D, giving the
/// total height above the baseline A' = A + L/2 and the total depth
/// D' = D + L/2."
///
/// Metrics of a zero-width run of text in `style`: the rect is one used
/// line height tall and the layout bounds are A' and D'.
#[must_use]
pub fn text_metrics(style: &BoxStyle, measurer: &dyn TextMeasurer) -> RunMetrics {
    let font_size = style.font_size;
    let line_height = style
        .line_height
        .unwrap_or_else(|| measurer.line_height(font_size));
    let ascent = measurer.ascent(font_size);
    let descent = font_size - ascent;
    let half_leading = (line_height - font_size) / 2.0;
    RunMetrics {
        offset: 0.0,
        width: 0.0,
        height: line_height,
        baseline: half_leading + ascent,
        ascent: half_leading + ascent,
        descent: half_leading + descent,
    }
}

/// The strut of a formatting context root with style `style`.
#[must_use]
pub fn strut(style: &BoxStyle, measurer: &dyn TextMeasurer) -> Strut {
    let metrics = text_metrics(style, measurer);
    Strut {
        ascent: metrics.ascent,
        descent: metrics.descent,
    }
}

/// Builds a single line.
pub struct LineLayout<'a, 't> {
    layout_state: &'a LayoutState<'t>,
    tree: &'t BoxTree,
    measurer: &'t dyn TextMeasurer,
    mode: LineMode,
    input: LineInput<'a>,
    line: Line,
    uncommitted: Vec<CandidateRun>,
    /// Every non-float item that entered the line, in order.
    placed: Vec<InlineItem>,
    floats: Vec<LineFloat>,
    trailing: Option<(usize, Option<PartialContent>)>,
    has_intrusive_float: bool,
    ended_by_forced_break: bool,
}

impl<'a, 't> LineLayout<'a, 't> {
    /// Prepare a line starting at `input`.
    #[must_use]
    pub fn new(layout_state: &'a LayoutState<'t>, mode: LineMode, input: LineInput<'a>) -> Self {
        Self {
            layout_state,
            tree: layout_state.tree(),
            measurer: layout_state.measurer(),
            mode,
            line: Line::new(input.initial_constraints, mode),
            has_intrusive_float: input.initial_constraints.line_is_constrained_by_float,
            input,
            uncommitted: Vec::new(),
            placed: Vec::new(),
            floats: Vec::new(),
            trailing: None,
            ended_by_forced_break: false,
        }
    }

    /// Place items until the line is full or the items run out.
    #[must_use]
    pub fn layout(mut self) -> LineContent {
        let items = self.input.items;
        for index in self.input.leading_index..items.len() {
            let flow = match self.leading_item(index) {
                InlineItem::Float { layout_box } => self.place_float(index, layout_box),
                item @ InlineItem::ForcedLineBreak { .. } => self.place_forced_line_break(index, item),
                item => self.place_inline_item(index, item),
            };
            if flow == Flow::EndOfLine {
                return self.close();
            }
        }
        let _ = self.process_uncommitted_content();
        self.close()
    }

    /// The item at `index`, cut to the leftover partial content when it
    /// leads the line.
    fn leading_item(&self, index: usize) -> InlineItem {
        let item = self.input.items[index];
        if index != self.input.leading_index {
            return item;
        }
        match (item, self.input.leading_partial_content) {
            (InlineItem::Text(text), Some(partial)) => {
                InlineItem::Text(text.right(partial.length, self.tree, self.measurer))
            }
            _ => item,
        }
    }

    fn line_is_considered_empty(&self) -> bool {
        !self.line.has_content() && !self.has_intrusive_float
    }

    fn place_inline_item(&mut self, index: usize, item: InlineItem) -> Flow {
        if !self.uncommitted.is_empty()
            && self.is_soft_wrap_opportunity(&item)
            && self.process_uncommitted_content() == Flow::EndOfLine
        {
            return Flow::EndOfLine;
        }
        let run = self.run_for_item(&item);
        self.placed.push(item);
        self.uncommitted.push(CandidateRun { index, item, run });
        Flow::Continue
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// "If a shortened line box is too small to contain any content, then
    /// the line box is shifted downward (and its width recomputed) until
    /// either some content fits or there are no more floats present."
    fn place_float(&mut self, index: usize, layout_box: BoxId) -> Flow {
        if self.process_uncommitted_content() == Flow::EndOfLine {
            return Flow::EndOfLine;
        }
        let width = self.display_box(layout_box).margin_box_width();
        let remaining = self.line.remaining_width();
        let fits_on_line = width <= remaining || !self.line.has_content();
        if fits_on_line {
            let shrink = width.min(remaining.max(0.0));
            match self.tree.style(layout_box).float.unwrap_or(FloatSide::Left) {
                FloatSide::Left => self.line.move_logical_left(shrink),
                FloatSide::Right => self.line.move_logical_right(shrink),
            }
            self.has_intrusive_float = true;
        }
        self.floats.push(LineFloat {
            layout_box,
            fits_on_line,
        });
        self.trailing = Some((index + 1, None));
        Flow::Continue
    }

    fn place_forced_line_break(&mut self, index: usize, item: InlineItem) -> Flow {
        if self.process_uncommitted_content() == Flow::EndOfLine {
            return Flow::EndOfLine;
        }
        let run = self.run_for_item(&item);
        self.line.append(run);
        self.placed.push(item);
        self.trailing = Some((index + 1, None));
        self.ended_by_forced_break = true;
        Flow::EndOfLine
    }

    fn commit(&mut self, candidate: CandidateRun) {
        self.line.append(candidate.run);
        self.trailing = Some((candidate.index + 1, None));
    }

    fn process_uncommitted_content(&mut self) -> Flow {
        if self.uncommitted.is_empty() {
            return Flow::Continue;
        }
        let breaker = LineBreaker::new(self.tree, self.measurer, self.mode);
        let result = breaker.break_content(
            &self.uncommitted,
            self.line.remaining_width(),
            self.line_is_considered_empty(),
        );
        trace!(?result, candidates = self.uncommitted.len(), "uncommitted content");
        let candidates = std::mem::take(&mut self.uncommitted);
        match result {
            BreakingResult::Keep => {
                for candidate in candidates {
                    self.commit(candidate);
                }
                Flow::Continue
            }
            BreakingResult::Split { run_index, length } => {
                for &candidate in &candidates[..run_index] {
                    self.commit(candidate);
                }
                let candidate = candidates[run_index];
                if let Some(text) = candidate.item.as_text() {
                    if length > 0 {
                        let head = text.left(length, self.tree, self.measurer);
                        let run = self.text_run(&head);
                        self.line.append(run);
                    }
                    // A zero length split that follows nothing leaves the
                    // line empty; the caller retries it lower.
                    if length > 0 || self.trailing.is_some() {
                        let original_length = self.input.items[candidate.index]
                            .as_text()
                            .map_or(0, |original| original.length);
                        let remaining = text.length - length;
                        let partial = (remaining < original_length).then_some(PartialContent { length: remaining });
                        self.trailing = Some((candidate.index, partial));
                    }
                }
                Flow::EndOfLine
            }
            BreakingResult::Wrap => Flow::EndOfLine,
        }
    }

    /// [§ 5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-break-details)
    ///
    /// Whether a soft wrap opportunity exists between the content already
    /// on the line and `incoming`.
    ///
    /// "For soft wrap opportunities defined by the boundary between two
    /// characters or atomic inlines, the white-space property on the
    /// nearest common ancestor of the two characters controls breaking."
    /// Inline box boundaries do not break by themselves: the edges stick to
    /// the content next to them.
    fn is_soft_wrap_opportunity(&self, incoming: &InlineItem) -> bool {
        let Some(previous) = self.placed.last() else {
            return false;
        };
        match incoming {
            InlineItem::Text(text) if text.is_whitespace => self.tree.style(text.layout_box).allows_wrapping(),
            InlineItem::ContainerEnd { .. } => false,
            InlineItem::ContainerStart { .. } => match previous {
                InlineItem::Box { .. } => true,
                InlineItem::Text(text) => text.has_trailing_soft_wrap_opportunity,
                _ => false,
            },
            InlineItem::Box { .. } => match previous {
                InlineItem::ContainerStart { .. } => false,
                InlineItem::Text(text) => self.tree.style(text.layout_box).allows_wrapping(),
                _ => true,
            },
            InlineItem::Text(_) => {
                if matches!(previous, InlineItem::ContainerStart { .. }) {
                    return false;
                }
                let content = self
                    .placed
                    .iter()
                    .rev()
                    .find(|item| !item.is_container_boundary());
                match content {
                    Some(InlineItem::Text(text)) => text.has_trailing_soft_wrap_opportunity,
                    Some(InlineItem::Box { .. }) => true,
                    _ => false,
                }
            }
            InlineItem::Float { .. } | InlineItem::ForcedLineBreak { .. } => false,
        }
    }

    /// [§ 4.1.1 Phase I](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
    ///
    /// "Any collapsible space immediately following another collapsible
    /// space, even one outside the boundary of the inline containing that
    /// space, provided both spaces are within the same inline formatting
    /// context, is collapsed to have zero advance width." Spaces at the
    /// beginning of a line are removed as well.
    fn whitespace_collapses(&self) -> bool {
        match self.placed.iter().rev().find(|item| !item.is_container_boundary()) {
            None | Some(InlineItem::ForcedLineBreak { .. }) => true,
            Some(InlineItem::Text(text)) => text.is_whitespace,
            Some(_) => false,
        }
    }

    fn display_box(&self, layout_box: BoxId) -> DisplayBox {
        self.layout_state
            .display_box(layout_box)
            .copied()
            .unwrap_or_default()
    }

    fn text_run(&self, text: &InlineTextItem) -> LineRun {
        let collapsed = text.is_whitespace && self.whitespace_collapses();
        let width = if collapsed { 0.0 } else { text.width };
        let metrics = RunMetrics {
            width,
            ..text_metrics(self.tree.style(text.layout_box), self.measurer)
        };
        let kind = LineRunKind::Text {
            range: TextRange::new(text.start, text.end()),
            is_whitespace: text.is_whitespace,
        };
        let mut run = LineRun::new(text.layout_box, kind, width, metrics);
        run.is_collapsed = collapsed;
        run
    }

    fn run_for_item(&self, item: &InlineItem) -> LineRun {
        match *item {
            InlineItem::Text(text) => self.text_run(&text),
            InlineItem::Box { layout_box } => self.box_run(layout_box),
            InlineItem::ContainerStart { layout_box } => {
                let display_box = self.display_box(layout_box);
                let metrics = self.container_metrics(layout_box, &display_box);
                let width = display_box.border.left + display_box.padding.left;
                LineRun::new(
                    layout_box,
                    LineRunKind::ContainerStart,
                    display_box.margin.left + width,
                    RunMetrics {
                        offset: display_box.margin.left,
                        width,
                        ..metrics
                    },
                )
            }
            InlineItem::ContainerEnd { layout_box } => {
                let display_box = self.display_box(layout_box);
                let metrics = self.container_metrics(layout_box, &display_box);
                let width = display_box.padding.right + display_box.border.right;
                LineRun::new(
                    layout_box,
                    LineRunKind::ContainerEnd,
                    width + display_box.margin.right,
                    RunMetrics { width, ..metrics },
                )
            }
            InlineItem::ForcedLineBreak { layout_box } => LineRun::new(
                layout_box,
                LineRunKind::ForcedLineBreak,
                0.0,
                text_metrics(self.tree.style(layout_box), self.measurer),
            ),
            InlineItem::Float { .. } => unreachable!("floats never become runs"),
        }
    }

    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The height of the inline box encloses all glyphs and their
    /// half-leading on each side and is thus exactly 'line-height'."
    /// The painted area of an inline box is its content area extended by
    /// its vertical padding and border.
    fn container_metrics(&self, layout_box: BoxId, display_box: &DisplayBox) -> RunMetrics {
        let style = self.tree.style(layout_box);
        let bounds = text_metrics(style, self.measurer);
        let ascent = self.measurer.ascent(style.font_size);
        RunMetrics {
            offset: 0.0,
            width: 0.0,
            height: style.font_size + display_box.padding.vertical() + display_box.border.vertical(),
            baseline: ascent + display_box.padding.top + display_box.border.top,
            ascent: bounds.ascent,
            descent: bounds.descent,
        }
    }

    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The baseline of an 'inline-block' is the baseline of its last line
    /// box in the normal flow, unless it has either no in-flow line boxes
    /// ..., in which case the baseline is the bottom margin edge."
    /// Replaced content sits on its bottom margin edge too.
    fn box_run(&self, layout_box: BoxId) -> LineRun {
        let display_box = self.display_box(layout_box);
        let border_box_height = display_box.border_box_height();
        let last_line_baseline = if self.tree.is_inline_block(layout_box) {
            self.layout_state
                .lines(layout_box)
                .iter()
                .rev()
                .find(|line| line.rect.height > 0.0)
                .map(|line| line.rect.y + line.baseline)
        } else {
            None
        };
        let baseline = last_line_baseline.unwrap_or(border_box_height + display_box.margin.bottom);
        let metrics = RunMetrics {
            offset: display_box.margin.left,
            width: display_box.border_box_width(),
            height: border_box_height,
            baseline,
            ascent: display_box.margin.top + baseline,
            descent: (border_box_height + display_box.margin.bottom - baseline).max(0.0),
        };
        LineRun::new(layout_box, LineRunKind::Box, display_box.margin_box_width(), metrics)
    }

    fn close(self) -> LineContent {
        let (trailing_inline_item_index, trailing_partial_content) = match self.trailing {
            Some((index, partial)) => (Some(index), partial),
            None => (None, None),
        };
        let is_last_line = match trailing_inline_item_index {
            None => true,
            Some(index) => {
                trailing_partial_content.is_none() && self.input.items[index..].iter().all(InlineItem::is_float)
            }
        };
        let justify_allowed = !self.ended_by_forced_break && !is_last_line;
        LineContent {
            trailing_inline_item_index,
            trailing_partial_content,
            floats: self.floats,
            line: self.line.close(self.input.text_align, justify_allowed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_model::Point;
    use crate::inline::item::collect_inline_items;
    use crate::style::WordBreak;
    use crate::text::ApproximateTextMeasurer;

    // 16px font, 0.6 ratio: every character is 9.6px wide.
    const CHAR: f32 = 9.6;

    fn layout_line(
        state: &LayoutState<'_>,
        items: &[InlineItem],
        leading_index: usize,
        leading_partial_content: Option<PartialContent>,
        width: f32,
    ) -> LineContent {
        let input = LineInput {
            initial_constraints: InitialConstraints {
                top_left: Point::new(0.0, 0.0),
                available_width: width,
                line_is_constrained_by_float: false,
                strut: Strut::default(),
            },
            text_align: TextAlign::Start,
            items,
            leading_index,
            leading_partial_content,
        };
        LineLayout::new(state, LineMode::Layout, input).layout()
    }

    fn tree_with_text(text: &str, style: BoxStyle) -> BoxTree {
        let mut tree = BoxTree::new(BoxStyle::block()).unwrap();
        let _text = tree.append_text(BoxId::ROOT, text, style).unwrap();
        tree
    }

    #[test]
    fn test_everything_fits_on_one_line() {
        let tree = tree_with_text("abc def", BoxStyle::default());
        let measurer = ApproximateTextMeasurer::default();
        let state = LayoutState::new(&tree, &measurer);
        let items = collect_inline_items(&tree, &measurer, BoxId::ROOT);

        let content = layout_line(&state, &items, 0, None, 500.0);
        assert_eq!(content.trailing_inline_item_index, Some(items.len()));
        assert_eq!(content.trailing_partial_content, None);
        assert_eq!(content.line.runs.len(), 3);
        assert!((content.line.content_width - 7.0 * CHAR).abs() < 1e-3);
    }

    #[test]
    fn test_wraps_at_whitespace() {
        let tree = tree_with_text("abc def", BoxStyle::default());
        let measurer = ApproximateTextMeasurer::default();
        let state = LayoutState::new(&tree, &measurer);
        let items = collect_inline_items(&tree, &measurer, BoxId::ROOT);

        let first = layout_line(&state, &items, 0, None, 5.0 * CHAR);
        assert_eq!(first.trailing_inline_item_index, Some(2));
        // The trailing space is trimmed.
        assert!((first.line.content_width - 3.0 * CHAR).abs() < 1e-3);
        assert!(first.line.runs[1].is_collapsed);

        let second = layout_line(&state, &items, 2, None, 5.0 * CHAR);
        assert_eq!(second.trailing_inline_item_index, Some(3));
        assert_eq!(second.line.runs.len(), 1);
    }

    #[test]
    fn test_split_word_continues_as_partial_content() {
        let style = BoxStyle {
            word_break: WordBreak::BreakAll,
            ..BoxStyle::default()
        };
        let tree = tree_with_text("abcdefghijkl", style);
        let measurer = ApproximateTextMeasurer::default();
        let state = LayoutState::new(&tree, &measurer);
        let items = collect_inline_items(&tree, &measurer, BoxId::ROOT);
        assert_eq!(items.len(), 1);

        let first = layout_line(&state, &items, 0, None, 10.0 * CHAR + 1.0);
        assert_eq!(first.trailing_inline_item_index, Some(0));
        assert_eq!(first.trailing_partial_content, Some(PartialContent { length: 2 }));
        assert!(matches!(
            first.line.runs[0].kind,
            LineRunKind::Text { range, .. } if range == TextRange::new(0, 10)
        ));

        let second = layout_line(&state, &items, 0, first.trailing_partial_content, 10.0 * CHAR + 1.0);
        assert_eq!(second.trailing_inline_item_index, Some(1));
        assert_eq!(second.trailing_partial_content, None);
        assert!(matches!(
            second.line.runs[0].kind,
            LineRunKind::Text { range, .. } if range == TextRange::new(10, 12)
        ));
    }

    #[test]
    fn test_overlong_word_overflows_empty_line() {
        let tree = tree_with_text("abcdefghijkl", BoxStyle::default());
        let measurer = ApproximateTextMeasurer::default();
        let state = LayoutState::new(&tree, &measurer);
        let items = collect_inline_items(&tree, &measurer, BoxId::ROOT);

        let content = layout_line(&state, &items, 0, None, 20.0);
        assert_eq!(content.trailing_inline_item_index, Some(1));
        assert!(content.line.content_width > 20.0);
    }

    #[test]
    fn test_forced_break_ends_line() {
        let mut tree = BoxTree::new(BoxStyle::block()).unwrap();
        let _a = tree.append_text(BoxId::ROOT, "ab", BoxStyle::default()).unwrap();
        let _br = tree.append_line_break(BoxId::ROOT, BoxStyle::default()).unwrap();
        let _b = tree.append_text(BoxId::ROOT, "cd", BoxStyle::default()).unwrap();
        let measurer = ApproximateTextMeasurer::default();
        let state = LayoutState::new(&tree, &measurer);
        let items = collect_inline_items(&tree, &measurer, BoxId::ROOT);

        let content = layout_line(&state, &items, 0, None, 500.0);
        assert_eq!(content.trailing_inline_item_index, Some(2));
        assert_eq!(content.line.runs.len(), 2);
        assert_eq!(content.line.runs[1].kind, LineRunKind::ForcedLineBreak);
    }

    #[test]
    fn test_float_shrinks_line_from_the_left() {
        let mut tree = BoxTree::new(BoxStyle::block()).unwrap();
        let float = tree
            .append_container(BoxId::ROOT, BoxStyle::floating(FloatSide::Left))
            .unwrap();
        let _text = tree.append_text(BoxId::ROOT, "abc", BoxStyle::default()).unwrap();
        let measurer = ApproximateTextMeasurer::default();
        let mut state = LayoutState::new(&tree, &measurer);
        let float_box = state.display_box_mut(float);
        float_box.content_width = 40.0;
        float_box.content_height = 10.0;
        let items = collect_inline_items(&tree, &measurer, BoxId::ROOT);

        let content = layout_line(&state, &items, 0, None, 100.0);
        assert_eq!(
            content.floats,
            vec![LineFloat {
                layout_box: float,
                fits_on_line: true
            }]
        );
        assert_eq!(content.line.line.rect.x, 40.0);
        assert_eq!(content.line.line.rect.width, 60.0);
        assert_eq!(content.line.runs[0].rect.x, 40.0);
    }

    #[test]
    fn test_line_of_nothing_but_unfitting_content_consumes_nothing() {
        let tree = tree_with_text("abc", BoxStyle::default());
        let measurer = ApproximateTextMeasurer::default();
        let state = LayoutState::new(&tree, &measurer);
        let items = collect_inline_items(&tree, &measurer, BoxId::ROOT);
        let input = LineInput {
            initial_constraints: InitialConstraints {
                top_left: Point::new(0.0, 0.0),
                available_width: 0.0,
                line_is_constrained_by_float: true,
                strut: Strut::default(),
            },
            text_align: TextAlign::Start,
            items: &items,
            leading_index: 0,
            leading_partial_content: None,
        };
        let content = LineLayout::new(&state, LineMode::Layout, input).layout();
        assert_eq!(content.trailing_inline_item_index, None);
        assert!(content.line.runs.is_empty());
    }
}
