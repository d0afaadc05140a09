//! A single line box under construction.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "The rectangular area that contains the boxes that form a line is called
//! a line box."
//!
//! Runs are appended with their advance only; horizontal positions, the
//! baseline and the line height are resolved when the line closes.

use serde::Serialize;

use crate::box_model::{Point, Rect};
use crate::box_tree::BoxId;
use crate::display::{self, TextRange};
use crate::style::TextAlign;

/// Whether lines are built for real or only measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineMode {
    /// Lines are committed to the formatting state.
    Layout,
    /// Lines are only measured for min/max-content widths. Alignment and
    /// emergency word splitting are skipped.
    IntrinsicSizing,
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "Each line box starts with a zero-width inline box with the element's
/// font and line height properties. We call that imaginary box a 'strut.'"
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Strut {
    /// Layout bounds above the baseline.
    pub ascent: f32,
    /// Layout bounds below the baseline.
    pub descent: f32,
}

/// Geometry a line starts from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InitialConstraints {
    /// Logical top-left of the line, already pushed right by left floats.
    pub top_left: Point,
    /// Width left between the floats.
    pub available_width: f32,
    /// Whether a float narrows this line.
    pub line_is_constrained_by_float: bool,
    /// Minimum line height contribution.
    pub strut: Strut,
}

/// What a [`LineRun`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineRunKind {
    /// Opening edge of an inline container.
    ContainerStart,
    /// Closing edge of an inline container.
    ContainerEnd,
    /// An atomic inline.
    Box,
    /// A text slice.
    Text {
        /// Byte range inside the text box.
        range: TextRange,
        /// Whether the slice is collapsible whitespace.
        is_whitespace: bool,
    },
    /// A forced line break.
    ForcedLineBreak,
}

/// Vertical and horizontal metrics of a run, relative to its own advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunMetrics {
    /// Distance from the start of the advance to the left of the rect.
    pub offset: f32,
    /// Width of the rect.
    pub width: f32,
    /// Height of the rect.
    pub height: f32,
    /// Baseline position from the top of the rect.
    pub baseline: f32,
    /// Layout bounds above the baseline.
    pub ascent: f32,
    /// Layout bounds below the baseline.
    pub descent: f32,
}

/// One item placed on a line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineRun {
    /// The box the run belongs to.
    pub layout_box: BoxId,
    /// Run kind.
    pub kind: LineRunKind,
    /// Horizontal space the run takes on the line, margins included.
    pub logical_width: f32,
    /// Final rectangle; only meaningful once the line is closed.
    pub rect: Rect,
    /// Placement metrics.
    pub metrics: RunMetrics,
    /// Whitespace collapsed away (leading, repeated or trailing).
    pub is_collapsed: bool,
}

impl LineRun {
    /// Create a run that has not been positioned yet.
    #[must_use]
    pub fn new(layout_box: BoxId, kind: LineRunKind, logical_width: f32, metrics: RunMetrics) -> Self {
        Self {
            layout_box,
            kind,
            logical_width,
            rect: Rect::default(),
            metrics,
            is_collapsed: false,
        }
    }

    /// Whether the run is collapsible whitespace.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self.kind, LineRunKind::Text { is_whitespace: true, .. })
    }

    /// Whether the run is a container start or end.
    #[must_use]
    pub const fn is_container_boundary(&self) -> bool {
        matches!(self.kind, LineRunKind::ContainerStart | LineRunKind::ContainerEnd)
    }

    /// Whether the run makes the line non-empty.
    ///
    /// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// "Line boxes that contain no text, no preserved white space, no inline
    /// elements with non-zero margins, padding, or borders or other in-flow
    /// content (such as images, inline blocks or inline tables), and do not
    /// end with a preserved newline must be treated as zero-height line
    /// boxes."
    #[must_use]
    pub fn has_content(&self) -> bool {
        match self.kind {
            LineRunKind::Text { is_whitespace, .. } => !is_whitespace,
            LineRunKind::Box | LineRunKind::ForcedLineBreak => true,
            LineRunKind::ContainerStart | LineRunKind::ContainerEnd => self.logical_width > 0.0,
        }
    }
}

/// The result of closing a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedLine {
    /// The finished line box.
    pub line: display::Line,
    /// Positioned runs.
    pub runs: Vec<LineRun>,
    /// Sum of the run advances after trimming, before alignment.
    pub content_width: f32,
}

/// A line under construction.
#[derive(Debug, Clone)]
pub struct Line {
    initial: InitialConstraints,
    mode: LineMode,
    logical_left: f32,
    available_width: f32,
    content_width: f32,
    runs: Vec<LineRun>,
}

impl Line {
    /// Start an empty line.
    #[must_use]
    pub const fn new(initial: InitialConstraints, mode: LineMode) -> Self {
        Self {
            initial,
            mode,
            logical_left: initial.top_left.x,
            available_width: initial.available_width,
            content_width: 0.0,
            runs: Vec::new(),
        }
    }

    /// Width still free on the line.
    #[must_use]
    pub fn remaining_width(&self) -> f32 {
        self.available_width - self.content_width
    }

    /// Runs appended so far.
    #[must_use]
    pub fn runs(&self) -> &[LineRun] {
        &self.runs
    }

    /// Whether anything visible has been appended.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.runs.iter().any(LineRun::has_content)
    }

    /// Append a run at the end of the line.
    pub fn append(&mut self, run: LineRun) {
        self.content_width += run.logical_width;
        self.runs.push(run);
    }

    /// A left float took `width` off the start of the line.
    pub fn move_logical_left(&mut self, width: f32) {
        self.logical_left += width;
        self.available_width -= width;
    }

    /// A right float took `width` off the end of the line.
    pub fn move_logical_right(&mut self, width: f32) {
        self.available_width -= width;
    }

    /// [§ 4.1.2 Phase II: Trimming and Positioning](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
    ///
    /// "A sequence of collapsible spaces at the end of a line is removed."
    fn trim_trailing_whitespace(&mut self) {
        for run in self.runs.iter_mut().rev() {
            if run.is_container_boundary() {
                continue;
            }
            if !run.is_whitespace() {
                break;
            }
            self.content_width -= run.logical_width;
            run.logical_width = 0.0;
            run.metrics.width = 0.0;
            run.is_collapsed = true;
        }
    }

    /// [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
    ///
    /// "If the text is justified, ... if an element's contents are
    /// justified, the UA may stretch spaces and words in inline boxes (but
    /// not inline-table and inline-block boxes) as well."
    fn justify(&mut self, slack: f32) {
        let opportunities = self
            .runs
            .iter()
            .filter(|run| run.is_whitespace() && !run.is_collapsed && run.logical_width > 0.0)
            .count();
        if opportunities == 0 {
            return;
        }
        let expansion = slack / opportunities as f32;
        for run in &mut self.runs {
            if run.is_whitespace() && !run.is_collapsed && run.logical_width > 0.0 {
                run.logical_width += expansion;
                run.metrics.width += expansion;
            }
        }
        self.content_width += slack;
    }

    /// Finish the line: trim, align, resolve the baseline and position
    /// every run.
    ///
    /// `justify_allowed` is false on the last line and on lines ended by a
    /// forced break.
    #[must_use]
    pub fn close(mut self, text_align: TextAlign, justify_allowed: bool) -> ClosedLine {
        // STEP 1: Trailing whitespace never takes space.
        self.trim_trailing_whitespace();
        let content_width = self.content_width;

        // STEP 2: Horizontal alignment.
        // Content that overflows the line is start aligned.
        let slack = (self.available_width - self.content_width).max(0.0);
        let mut offset = 0.0;
        if self.mode == LineMode::Layout && slack > 0.0 {
            match text_align {
                TextAlign::Start | TextAlign::Left => {}
                TextAlign::End | TextAlign::Right => offset = slack,
                TextAlign::Center => offset = slack / 2.0,
                TextAlign::Justify => {
                    if justify_allowed {
                        self.justify(slack);
                    }
                }
            }
        }

        // STEP 3: Baseline and line height.
        // [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
        //
        // "The line box height is the distance between the uppermost box top
        // and the lowermost box bottom."
        let top = self.initial.top_left.y;
        let (baseline, height) = if self.has_content() {
            let ascent = self
                .runs
                .iter()
                .map(|run| run.metrics.ascent)
                .fold(self.initial.strut.ascent, f32::max);
            let descent = self
                .runs
                .iter()
                .map(|run| run.metrics.descent)
                .fold(self.initial.strut.descent, f32::max);
            (ascent, ascent + descent)
        } else {
            (0.0, 0.0)
        };

        // STEP 4: Position runs.
        let mut cursor = self.logical_left + offset;
        for run in &mut self.runs {
            let (y, run_height) = if height > 0.0 {
                (top + baseline - run.metrics.baseline, run.metrics.height)
            } else {
                (top, 0.0)
            };
            run.rect = Rect::new(cursor + run.metrics.offset, y, run.metrics.width, run_height);
            cursor += run.logical_width;
        }

        // STEP 5: Overflow.
        let rect = Rect::new(self.logical_left, top, self.available_width.max(0.0), height);
        let ink_overflow = self
            .runs
            .iter()
            .filter(|run| run.rect.width > 0.0 || run.rect.height > 0.0)
            .map(|run| run.rect)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(rect);
        let scrollable_overflow = rect.union(&ink_overflow);

        ClosedLine {
            line: display::Line {
                rect,
                scrollable_overflow,
                ink_overflow,
                baseline,
            },
            runs: self.runs,
            content_width,
        }
    }
}
