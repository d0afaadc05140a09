//! Layout results handed to paint.
//!
//! Geometry is expressed in the coordinate space of the border box of the
//! formatting context root that produced it.

use serde::Serialize;
use strum_macros::Display;

use crate::box_model::{EdgeSizes, Point, Rect};
use crate::box_tree::BoxId;

/// Per-box geometry record.
///
/// [§ 8.1 Box dimensions](https://www.w3.org/TR/CSS2/box.html#box-dimensions)
///
/// Inline containers keep their computed horizontal margins apart from the
/// used ones: on the line only the used values take space, while the
/// computed ones are what the style asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DisplayBox {
    /// Top-left corner of the border box.
    pub top_left: Point,
    /// Content box width.
    pub content_width: f32,
    /// Content box height.
    pub content_height: f32,
    /// Used margins.
    pub margin: EdgeSizes,
    /// Computed start margin; `None` while it is 'auto'.
    pub computed_margin_start: Option<f32>,
    /// Computed end margin; `None` while it is 'auto'.
    pub computed_margin_end: Option<f32>,
    /// Border widths.
    pub border: EdgeSizes,
    /// Padding.
    pub padding: EdgeSizes,
}

impl DisplayBox {
    /// Left border edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.top_left.x
    }

    /// Top border edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.top_left.y
    }

    /// Right border edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left() + self.border_box_width()
    }

    /// Bottom border edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top() + self.border_box_height()
    }

    /// Border box width.
    #[must_use]
    pub fn border_box_width(&self) -> f32 {
        self.border.left + self.padding.left + self.content_width + self.padding.right + self.border.right
    }

    /// Border box height.
    #[must_use]
    pub fn border_box_height(&self) -> f32 {
        self.border.top + self.padding.top + self.content_height + self.padding.bottom + self.border.bottom
    }

    /// Left edge of the content box.
    #[must_use]
    pub fn content_box_left(&self) -> f32 {
        self.left() + self.border.left + self.padding.left
    }

    /// Top edge of the content box.
    #[must_use]
    pub fn content_box_top(&self) -> f32 {
        self.top() + self.border.top + self.padding.top
    }

    /// Border box rectangle.
    #[must_use]
    pub fn border_box(&self) -> Rect {
        Rect::new(
            self.left(),
            self.top(),
            self.border_box_width(),
            self.border_box_height(),
        )
    }

    /// Content box rectangle.
    #[must_use]
    pub fn content_box(&self) -> Rect {
        Rect::new(
            self.content_box_left(),
            self.content_box_top(),
            self.content_width,
            self.content_height,
        )
    }

    /// [§ 8.1](https://www.w3.org/TR/CSS2/box.html#box-dimensions)
    ///
    /// "The margin edge surrounds the box margin."
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        Rect::new(
            self.left() - self.margin.left,
            self.top() - self.margin.top,
            self.margin_box_width(),
            self.margin_box_height(),
        )
    }

    /// Margin box width.
    #[must_use]
    pub fn margin_box_width(&self) -> f32 {
        self.margin.left + self.border_box_width() + self.margin.right
    }

    /// Margin box height.
    #[must_use]
    pub fn margin_box_height(&self) -> f32 {
        self.margin.top + self.border_box_height() + self.margin.bottom
    }

    /// Used horizontal margins, borders and padding.
    #[must_use]
    pub fn horizontal_margin_border_and_padding(&self) -> f32 {
        self.margin.horizontal() + self.border.horizontal() + self.padding.horizontal()
    }

    /// Move the box so its margin box starts at `margin_box_top_left`.
    pub fn set_margin_box_top_left(&mut self, margin_box_top_left: Point) {
        self.top_left = Point::new(
            margin_box_top_left.x + self.margin.left,
            margin_box_top_left.y + self.margin.top,
        );
    }

    /// Resize so the border box is `rect`, keeping border and padding.
    pub fn set_border_box(&mut self, rect: Rect) {
        self.top_left = rect.top_left();
        self.content_width = (rect.width - self.border.horizontal() - self.padding.horizontal()).max(0.0);
        self.content_height = (rect.height - self.border.vertical() - self.padding.vertical()).max(0.0);
    }
}

/// A finished line box.
///
/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "The rectangular area that contains the boxes that form a line is called
/// a line box."
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Line {
    /// Logical rectangle of the line box.
    pub rect: Rect,
    /// Area covered by the line's content, including overflow past the
    /// line's own width and height.
    pub scrollable_overflow: Rect,
    /// Area painted by the line's content.
    pub ink_overflow: Rect,
    /// Baseline offset from the top of the line.
    pub baseline: f32,
}

/// What a [`Run`] paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RunKind {
    /// A slice of a text box.
    Text,
    /// An atomic inline: replaced content or an inline-block.
    Box,
    /// A forced line break.
    LineBreak,
}

/// Byte range into a text box's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextRange {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Create a range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// One painted placement of an inline item on one line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Run {
    /// The box this run paints.
    pub layout_box: BoxId,
    /// Run kind.
    pub kind: RunKind,
    /// Logical rectangle in the formatting context root's coordinates.
    pub rect: Rect,
    /// Text sub-range, for text runs.
    pub text: Option<TextRange>,
    /// Index of the line this run sits on.
    pub line_index: usize,
}
