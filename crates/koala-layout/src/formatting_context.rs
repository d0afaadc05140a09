//! CSS Formatting Contexts.
//!
//! [§ 9.4 Normal flow](https://www.w3.org/TR/CSS2/visuren.html#normal-flow)
//!
//! "Boxes in the normal flow belong to a formatting context, which may be
//! block or inline, but not both simultaneously."
//!
//! A box that establishes a formatting context is laid out from the
//! outside as a single atomic box; its content is laid out by a formatting
//! context of its own that owns a separate formatting state.

use serde::Serialize;

use crate::box_tree::BoxId;
use crate::inline::InlineFormattingContext;
use crate::layout_state::LayoutState;

/// [§ 5.1 Intrinsic Sizes](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)
///
/// "The min-content size of a box in each axis is the size it would have
/// if it was a float given an auto size in that axis (and no minimum or
/// maximum size in that axis) and if its containing block was zero-sized
/// in that axis. ... The max-content size of a box in each axis is the
/// size it would have if it was a float given an auto size in that axis
/// (and no minimum or maximum size in that axis), and if its containing
/// block was infinitely-sized in that axis."
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IntrinsicWidthConstraints {
    /// Min-content width.
    pub minimum: f32,
    /// Max-content width. Never below `minimum`.
    pub maximum: f32,
}

impl IntrinsicWidthConstraints {
    /// Create a pair, raising `maximum` to `minimum` if needed.
    #[must_use]
    pub fn new(minimum: f32, maximum: f32) -> Self {
        Self {
            minimum,
            maximum: maximum.max(minimum),
        }
    }

    /// Both bounds grown by `value` (margins, borders and padding).
    #[must_use]
    pub fn expand(self, value: f32) -> Self {
        Self {
            minimum: self.minimum + value,
            maximum: self.maximum + value,
        }
    }
}

/// The left edge and width of a formatting context root's content box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HorizontalConstraints {
    /// Left content edge.
    pub left: f32,
    /// Content width.
    pub width: f32,
}

impl HorizontalConstraints {
    /// Right content edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// A layout mode for the content of one formatting context root.
///
/// Implementations keep no state of their own; everything they produce is
/// written into the root's formatting state inside [`LayoutState`].
pub trait FormattingContext {
    /// The box establishing this formatting context.
    fn root(&self) -> BoxId;

    /// Lay out the in-flow and floating content of the root.
    ///
    /// The root's own horizontal geometry must be known.
    fn layout_in_flow_content(&self, layout_state: &mut LayoutState<'_>);

    /// Min-content and max-content widths of the root's content box.
    fn computed_intrinsic_width_constraints(&self, layout_state: &mut LayoutState<'_>) -> IntrinsicWidthConstraints;

    /// Drop lines, runs and floats produced by an earlier layout.
    fn invalidate_formatting_state(&self, layout_state: &mut LayoutState<'_>);
}

/// Create the formatting context for `root`'s content.
///
/// Only inline formatting contexts are supported: every block container
/// root in the tree holds inline-level content.
#[must_use]
pub fn create_formatting_context(layout_state: &LayoutState<'_>, root: BoxId) -> Box<dyn FormattingContext> {
    debug_assert!(
        layout_state.tree().establishes_formatting_context(root),
        "{root} does not establish a formatting context"
    );
    Box::new(InlineFormattingContext::new(root))
}
