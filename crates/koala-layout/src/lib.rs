//! Inline layout for the Koala renderer: line breaking, float avoidance and
//! atomic inline boxes.
//!
//! # Scope
//!
//! This crate implements:
//! - **Box tree** ([§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen))
//!   - Arena of text, replaced, line-break and container boxes
//!   - JSON documents with inherited text properties
//!
//! - **Inline formatting contexts** ([§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting))
//!   - Inline item collection, soft wrap opportunities (UAX #14)
//!   - Line construction with partial text carried across lines
//!   - `text-align` including `justify`, baseline alignment, struts
//!   - Inline-blocks laid out as nested formatting contexts
//!
//! - **Floats** ([§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats))
//!   - Line shortening next to floats
//!   - Moving lines below floats that leave no room
//!
//! - **Intrinsic sizing** ([CSS Sizing Level 3](https://www.w3.org/TR/css-sizing-3/))
//!   - Min-content and max-content widths, shrink-to-fit
//!
//! # Not Yet Implemented
//!
//! - Block formatting contexts (in-flow block-level children)
//! - Bidi reordering, hyphenation, font shaping
//! - 'vertical-align' other than 'baseline'

/// Points, rectangles and edge sizes.
pub mod box_model;
/// The box tree consumed by layout.
pub mod box_tree;
/// Layout configuration.
pub mod config;
/// Geometry produced by layout.
pub mod display;
/// JSON box-tree documents.
pub mod document;
/// Box tree errors.
pub mod error;
/// Float placement per [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats).
pub mod float;
/// Formatting context dispatch per [§ 9.4 Normal flow](https://www.w3.org/TR/CSS2/visuren.html#normal-flow).
pub mod formatting_context;
/// Width, margin, border and padding resolution.
pub mod geometry;
/// Inline layout per [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting).
pub mod inline;
/// Per-formatting-context layout results.
pub mod layout_state;
/// Computed style values.
pub mod style;
/// Text measurement.
pub mod text;
/// Lengths, percentages and 'auto'.
pub mod values;

pub use box_model::{EdgeSizes, Point, Rect};
pub use box_tree::{BoxId, BoxKind, BoxTree, IntrinsicSize};
pub use config::LayoutConfig;
pub use display::{DisplayBox, Line, Run, RunKind, TextRange};
pub use error::TreeError;
pub use formatting_context::{FormattingContext, IntrinsicWidthConstraints, create_formatting_context};
pub use layout_state::{InlineFormattingState, LayoutState};
pub use style::BoxStyle;
pub use text::{ApproximateTextMeasurer, TextMeasurer};

use tracing::debug;

use crate::geometry::{
    compute_border_and_padding, compute_horizontal_margin, compute_vertical_margin, constrain_by_min_max_width,
    content_height_for_formatting_root,
};

/// Lay out `tree` in a viewport of `config.viewport_width`.
///
/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// "The containing block in which the root element lives is a rectangle
/// called the initial containing block."
///
/// The root is sized against the viewport width: an 'auto' width fills it,
/// an 'auto' height wraps the lines and floats of the root's content.
#[must_use]
pub fn layout_tree<'t>(tree: &'t BoxTree, measurer: &'t dyn TextMeasurer, config: &LayoutConfig) -> LayoutState<'t> {
    let viewport_width = config.viewport_width;
    let root = tree.root();
    let style = tree.style(root);
    let mut layout_state = LayoutState::new(tree, measurer);

    // STEP 1: Root geometry from the initial containing block.
    {
        let display_box = layout_state.display_box_mut(root);
        compute_horizontal_margin(display_box, style, viewport_width);
        compute_vertical_margin(display_box, style, viewport_width);
        compute_border_and_padding(display_box, style, viewport_width);
        let available_width = (viewport_width - display_box.horizontal_margin_border_and_padding()).max(0.0);
        let width = style.width.resolve(viewport_width).unwrap_or(available_width);
        display_box.content_width = constrain_by_min_max_width(style, width, Some(viewport_width));
        display_box.top_left = Point::new(display_box.margin.left, display_box.margin.top);
    }

    // STEP 2: Content.
    create_formatting_context(&layout_state, root).layout_in_flow_content(&mut layout_state);

    // STEP 3: Height now that the lines are known.
    let root_box = layout_state.display_box(root).copied().unwrap_or_default();
    let content_top = root_box.border.top + root_box.padding.top;
    let height = style.height.fixed().unwrap_or_else(|| {
        content_height_for_formatting_root(layout_state.formatting_state(root), content_top)
    });
    layout_state.display_box_mut(root).content_height = height;

    debug!(
        viewport_width,
        width = root_box.content_width,
        height,
        formatting_contexts = layout_state.formatting_roots().count(),
        "layout finished"
    );
    layout_state
}
