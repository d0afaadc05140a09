//! Width, height, margin, border and padding resolution.
//!
//! [§ 10 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html)
//!
//! Percentages resolve against the width of the containing block, which
//! for every box handled here is the content width of its formatting
//! context root.

use crate::box_model::EdgeSizes;
use crate::box_tree::IntrinsicSize;
use crate::display::DisplayBox;
use crate::formatting_context::IntrinsicWidthConstraints;
use crate::layout_state::InlineFormattingState;
use crate::style::BoxStyle;
use crate::values::LengthPercentage;

/// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
/// and [§ 8.5 Border properties](https://www.w3.org/TR/CSS2/box.html#border-properties)
///
/// "The percentage is calculated with respect to the width of the
/// generated box's containing block, even for 'padding-top' and
/// 'padding-bottom'."
pub fn compute_border_and_padding(display_box: &mut DisplayBox, style: &BoxStyle, containing_width: f32) {
    display_box.border = EdgeSizes {
        top: style.border.top,
        right: style.border.right,
        bottom: style.border.bottom,
        left: style.border.left,
    };
    display_box.padding = EdgeSizes {
        top: style.padding.top.resolve(containing_width),
        right: style.padding.right.resolve(containing_width),
        bottom: style.padding.bottom.resolve(containing_width),
        left: style.padding.left.resolve(containing_width),
    };
}

/// [§ 10.3.1 Inline, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-width)
///
/// "A computed value of 'auto' for 'margin-left' or 'margin-right' becomes
/// a used value of '0'."
///
/// The computed values are kept next to the used ones.
pub fn compute_horizontal_margin(display_box: &mut DisplayBox, style: &BoxStyle, containing_width: f32) {
    display_box.computed_margin_start = style.margin.left.resolve(containing_width);
    display_box.computed_margin_end = style.margin.right.resolve(containing_width);
    display_box.margin.left = display_box.computed_margin_start.unwrap_or(0.0);
    display_box.margin.right = display_box.computed_margin_end.unwrap_or(0.0);
}

/// [§ 10.6.2 Inline replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-height)
///
/// "If 'margin-top', or 'margin-bottom' are 'auto', their used value is 0."
pub fn compute_vertical_margin(display_box: &mut DisplayBox, style: &BoxStyle, containing_width: f32) {
    display_box.margin.top = style.margin.top.to_px_or(containing_width, 0.0);
    display_box.margin.bottom = style.margin.bottom.to_px_or(containing_width, 0.0);
}

/// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
///
/// "Then the shrink-to-fit width is: min(max(preferred minimum width,
/// available width), preferred width)."
#[must_use]
pub fn shrink_to_fit_width(constraints: IntrinsicWidthConstraints, available_width: f32) -> f32 {
    constraints.minimum.max(available_width).min(constraints.maximum)
}

/// [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
///
/// "1. The tentative used width is calculated (without 'min-width' and
/// 'max-width') following the rules under 'Calculating widths and
/// margins' above.
/// 2. If the tentative used width is greater than 'max-width', the rules
/// above are applied again using the computed value of 'max-width' as the
/// computed value for 'width'.
/// 3. If the resulting width is smaller than 'min-width', the rules above
/// are applied again using the value of 'min-width' as the computed value
/// for 'width'."
///
/// With no `containing_width` (intrinsic sizing) percentages are ignored.
#[must_use]
pub fn constrain_by_min_max_width(style: &BoxStyle, width: f32, containing_width: Option<f32>) -> f32 {
    let resolve = |length: LengthPercentage| match containing_width {
        Some(reference) => Some(length.resolve(reference)),
        None => length.fixed(),
    };
    let mut width = width;
    if let Some(max_width) = style.max_width.and_then(resolve) {
        width = width.min(max_width);
    }
    if let Some(min_width) = resolve(style.min_width) {
        width = width.max(min_width);
    }
    width
}

/// [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
/// and [§ 10.6.2](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-height)
///
/// Used content `(width, height)` of replaced content. A percentage height
/// behaves as 'auto' since the containing block height is not known
/// during inline layout.
#[must_use]
pub fn replaced_content_size(style: &BoxStyle, intrinsic: IntrinsicSize, containing_width: f32) -> (f32, f32) {
    let specified_width = style.width.resolve(containing_width);
    let specified_height = style.height.fixed();
    let ratio = intrinsic.ratio();

    // STEP 1: Width.
    // "If 'height' and 'width' both have computed values of 'auto' and the
    // element also has an intrinsic width, then that intrinsic width is the
    // used value of 'width'."
    // "If 'width' has a computed value of 'auto', 'height' has some other
    // computed value, and the element does have an intrinsic ratio; then
    // the used value of 'width' is: (used height) * (intrinsic ratio)"
    // "Otherwise, if 'width' has a computed value of 'auto', and the element
    // has an intrinsic width, then that intrinsic width is the used value
    // of 'width'."
    // "Otherwise, if 'width' has a computed value of 'auto', but none of the
    // conditions above are met, then the used value of 'width' becomes
    // 300px."
    let width = match (specified_width, specified_height, ratio) {
        (Some(width), _, _) => width,
        (None, Some(height), Some(ratio)) => height * ratio,
        _ => intrinsic.width.unwrap_or(300.0),
    };
    let width = constrain_by_min_max_width(style, width, Some(containing_width));

    // STEP 2: Height.
    // "Otherwise, if 'height' has a computed value of 'auto', and the
    // element has an intrinsic ratio then the used value of 'height' is:
    // (used width) / (intrinsic ratio)"
    // "Otherwise, if 'height' has a computed value of 'auto', and the
    // element has an intrinsic height, then that intrinsic height is the
    // used value of 'height'."
    // "Otherwise, if 'height' has a computed value of 'auto', but none of
    // the conditions above are met, then the used value of 'height' must
    // be set to the height of the largest rectangle that has a 2:1 ratio,
    // has a height not greater than 150px."
    let height = match (specified_height, specified_width, ratio, intrinsic.height) {
        (Some(height), _, _, _) => height,
        (None, Some(_), Some(ratio), _) => width / ratio,
        (None, _, _, Some(height)) => height,
        (None, _, _, None) => 150.0,
    };
    (width, height)
}

/// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
///
/// "If both 'left' and 'right' are 'auto' (their initial values), the used
/// values are '0'. ... If neither 'left' nor 'right' is 'auto', the
/// position is over-constrained, and one of them has to be ignored. If the
/// 'direction' property of the containing block is 'ltr', the value of
/// 'left' wins and 'right' becomes -'left'."
///
/// Percentage 'top'/'bottom' compute to 'auto' since the containing block
/// height is unknown.
#[must_use]
pub fn relative_offset(style: &BoxStyle, containing_width: f32) -> (f32, f32) {
    let dx = match (style.inset.left, style.inset.right) {
        (Some(left), _) => left.resolve(containing_width),
        (None, Some(right)) => -right.resolve(containing_width),
        (None, None) => 0.0,
    };
    let top = style.inset.top.as_ref().and_then(LengthPercentage::fixed);
    let bottom = style.inset.bottom.as_ref().and_then(LengthPercentage::fixed);
    let dy = match (top, bottom) {
        (Some(top), _) => top,
        (None, Some(bottom)) => -bottom,
        (None, None) => 0.0,
    };
    (dx, dy)
}

/// [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
///
/// "If it has inline-level children, the height is the distance between
/// the top of the topmost line box and the bottom of the bottommost line
/// box. ... In addition, if the element has any floating descendants whose
/// bottom margin edge is below the element's bottom content edge, then the
/// height is increased to include those edges."
///
/// `content_top` is the top content edge in the root's own coordinates.
#[must_use]
pub fn content_height_for_formatting_root(state: Option<&InlineFormattingState>, content_top: f32) -> f32 {
    let Some(state) = state else {
        return 0.0;
    };
    let lines_bottom = state.lines.last().map(|line| line.rect.bottom());
    let bottom = match (lines_bottom, state.floating_state.bottom()) {
        (Some(lines), Some(floats)) => lines.max(floats),
        (Some(bottom), None) | (None, Some(bottom)) => bottom,
        (None, None) => return 0.0,
    };
    (bottom - content_top).max(0.0)
}
