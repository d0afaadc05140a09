//! CSS Float placement and line intrusion.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current line.
//! The most interesting characteristic of a float is that content may flow along
//! its side (or be prohibited from doing so by the 'clear' property)."
//!
//! [`FloatingState`] is the append-only record of floats placed so far in
//! one formatting context. [`FloatingContext`] is a read-only view over it
//! that answers placement and intrusion queries.

use serde::Serialize;

use crate::box_model::{Point, Rect};
use crate::box_tree::BoxId;
use crate::style::FloatSide;

/// A float whose final position is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatItem {
    /// The floating box.
    pub layout_box: BoxId,
    /// Which side it floats to.
    pub side: FloatSide,
    /// Margin box in the formatting context root's coordinates.
    pub margin_box: Rect,
}

impl FloatItem {
    /// Whether this is a left float.
    #[must_use]
    pub fn is_left(&self) -> bool {
        self.side == FloatSide::Left
    }

    fn intersects_band(&self, top: f32, height: f32) -> bool {
        if height > 0.0 {
            self.margin_box.y < top + height && self.margin_box.bottom() > top
        } else {
            self.margin_box.contains_vertical_position(top)
        }
    }
}

/// Floats placed so far in one formatting context, in placement order.
///
/// Within a layout pass the list only grows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FloatingState {
    floats: Vec<FloatItem>,
}

impl FloatingState {
    /// Create an empty floating state.
    #[must_use]
    pub const fn new() -> Self {
        Self { floats: Vec::new() }
    }

    /// Register a float at its final position, making it visible to
    /// subsequent queries.
    pub fn append(&mut self, item: FloatItem) {
        debug_assert!(
            self.floats.iter().all(|f| f.layout_box != item.layout_box),
            "float {} registered twice",
            item.layout_box
        );
        self.floats.push(item);
    }

    /// Placed floats in placement order.
    #[must_use]
    pub fn floats(&self) -> &[FloatItem] {
        &self.floats
    }

    /// Returns true if no float has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.floats.is_empty()
    }

    /// [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// "If the element has any floating descendants whose bottom margin edge
    /// is below the element's bottom content edge, then the height is
    /// increased to include those edges."
    #[must_use]
    pub fn bottom(&self) -> Option<f32> {
        self.floats
            .iter()
            .map(|f| f.margin_box.bottom())
            .reduce(f32::max)
    }

    /// Forget every float. Only used when the whole formatting state is
    /// invalidated.
    pub fn clear(&mut self) {
        self.floats.clear();
    }
}

/// Horizontal intrusion at one vertical position.
///
/// Each edge's `x` is the innermost margin edge of the floats on that side
/// and its `y` the nearest bottom among them, which is where the intrusion
/// next changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Constraints {
    /// Right edge of the intruding left floats.
    pub left: Option<Point>,
    /// Left edge of the intruding right floats.
    pub right: Option<Point>,
}

/// Float queries for one formatting context.
///
/// `containing_left`/`containing_right` bound the root's content box.
#[derive(Debug, Clone, Copy)]
pub struct FloatingContext<'a> {
    state: &'a FloatingState,
    containing_left: f32,
    containing_right: f32,
}

impl<'a> FloatingContext<'a> {
    /// Create a view over `state` for a content box spanning
    /// `[containing_left, containing_right]`.
    #[must_use]
    pub const fn new(state: &'a FloatingState, containing_left: f32, containing_right: f32) -> Self {
        Self {
            state,
            containing_left,
            containing_right,
        }
    }

    /// Returns true if no float has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// "The current and subsequent line boxes created next to the float are
    /// shortened as necessary to make room for the margin box of the float."
    ///
    /// The intrusion of placed floats at `vertical_position`.
    #[must_use]
    pub fn constraints(&self, vertical_position: f32) -> Constraints {
        let mut constraints = Constraints::default();
        for float in &self.state.floats {
            if !float.margin_box.contains_vertical_position(vertical_position) {
                continue;
            }
            let rect = float.margin_box;
            let (slot, edge, innermost): (_, _, fn(f32, f32) -> f32) = if float.is_left() {
                (&mut constraints.left, rect.right(), f32::max)
            } else {
                (&mut constraints.right, rect.x, f32::min)
            };
            *slot = Some(match *slot {
                None => Point::new(edge, rect.bottom()),
                Some(point) => Point::new(innermost(point.x, edge), point.y.min(rect.bottom())),
            });
        }
        constraints
    }

    /// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// Top-left of the margin box for a new float of the given margin box
    /// size whose static position is at `static_top`.
    ///
    /// - Rule 1, 2, 7: the float stays inside the containing block and
    ///   beside earlier floats on both sides.
    /// - Rule 4, 5, 8: as high as possible, never above the static position
    ///   nor above an earlier float.
    /// - Rule 9: as far left (or right) as possible.
    #[must_use]
    pub fn position_for_float(&self, side: FloatSide, width: f32, height: f32, static_top: f32) -> Point {
        // STEP 1: Start at the highest allowed position.
        // [§ 9.5.1 Rule 5](https://www.w3.org/TR/CSS2/visuren.html#float-position)
        //
        // "The outer top of a floating box may not be higher than the outer
        // top of any block or floated box generated by an element earlier in
        // the source document."
        let mut top = self
            .state
            .floats
            .last()
            .map_or(static_top, |f| static_top.max(f.margin_box.y));

        loop {
            // STEP 2: Find the room left between the floats beside this band.
            let (left, right) = self.horizontal_band(top, height);
            let fits = right - left >= width;

            // STEP 3: Move below the nearest float bottom if it does not fit.
            // Once there is nothing left to clear, place it anyway and let
            // it overflow.
            match (fits, self.next_float_bottom_after(top)) {
                (false, Some(next)) => top = next,
                _ => {
                    // [§ 9.5.1 Rule 9](https://www.w3.org/TR/CSS2/visuren.html#float-position)
                    //
                    // "A left-floating box must be put as far to the left as
                    // possible, a right-floating box as far to the right as
                    // possible."
                    let x = match side {
                        FloatSide::Left => left,
                        FloatSide::Right => (right - width).max(left),
                    };
                    return Point::new(x, top);
                }
            }
        }
    }

    /// `(left, right)` of the space between floats intersecting the band
    /// `[top, top + height)`.
    fn horizontal_band(&self, top: f32, height: f32) -> (f32, f32) {
        let mut left = self.containing_left;
        let mut right = self.containing_right;
        for float in self.state.floats.iter().filter(|f| f.intersects_band(top, height)) {
            if float.is_left() {
                left = left.max(float.margin_box.right());
            } else {
                right = right.min(float.margin_box.x);
            }
        }
        (left, right)
    }

    fn next_float_bottom_after(&self, position: f32) -> Option<f32> {
        self.state
            .floats
            .iter()
            .map(|f| f.margin_box.bottom())
            .filter(|&bottom| bottom > position)
            .reduce(f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: usize, side: FloatSide, rect: Rect) -> FloatItem {
        FloatItem {
            layout_box: BoxId(id),
            side,
            margin_box: rect,
        }
    }

    #[test]
    fn test_constraints_without_floats() {
        let state = FloatingState::new();
        let context = FloatingContext::new(&state, 0.0, 400.0);
        assert_eq!(context.constraints(0.0), Constraints::default());
    }

    #[test]
    fn test_constraints_pick_innermost_edge() {
        let mut state = FloatingState::new();
        state.append(item(1, FloatSide::Left, Rect::new(0.0, 0.0, 100.0, 50.0)));
        state.append(item(2, FloatSide::Left, Rect::new(100.0, 0.0, 60.0, 20.0)));
        state.append(item(3, FloatSide::Right, Rect::new(300.0, 0.0, 100.0, 30.0)));
        let context = FloatingContext::new(&state, 0.0, 400.0);

        let at_top = context.constraints(10.0);
        assert_eq!(at_top.left, Some(Point::new(160.0, 20.0)));
        assert_eq!(at_top.right, Some(Point::new(300.0, 30.0)));

        let lower = context.constraints(40.0);
        assert_eq!(lower.left, Some(Point::new(100.0, 50.0)));
        assert_eq!(lower.right, None);

        // Bottom edges are exclusive.
        assert_eq!(context.constraints(50.0), Constraints::default());
    }

    #[test]
    fn test_position_for_float_stacks_then_drops() {
        let mut state = FloatingState::new();
        let first = FloatingContext::new(&state, 0.0, 300.0).position_for_float(
            FloatSide::Left,
            200.0,
            40.0,
            0.0,
        );
        assert_eq!(first, Point::new(0.0, 0.0));
        state.append(item(1, FloatSide::Left, Rect::new(first.x, first.y, 200.0, 40.0)));

        // Fits beside the first float.
        let context = FloatingContext::new(&state, 0.0, 300.0);
        assert_eq!(
            context.position_for_float(FloatSide::Right, 100.0, 10.0, 0.0),
            Point::new(200.0, 0.0)
        );
        // Too wide: moves below the first float.
        assert_eq!(
            context.position_for_float(FloatSide::Left, 150.0, 10.0, 0.0),
            Point::new(0.0, 40.0)
        );
    }

    #[test]
    fn test_float_never_above_earlier_float() {
        let mut state = FloatingState::new();
        state.append(item(1, FloatSide::Left, Rect::new(0.0, 30.0, 50.0, 10.0)));
        let context = FloatingContext::new(&state, 0.0, 300.0);
        let position = context.position_for_float(FloatSide::Right, 50.0, 10.0, 0.0);
        assert_eq!(position, Point::new(250.0, 30.0));
    }

    #[test]
    fn test_overwide_float_overflows_at_left_edge() {
        let state = FloatingState::new();
        let context = FloatingContext::new(&state, 10.0, 110.0);
        assert_eq!(
            context.position_for_float(FloatSide::Right, 500.0, 10.0, 0.0),
            Point::new(10.0, 0.0)
        );
        assert_eq!(state.bottom(), None);
    }
}
