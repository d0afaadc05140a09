//! CSS Inline Layout.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block. Horizontal
//! margins, borders, and padding are respected between these boxes."
//!
//! [`InlineFormattingContext`] drives the whole process for one root:
//! geometry pre-pass, item collection, the line loop with float avoidance,
//! and the translation of line runs into display boxes.

pub mod item;
pub mod line;
pub mod line_breaker;
pub mod line_layout;

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::box_model::{Point, Rect};
use crate::box_tree::{BoxId, BoxKind};
use crate::display::{self, DisplayBox, RunKind};
use crate::float::{FloatItem, FloatingContext};
use crate::formatting_context::{
    FormattingContext, HorizontalConstraints, IntrinsicWidthConstraints, create_formatting_context,
};
use crate::geometry::{
    compute_border_and_padding, compute_horizontal_margin, compute_vertical_margin, constrain_by_min_max_width,
    content_height_for_formatting_root, relative_offset, replaced_content_size, shrink_to_fit_width,
};
use crate::layout_state::LayoutState;
use crate::style::FloatSide;

use self::item::collect_inline_items;
use self::line::{InitialConstraints, LineMode, LineRunKind, Strut};
use self::line_layout::{LineContent, LineInput, LineLayout, PartialContent, strut};

/// The inline formatting context established by one root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineFormattingContext {
    root: BoxId,
}

/// An inline container whose end has not been seen yet.
#[derive(Debug, Clone, Copy)]
struct OpenContainer {
    layout_box: BoxId,
    /// Left border edge on the current line; `None` when the container
    /// continues from a previous line.
    left: Option<f32>,
    /// Top of the painted area relative to the line's baseline.
    baseline_offset: f32,
    height: f32,
}

/// Per-layout bookkeeping for boxes that produce several fragments.
#[derive(Debug, Default)]
struct FragmentTracker {
    seen: HashSet<BoxId>,
    open_containers: Vec<OpenContainer>,
}

impl InlineFormattingContext {
    /// The inline formatting context of `root`.
    #[must_use]
    pub const fn new(root: BoxId) -> Self {
        Self { root }
    }

    fn root_geometry(&self, layout_state: &LayoutState<'_>) -> DisplayBox {
        layout_state
            .display_box(self.root)
            .copied()
            .unwrap_or_default()
    }

    fn horizontal_constraints(&self, layout_state: &LayoutState<'_>) -> HorizontalConstraints {
        let root = self.root_geometry(layout_state);
        HorizontalConstraints {
            left: root.border.left + root.padding.left,
            width: root.content_width,
        }
    }

    fn collect_inline_content_if_needed(&self, layout_state: &mut LayoutState<'_>) {
        let tree = layout_state.tree();
        let measurer = layout_state.measurer();
        let state = layout_state.ensure_formatting_state(self.root);
        if state.inline_items.is_empty() {
            state.inline_items = collect_inline_items(tree, measurer, self.root);
        }
    }

    /// Pre-order walk over the boxes of this context, stepping over the
    /// content of nested formatting context roots.
    fn for_each_box(&self, layout_state: &mut LayoutState<'_>, mut visit: impl FnMut(&mut LayoutState<'_>, BoxId, bool)) {
        let tree = layout_state.tree();
        let mut next = tree.first_child(self.root);
        while let Some(layout_box) = next {
            let establishes = tree.establishes_formatting_context(layout_box);
            visit(layout_state, layout_box, establishes);
            next = tree.next_in_pre_order(layout_box, self.root, !establishes);
        }
    }

    // --- Geometry ----------------------------------------------------------

    /// Margins, borders, padding and size of a box that does not establish
    /// a formatting context.
    fn compute_horizontal_and_vertical_geometry(
        layout_state: &mut LayoutState<'_>,
        layout_box: BoxId,
        containing_width: f32,
    ) {
        let tree = layout_state.tree();
        let style = tree.style(layout_box);
        let display_box = layout_state.display_box_mut(layout_box);
        match tree.kind(layout_box) {
            BoxKind::Container => {
                // [§ 10.3.1](https://www.w3.org/TR/CSS2/visudet.html#inline-width)
                //
                // "The 'width' property does not apply." The content size
                // comes from the runs once lines are built.
                *display_box = DisplayBox::default();
                compute_horizontal_margin(display_box, style, containing_width);
                compute_border_and_padding(display_box, style, containing_width);
            }
            BoxKind::Replaced(intrinsic) => {
                *display_box = DisplayBox::default();
                compute_horizontal_margin(display_box, style, containing_width);
                compute_border_and_padding(display_box, style, containing_width);
                compute_vertical_margin(display_box, style, containing_width);
                let (width, height) = replaced_content_size(style, *intrinsic, containing_width);
                display_box.content_width = width;
                display_box.content_height = height;
            }
            BoxKind::Text(_) | BoxKind::LineBreak => *display_box = DisplayBox::default(),
        }
    }

    /// [§ 10.3.9 'Inline-block', non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#inlineblock-width)
    ///
    /// "If 'width' is 'auto', the used value is the shrink-to-fit width as
    /// for floating elements. A computed value of 'auto' for 'margin-left'
    /// or 'margin-right' becomes a used value of '0'."
    fn compute_width_for_formatting_root(
        layout_state: &mut LayoutState<'_>,
        layout_box: BoxId,
        containing_width: f32,
    ) -> f32 {
        let style = layout_state.tree().style(layout_box);
        if let Some(width) = style.width.resolve(containing_width) {
            return constrain_by_min_max_width(style, width, Some(containing_width));
        }
        let horizontal_edges = layout_state
            .display_box(layout_box)
            .map_or(0.0, DisplayBox::horizontal_margin_border_and_padding);
        let available_width = (containing_width - horizontal_edges).max(0.0);
        let intrinsic = create_formatting_context(layout_state, layout_box).computed_intrinsic_width_constraints(layout_state);
        constrain_by_min_max_width(style, shrink_to_fit_width(intrinsic, available_width), Some(containing_width))
    }

    /// Size a nested formatting context root and lay out its content.
    fn layout_formatting_context_root(layout_state: &mut LayoutState<'_>, layout_box: BoxId, containing_width: f32) {
        let style = layout_state.tree().style(layout_box);

        // STEP 1: Borders, padding and horizontal margins are known upfront.
        {
            let display_box = layout_state.display_box_mut(layout_box);
            *display_box = DisplayBox::default();
            compute_horizontal_margin(display_box, style, containing_width);
            compute_border_and_padding(display_box, style, containing_width);
        }

        // STEP 2: Width, possibly from the content's intrinsic widths.
        let width = Self::compute_width_for_formatting_root(layout_state, layout_box, containing_width);
        layout_state.display_box_mut(layout_box).content_width = width;

        // STEP 3: Lay out the content in its own formatting context.
        let formatting_context = create_formatting_context(layout_state, layout_box);
        formatting_context.layout_in_flow_content(layout_state);

        // STEP 4: Height depends on the content.
        let content_top = layout_state
            .display_box(layout_box)
            .map_or(0.0, |display_box| display_box.border.top + display_box.padding.top);
        let height = style.height.fixed().unwrap_or_else(|| {
            content_height_for_formatting_root(layout_state.formatting_state(layout_box), content_top)
        });
        let display_box = layout_state.display_box_mut(layout_box);
        display_box.content_height = height;
        compute_vertical_margin(display_box, style, containing_width);
    }

    /// Margin-box intrinsic widths of a nested formatting context root.
    fn compute_intrinsic_width_for_formatting_root(&self, layout_state: &mut LayoutState<'_>, layout_box: BoxId) {
        let style = layout_state.tree().style(layout_box);
        let horizontal_edges = {
            let display_box = layout_state.display_box_mut(layout_box);
            *display_box = DisplayBox::default();
            compute_horizontal_margin(display_box, style, 0.0);
            compute_border_and_padding(display_box, style, 0.0);
            display_box.horizontal_margin_border_and_padding()
        };
        let cached = layout_state
            .formatting_state(self.root)
            .and_then(|state| state.intrinsic_width_constraints_for_box.get(&layout_box))
            .is_some();
        if cached {
            return;
        }
        let content = match style.width.fixed() {
            Some(width) => IntrinsicWidthConstraints::new(width, width),
            None => create_formatting_context(layout_state, layout_box).computed_intrinsic_width_constraints(layout_state),
        };
        let content = IntrinsicWidthConstraints::new(
            constrain_by_min_max_width(style, content.minimum, None),
            constrain_by_min_max_width(style, content.maximum, None),
        );
        let _ = layout_state
            .ensure_formatting_state(self.root)
            .intrinsic_width_constraints_for_box
            .insert(layout_box, content.expand(horizontal_edges));
    }

    // --- Lines -------------------------------------------------------------

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// "The current and subsequent line boxes created next to the float are
    /// shortened as necessary to make room for the margin box of the
    /// float."
    ///
    /// Float edges outside the content box do not narrow the line.
    fn initial_constraints_for_line(
        &self,
        layout_state: &LayoutState<'_>,
        constraints: HorizontalConstraints,
        line_top: f32,
        strut: Strut,
    ) -> InitialConstraints {
        let mut left = constraints.left;
        let mut right = constraints.right();
        let mut line_is_constrained_by_float = false;
        if let Some(state) = layout_state.formatting_state(self.root) {
            let floating_context = FloatingContext::new(&state.floating_state, constraints.left, constraints.right());
            if !floating_context.is_empty() {
                let float_constraints = floating_context.constraints(line_top);
                if let Some(edge) = float_constraints.left.filter(|edge| edge.x > constraints.left) {
                    left = edge.x;
                    line_is_constrained_by_float = true;
                }
                if let Some(edge) = float_constraints.right.filter(|edge| edge.x < constraints.right()) {
                    right = edge.x;
                    line_is_constrained_by_float = true;
                }
            }
        }
        InitialConstraints {
            top_left: Point::new(left, line_top),
            available_width: (right - left).max(0.0),
            line_is_constrained_by_float,
            strut,
        }
    }

    /// Where to retry a line that could not take any content: the nearest
    /// bottom of the floats intruding at `line_top`.
    fn next_line_top_below_floats(&self, layout_state: &LayoutState<'_>, constraints: HorizontalConstraints, line_top: f32) -> Option<f32> {
        let state = layout_state.formatting_state(self.root)?;
        let float_constraints =
            FloatingContext::new(&state.floating_state, constraints.left, constraints.right()).constraints(line_top);
        let left = float_constraints.left.unwrap_or(Point::MAX);
        let right = float_constraints.right.unwrap_or(Point::MAX);
        let bottom = left.y.min(right.y);
        (bottom < f32::MAX).then_some(bottom)
    }

    fn layout_lines(&self, layout_state: &mut LayoutState<'_>, constraints: HorizontalConstraints) {
        let tree = layout_state.tree();
        let root_style = tree.style(self.root);
        let strut = strut(root_style, layout_state.measurer());
        let items = std::mem::take(&mut layout_state.ensure_formatting_state(self.root).inline_items);
        let root = self.root_geometry(layout_state);
        let mut line_top = root.border.top + root.padding.top;
        let mut leading_index = 0;
        let mut leading_partial_content: Option<PartialContent> = None;
        let mut tracker = FragmentTracker::default();

        while leading_index < items.len() {
            let initial_constraints = self.initial_constraints_for_line(layout_state, constraints, line_top, strut);
            let input = LineInput {
                initial_constraints,
                text_align: root_style.text_align,
                items: &items,
                leading_index,
                leading_partial_content,
            };
            let content = LineLayout::new(layout_state, LineMode::Layout, input).layout();

            let Some(trailing_index) = content.trailing_inline_item_index else {
                // [§ 9.5](https://www.w3.org/TR/CSS2/visuren.html#floats)
                //
                // "If a shortened line box is too small to contain any
                // content, then the line box is shifted downward ... until
                // either some content fits or there are no more floats
                // present."
                let next_top = self.next_line_top_below_floats(layout_state, constraints, line_top);
                debug_assert!(next_top.is_some(), "a line can only stay empty next to a float");
                let Some(next_top) = next_top else {
                    warn!(root = %self.root, item = leading_index, "no line could take the remaining content");
                    break;
                };
                trace!(root = %self.root, from = line_top, to = next_top, "line moves below floats");
                line_top = next_top;
                continue;
            };

            self.set_display_boxes_for_line(layout_state, &content, constraints, &mut tracker);
            line_top = content.line.line.rect.bottom();
            leading_index = trailing_index;
            leading_partial_content = content.trailing_partial_content;
        }

        layout_state.ensure_formatting_state(self.root).inline_items = items;
    }

    /// Widest line when every line gets `available_width`.
    ///
    /// Nested formatting roots take the width `pick` selects from their
    /// intrinsic widths; floats add their margin box width to the line
    /// they are met on.
    fn maximum_line_width(
        &self,
        layout_state: &mut LayoutState<'_>,
        available_width: f32,
        pick: fn(&IntrinsicWidthConstraints) -> f32,
    ) -> f32 {
        let nested: Vec<(BoxId, IntrinsicWidthConstraints)> = layout_state
            .formatting_state(self.root)
            .map(|state| {
                state
                    .intrinsic_width_constraints_for_box
                    .iter()
                    .map(|(&layout_box, &constraints)| (layout_box, constraints))
                    .collect()
            })
            .unwrap_or_default();
        for (layout_box, constraints) in nested {
            let display_box = layout_state.display_box_mut(layout_box);
            display_box.content_width = (pick(&constraints) - display_box.horizontal_margin_border_and_padding()).max(0.0);
        }

        let strut = strut(layout_state.tree().style(self.root), layout_state.measurer());
        let items = std::mem::take(&mut layout_state.ensure_formatting_state(self.root).inline_items);
        let mut maximum: f32 = 0.0;
        let mut leading_index = 0;
        let mut leading_partial_content = None;
        while leading_index < items.len() {
            let input = LineInput {
                initial_constraints: InitialConstraints {
                    top_left: Point::default(),
                    available_width,
                    line_is_constrained_by_float: false,
                    strut,
                },
                text_align: layout_state.tree().style(self.root).text_align,
                items: &items,
                leading_index,
                leading_partial_content,
            };
            let content = LineLayout::new(layout_state, LineMode::IntrinsicSizing, input).layout();
            let floats_width: f32 = content
                .floats
                .iter()
                .filter_map(|float| layout_state.display_box(float.layout_box))
                .map(DisplayBox::margin_box_width)
                .sum();
            maximum = maximum.max(content.line.content_width + floats_width);
            let Some(trailing_index) = content.trailing_inline_item_index else {
                break;
            };
            leading_index = trailing_index;
            leading_partial_content = content.trailing_partial_content;
        }
        layout_state.ensure_formatting_state(self.root).inline_items = items;
        maximum
    }

    // --- Display boxes -----------------------------------------------------

    /// Relative offsets of `layout_box` (when atomic) and of its inline
    /// container ancestors.
    fn accumulated_relative_offset(&self, layout_state: &LayoutState<'_>, layout_box: BoxId, containing_width: f32) -> (f32, f32) {
        let tree = layout_state.tree();
        let atomic = tree.is_replaced(layout_box) || tree.is_container(layout_box);
        let own = atomic.then_some(layout_box);
        let ancestors = tree
            .ancestors(layout_box)
            .take_while(|&ancestor| ancestor != self.root);
        own.into_iter()
            .chain(ancestors)
            .filter(|&positioned| tree.is_in_flow_positioned(positioned))
            .map(|positioned| relative_offset(tree.style(positioned), containing_width))
            .fold((0.0, 0.0), |(x, y), (dx, dy)| (x + dx, y + dy))
    }

    /// Grow the display box of `layout_box` to cover `fragment`.
    ///
    /// The first fragment of a layout sets the geometry; later ones extend
    /// it to the bounding box of all of them.
    fn record_fragment(layout_state: &mut LayoutState<'_>, tracker: &mut FragmentTracker, layout_box: BoxId, fragment: Rect) {
        let display_box = layout_state.display_box_mut(layout_box);
        let border_box = if tracker.seen.insert(layout_box) {
            fragment
        } else {
            display_box.border_box().union(&fragment)
        };
        display_box.set_border_box(border_box);
    }

    fn set_display_boxes_for_line(
        &self,
        layout_state: &mut LayoutState<'_>,
        content: &LineContent,
        constraints: HorizontalConstraints,
        tracker: &mut FragmentTracker,
    ) {
        let tree = layout_state.tree();
        let line = content.line.line;

        // STEP 1: Floats, now that the line's position is final.
        for float in &content.floats {
            let static_top = if float.fits_on_line { line.rect.y } else { line.rect.bottom() };
            let side = tree.style(float.layout_box).float.unwrap_or(FloatSide::Left);
            let size = layout_state
                .display_box(float.layout_box)
                .copied()
                .unwrap_or_default();
            let position = {
                let state = layout_state.ensure_formatting_state(self.root);
                FloatingContext::new(&state.floating_state, constraints.left, constraints.right()).position_for_float(
                    side,
                    size.margin_box_width(),
                    size.margin_box_height(),
                    static_top,
                )
            };
            let display_box = layout_state.display_box_mut(float.layout_box);
            display_box.set_margin_box_top_left(position);
            let margin_box = display_box.margin_box();
            trace!(float = %float.layout_box, x = margin_box.x, y = margin_box.y, "float placed");
            layout_state
                .ensure_formatting_state(self.root)
                .floating_state
                .append(FloatItem {
                    layout_box: float.layout_box,
                    side,
                    margin_box,
                });
        }

        // STEP 2: The line box.
        let line_index = {
            let state = layout_state.ensure_formatting_state(self.root);
            state.lines.push(line);
            state.lines.len() - 1
        };
        let baseline = line.rect.y + line.baseline;

        // STEP 3: Runs and the boxes they belong to.
        let mut runs = Vec::with_capacity(content.line.runs.len());
        for run in &content.line.runs {
            let layout_box = run.layout_box;
            match run.kind {
                LineRunKind::Box => {
                    let (dx, dy) = self.accumulated_relative_offset(layout_state, layout_box, constraints.width);
                    let rect = run.rect.translate(dx, dy);
                    layout_state.display_box_mut(layout_box).top_left = rect.top_left();
                    runs.push(display::Run {
                        layout_box,
                        kind: RunKind::Box,
                        rect,
                        text: None,
                        line_index,
                    });
                }
                LineRunKind::ForcedLineBreak => {
                    let (dx, dy) = self.accumulated_relative_offset(layout_state, layout_box, constraints.width);
                    let rect = run.rect.translate(dx, dy);
                    layout_state.display_box_mut(layout_box).set_border_box(rect);
                    runs.push(display::Run {
                        layout_box,
                        kind: RunKind::LineBreak,
                        rect,
                        text: None,
                        line_index,
                    });
                }
                LineRunKind::Text { range, .. } => {
                    let (dx, dy) = self.accumulated_relative_offset(layout_state, layout_box, constraints.width);
                    let rect = run.rect.translate(dx, dy);
                    if !run.is_collapsed || !tracker.seen.contains(&layout_box) {
                        Self::record_fragment(layout_state, tracker, layout_box, rect);
                    }
                    runs.push(display::Run {
                        layout_box,
                        kind: RunKind::Text,
                        rect,
                        text: Some(range),
                        line_index,
                    });
                }
                LineRunKind::ContainerStart => tracker.open_containers.push(OpenContainer {
                    layout_box,
                    left: Some(run.rect.x),
                    baseline_offset: run.rect.y - baseline,
                    height: run.rect.height,
                }),
                LineRunKind::ContainerEnd => {
                    let Some(position) = tracker
                        .open_containers
                        .iter()
                        .rposition(|open| open.layout_box == layout_box)
                    else {
                        continue;
                    };
                    let open = tracker.open_containers.remove(position);
                    let left = open.left.unwrap_or(line.rect.x);
                    let fragment = Rect::new(left, baseline + open.baseline_offset, run.rect.right() - left, open.height);
                    self.record_container_fragment(layout_state, tracker, layout_box, fragment, constraints.width);
                }
            }
        }

        // STEP 4: Containers that continue on the next line end at the
        // line's content edge here.
        let content_right = content
            .line
            .runs
            .iter()
            .map(|run| run.rect.right())
            .fold(line.rect.x, f32::max);
        let open_containers = std::mem::take(&mut tracker.open_containers);
        for mut open in open_containers {
            let left = open.left.unwrap_or(line.rect.x);
            let fragment = Rect::new(
                left,
                baseline + open.baseline_offset,
                (content_right - left).max(0.0),
                open.height,
            );
            self.record_container_fragment(layout_state, tracker, open.layout_box, fragment, constraints.width);
            open.left = None;
            tracker.open_containers.push(open);
        }

        trace!(root = %self.root, line = line_index, runs = runs.len(), y = line.rect.y, "line committed");
        layout_state.ensure_formatting_state(self.root).runs.extend(runs);
    }

    fn record_container_fragment(
        &self,
        layout_state: &mut LayoutState<'_>,
        tracker: &mut FragmentTracker,
        layout_box: BoxId,
        fragment: Rect,
        containing_width: f32,
    ) {
        let (dx, dy) = self.accumulated_relative_offset(layout_state, layout_box, containing_width);
        Self::record_fragment(layout_state, tracker, layout_box, fragment.translate(dx, dy));
    }
}

impl FormattingContext for InlineFormattingContext {
    fn root(&self) -> BoxId {
        self.root
    }

    fn layout_in_flow_content(&self, layout_state: &mut LayoutState<'_>) {
        debug!(root = %self.root, "[Start] inline formatting context");
        self.invalidate_formatting_state(layout_state);

        let tree = layout_state.tree();
        if !tree.has_in_flow_or_floating_child(self.root) {
            debug!(root = %self.root, lines = 0, "[End] inline formatting context");
            return;
        }
        let constraints = self.horizontal_constraints(layout_state);

        // STEP 1: Geometry pre-pass. Nested roots are laid out completely
        // so they can sit on the line as atomic boxes.
        self.for_each_box(layout_state, |layout_state, layout_box, establishes| {
            if establishes {
                Self::layout_formatting_context_root(layout_state, layout_box, constraints.width);
            } else {
                Self::compute_horizontal_and_vertical_geometry(layout_state, layout_box, constraints.width);
            }
        });

        // STEP 2: Inline items.
        self.collect_inline_content_if_needed(layout_state);

        // STEP 3: Lines.
        self.layout_lines(layout_state, constraints);

        #[cfg(feature = "layout-trace")]
        for (index, line) in layout_state.lines(self.root).iter().enumerate() {
            eprintln!(
                "[INLINE STEP3] {} line {index}: {:?} baseline={}",
                self.root, line.rect, line.baseline
            );
        }
        debug!(
            root = %self.root,
            lines = layout_state.lines(self.root).len(),
            runs = layout_state.runs(self.root).len(),
            "[End] inline formatting context"
        );
    }

    /// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
    ///
    /// "Calculate the preferred width by formatting the content without
    /// breaking lines other than where explicit line breaks occur, and also
    /// calculate the preferred minimum width, e.g., by trying all possible
    /// line breaks."
    fn computed_intrinsic_width_constraints(&self, layout_state: &mut LayoutState<'_>) -> IntrinsicWidthConstraints {
        if let Some(constraints) = layout_state
            .formatting_state(self.root)
            .and_then(|state| state.intrinsic_width_constraints)
        {
            return constraints;
        }

        let tree = layout_state.tree();
        let constraints = if tree.has_in_flow_or_floating_child(self.root) {
            // STEP 1: Geometry as if the containing block had no width.
            self.for_each_box(layout_state, |layout_state, layout_box, establishes| {
                if establishes {
                    self.compute_intrinsic_width_for_formatting_root(layout_state, layout_box);
                } else {
                    Self::compute_horizontal_and_vertical_geometry(layout_state, layout_box, 0.0);
                }
            });
            self.collect_inline_content_if_needed(layout_state);

            // STEP 2: Break at every opportunity, then at none.
            let minimum = self.maximum_line_width(layout_state, 0.0, |constraints| constraints.minimum);
            let maximum = self.maximum_line_width(layout_state, f32::MAX, |constraints| constraints.maximum);
            IntrinsicWidthConstraints::new(minimum, maximum)
        } else {
            IntrinsicWidthConstraints::default()
        };

        // STEP 3: Honor the root's own min/max-width.
        let style = tree.style(self.root);
        let constraints = IntrinsicWidthConstraints::new(
            constrain_by_min_max_width(style, constraints.minimum, None),
            constrain_by_min_max_width(style, constraints.maximum, None),
        );
        debug!(root = %self.root, minimum = constraints.minimum, maximum = constraints.maximum, "intrinsic widths");
        layout_state.ensure_formatting_state(self.root).intrinsic_width_constraints = Some(constraints);
        constraints
    }

    fn invalidate_formatting_state(&self, layout_state: &mut LayoutState<'_>) {
        layout_state.ensure_formatting_state(self.root).invalidate();
    }
}
