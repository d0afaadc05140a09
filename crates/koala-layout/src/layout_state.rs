//! Layout results, per formatting context.
//!
//! [`LayoutState`] is the explicit context value threaded through every
//! layout call. It borrows the box tree and the text measurer and owns one
//! [`InlineFormattingState`] per formatting context root.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::box_model::Point;
use crate::box_tree::{BoxId, BoxTree};
use crate::display::{DisplayBox, Line, Run};
use crate::float::FloatingState;
use crate::formatting_context::{IntrinsicWidthConstraints, create_formatting_context};
use crate::inline::item::InlineItem;
use crate::text::TextMeasurer;

/// Everything one inline formatting context produced.
///
/// Display boxes are keyed by the boxes *inside* the context; the root's
/// own display box lives in its parent's state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InlineFormattingState {
    /// Geometry of the boxes laid out by this context.
    pub display_boxes: BTreeMap<BoxId, DisplayBox>,
    /// Flattened inline content, built once per state.
    #[serde(skip)]
    pub inline_items: Vec<InlineItem>,
    /// Line boxes, top to bottom.
    pub lines: Vec<Line>,
    /// Runs, in line order.
    pub runs: Vec<Run>,
    /// Floats placed by this context.
    pub floating_state: FloatingState,
    /// Cached min/max-content widths of the root's content box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intrinsic_width_constraints: Option<IntrinsicWidthConstraints>,
    /// Cached margin-box contributions of nested formatting roots.
    #[serde(skip)]
    pub intrinsic_width_constraints_for_box: HashMap<BoxId, IntrinsicWidthConstraints>,
}

impl InlineFormattingState {
    /// Forget the output of an earlier layout. The inline items and the
    /// intrinsic width caches survive.
    pub fn invalidate(&mut self) {
        self.display_boxes.clear();
        self.lines.clear();
        self.runs.clear();
        self.floating_state.clear();
    }
}

/// The explicit layout context: the tree being laid out, the measurer and
/// the formatting states produced so far.
pub struct LayoutState<'t> {
    tree: &'t BoxTree,
    measurer: &'t dyn TextMeasurer,
    formatting_states: BTreeMap<BoxId, InlineFormattingState>,
    root_display_box: DisplayBox,
}

impl<'t> LayoutState<'t> {
    /// Create an empty layout state for `tree`.
    #[must_use]
    pub fn new(tree: &'t BoxTree, measurer: &'t dyn TextMeasurer) -> Self {
        Self {
            tree,
            measurer,
            formatting_states: BTreeMap::new(),
            root_display_box: DisplayBox::default(),
        }
    }

    /// The tree being laid out.
    #[must_use]
    pub const fn tree(&self) -> &'t BoxTree {
        self.tree
    }

    /// The text measurer.
    #[must_use]
    pub const fn measurer(&self) -> &'t dyn TextMeasurer {
        self.measurer
    }

    /// The state of the formatting context established by `root`, if it
    /// has been laid out or measured.
    #[must_use]
    pub fn formatting_state(&self, root: BoxId) -> Option<&InlineFormattingState> {
        self.formatting_states.get(&root)
    }

    /// The state of `root`'s formatting context, created on first use.
    pub fn ensure_formatting_state(&mut self, root: BoxId) -> &mut InlineFormattingState {
        self.formatting_states.entry(root).or_default()
    }

    /// Roots of every formatting state, in tree order.
    pub fn formatting_roots(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.formatting_states.keys().copied()
    }

    /// Geometry of `layout_box`, in the coordinates of its formatting
    /// context root's border box. The tree root is in viewport
    /// coordinates.
    #[must_use]
    pub fn display_box(&self, layout_box: BoxId) -> Option<&DisplayBox> {
        if layout_box == self.tree.root() {
            return Some(&self.root_display_box);
        }
        let root = self.tree.formatting_context_root(layout_box)?;
        self.formatting_states.get(&root)?.display_boxes.get(&layout_box)
    }

    /// Mutable geometry of `layout_box`, created on first write.
    pub fn display_box_mut(&mut self, layout_box: BoxId) -> &mut DisplayBox {
        if layout_box == self.tree.root() {
            return &mut self.root_display_box;
        }
        let root = self
            .tree
            .formatting_context_root(layout_box)
            .unwrap_or(self.tree.root());
        self.ensure_formatting_state(root)
            .display_boxes
            .entry(layout_box)
            .or_default()
    }

    /// Line boxes of `root`'s formatting context.
    #[must_use]
    pub fn lines(&self, root: BoxId) -> &[Line] {
        self.formatting_state(root)
            .map(|state| state.lines.as_slice())
            .unwrap_or_default()
    }

    /// Runs of `root`'s formatting context.
    #[must_use]
    pub fn runs(&self, root: BoxId) -> &[Run] {
        self.formatting_state(root)
            .map(|state| state.runs.as_slice())
            .unwrap_or_default()
    }

    /// The line a run of `root`'s formatting context sits on.
    #[must_use]
    pub fn line_for_run(&self, root: BoxId, run: &Run) -> Option<&Line> {
        self.lines(root).get(run.line_index)
    }

    /// Runs painting `layout_box`, in line order.
    pub fn runs_for_box(&self, layout_box: BoxId) -> impl Iterator<Item = &Run> + '_ {
        let root = self.tree.formatting_context_root(layout_box);
        root.into_iter()
            .flat_map(|root| self.runs(root))
            .filter(move |run| run.layout_box == layout_box)
    }

    /// Where the border box of formatting context root `root` starts, in
    /// viewport coordinates.
    #[must_use]
    pub fn border_box_origin(&self, root: BoxId) -> Point {
        let mut origin = Point::default();
        let mut current = Some(root);
        while let Some(layout_box) = current {
            if let Some(display_box) = self.display_box(layout_box) {
                origin.x += display_box.left();
                origin.y += display_box.top();
            }
            current = self.tree.formatting_context_root(layout_box);
        }
        origin
    }

    /// Min-content and max-content widths of `root`'s content box,
    /// computed on first request.
    ///
    /// Geometry from an earlier layout is left as it was.
    pub fn intrinsic_width_constraints(&mut self, root: BoxId) -> IntrinsicWidthConstraints {
        let saved: Vec<(BoxId, BTreeMap<BoxId, DisplayBox>)> = self
            .formatting_states
            .iter()
            .map(|(&state_root, state)| (state_root, state.display_boxes.clone()))
            .collect();
        let saved_root_display_box = self.root_display_box;

        let formatting_context = create_formatting_context(self, root);
        let constraints = formatting_context.computed_intrinsic_width_constraints(self);

        for (state_root, display_boxes) in saved {
            self.ensure_formatting_state(state_root).display_boxes = display_boxes;
        }
        self.root_display_box = saved_root_display_box;
        constraints
    }
}
