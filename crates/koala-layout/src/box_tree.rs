//! Arena-allocated box tree.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! The tree is built once by the surrounding system and then only read by
//! layout. Every relationship is a [`BoxId`] index into the arena, so
//! formatting states can key their results by handle without borrowing
//! the tree.

use std::fmt;

use serde::Serialize;

use crate::error::TreeError;
use crate::style::{BoxStyle, DisplayType, Position};

/// A stable handle to a box in a [`BoxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BoxId(pub usize);

impl BoxId {
    /// The root box is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
///
/// Natural dimensions of replaced content (an image, a video frame).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct IntrinsicSize {
    /// Natural width, if the content has one.
    pub width: Option<f32>,
    /// Natural height, if the content has one.
    pub height: Option<f32>,
}

impl IntrinsicSize {
    /// Content with both natural dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// "intrinsic ratio": width / height when both are known.
    #[must_use]
    pub fn ratio(&self) -> Option<f32> {
        match (self.width, self.height) {
            (Some(width), Some(height)) if height > 0.0 => Some(width / height),
            _ => None,
        }
    }
}

/// What a box is made of.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum BoxKind {
    /// A text run source.
    Text(String),
    /// Atomic replaced content.
    Replaced(IntrinsicSize),
    /// A forced line break (`<br>`).
    LineBreak,
    /// A box with children: an inline container, an inline-block, a float
    /// or the root block container.
    Container,
}

/// One box in the arena.
#[derive(Debug, Clone)]
pub struct LayoutBox {
    /// Content of the box.
    pub kind: BoxKind,
    /// Computed style.
    pub style: BoxStyle,
    /// Parent container; `None` only for the root.
    pub parent: Option<BoxId>,
    /// Children in tree order.
    pub children: Vec<BoxId>,
    /// Next sibling in the parent's child list.
    pub next_sibling: Option<BoxId>,
}

/// The box tree.
///
/// Index 0 is the root: a block container that establishes the outermost
/// inline formatting context.
#[derive(Debug, Clone)]
pub struct BoxTree {
    boxes: Vec<LayoutBox>,
}

impl BoxTree {
    /// Create a tree with just the root block container.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::RootNotBlockContainer`] unless `root_style`
    /// describes a non-floating block box.
    pub fn new(root_style: BoxStyle) -> Result<Self, TreeError> {
        if root_style.display != DisplayType::Block || root_style.float.is_some() {
            return Err(TreeError::RootNotBlockContainer(root_style.display.to_string()));
        }
        Ok(Self {
            boxes: vec![LayoutBox {
                kind: BoxKind::Container,
                style: root_style,
                parent: None,
                children: Vec::new(),
                next_sibling: None,
            }],
        })
    }

    /// The root box.
    #[must_use]
    pub const fn root(&self) -> BoxId {
        BoxId::ROOT
    }

    /// Number of boxes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Always false: the root exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Get a box by handle.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.get(id.0)
    }

    /// Get a box by a handle issued by this tree.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    #[must_use]
    pub fn layout_box(&self, id: BoxId) -> &LayoutBox {
        &self.boxes[id.0]
    }

    /// Every box in tree pre-order, starting at the root.
    ///
    /// Handles are allocated in append order, which differs from tree order
    /// once a box is appended to an earlier parent.
    pub fn pre_order(&self) -> impl Iterator<Item = BoxId> + '_ {
        std::iter::successors(Some(BoxId::ROOT), |&id| self.next_in_pre_order(id, BoxId::ROOT, true))
    }

    /// Computed style of a box.
    #[must_use]
    pub fn style(&self, id: BoxId) -> &BoxStyle {
        &self.layout_box(id).style
    }

    /// Content kind of a box.
    #[must_use]
    pub fn kind(&self, id: BoxId) -> &BoxKind {
        &self.layout_box(id).kind
    }

    /// Text content, for text boxes.
    #[must_use]
    pub fn text(&self, id: BoxId) -> Option<&str> {
        match &self.layout_box(id).kind {
            BoxKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Parent of a box.
    #[must_use]
    pub fn parent(&self, id: BoxId) -> Option<BoxId> {
        self.get(id).and_then(|b| b.parent)
    }

    /// Children of a box in tree order.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.get(id).map_or(&[], |b| b.children.as_slice())
    }

    /// First child of a box.
    #[must_use]
    pub fn first_child(&self, id: BoxId) -> Option<BoxId> {
        self.children(id).first().copied()
    }

    /// Next sibling of a box.
    #[must_use]
    pub fn next_sibling(&self, id: BoxId) -> Option<BoxId> {
        self.get(id).and_then(|b| b.next_sibling)
    }

    // --- Builder ---------------------------------------------------------

    /// Append a text box to `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is unknown or not a container.
    pub fn append_text(
        &mut self,
        parent: BoxId,
        text: impl Into<String>,
        style: BoxStyle,
    ) -> Result<BoxId, TreeError> {
        self.append(parent, BoxKind::Text(text.into()), style)
    }

    /// Append replaced content to `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is unknown or not a container, or if neither the
    /// content nor the style gives the box a size.
    pub fn append_replaced(
        &mut self,
        parent: BoxId,
        intrinsic: IntrinsicSize,
        style: BoxStyle,
    ) -> Result<BoxId, TreeError> {
        let has_width = intrinsic.width.is_some() || !style.width.is_auto();
        let has_height = intrinsic.height.is_some() || !style.height.is_auto();
        if !has_width && !has_height {
            return Err(TreeError::ReplacedWithoutSize);
        }
        self.append(parent, BoxKind::Replaced(intrinsic), style)
    }

    /// Append a forced line break to `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is unknown or not a container.
    pub fn append_line_break(&mut self, parent: BoxId, style: BoxStyle) -> Result<BoxId, TreeError> {
        self.append(parent, BoxKind::LineBreak, style)
    }

    /// Append a container (inline box, inline-block or float) to `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is unknown or not a container, or if `style`
    /// describes an in-flow block-level box.
    pub fn append_container(&mut self, parent: BoxId, style: BoxStyle) -> Result<BoxId, TreeError> {
        if style.display == DisplayType::Block && style.float.is_none() {
            return Err(TreeError::BlockInInline(parent));
        }
        self.append(parent, BoxKind::Container, style)
    }

    fn append(&mut self, parent: BoxId, kind: BoxKind, style: BoxStyle) -> Result<BoxId, TreeError> {
        let Some(parent_box) = self.get(parent) else {
            return Err(TreeError::UnknownBox(parent));
        };
        if parent_box.kind != BoxKind::Container {
            return Err(TreeError::ParentNotContainer(parent));
        }
        let previous_last = parent_box.children.last().copied();

        let id = BoxId(self.boxes.len());
        self.boxes.push(LayoutBox {
            kind,
            style,
            parent: Some(parent),
            children: Vec::new(),
            next_sibling: None,
        });
        self.boxes[parent.0].children.push(id);
        if let Some(previous) = previous_last {
            self.boxes[previous.0].next_sibling = Some(id);
        }
        Ok(id)
    }

    // --- Predicates ------------------------------------------------------

    /// Whether the box has children.
    #[must_use]
    pub fn is_container(&self, id: BoxId) -> bool {
        self.layout_box(id).kind == BoxKind::Container
    }

    /// Whether the box holds replaced content.
    #[must_use]
    pub fn is_replaced(&self, id: BoxId) -> bool {
        matches!(self.layout_box(id).kind, BoxKind::Replaced(_))
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// Text runs and line breaks cannot float; the 'float' value they may
    /// carry is ignored.
    #[must_use]
    pub fn is_floating(&self, id: BoxId) -> bool {
        let layout_box = self.layout_box(id);
        layout_box.style.float.is_some()
            && matches!(layout_box.kind, BoxKind::Container | BoxKind::Replaced(_))
            && id != BoxId::ROOT
    }

    /// An atomic inline-level block container.
    #[must_use]
    pub fn is_inline_block(&self, id: BoxId) -> bool {
        self.is_container(id)
            && self.style(id).display == DisplayType::InlineBlock
            && !self.is_floating(id)
            && id != BoxId::ROOT
    }

    /// A non-atomic inline box whose content takes part in the parent's
    /// line layout.
    #[must_use]
    pub fn is_inline_container(&self, id: BoxId) -> bool {
        id != BoxId::ROOT && self.is_container(id) && !self.establishes_formatting_context(id)
    }

    /// [§ 9.4 Normal flow](https://www.w3.org/TR/CSS2/visuren.html#normal-flow)
    ///
    /// "Floats, absolutely positioned elements, block containers (such as
    /// inline-blocks, table-cells, and table-captions) that are not block
    /// boxes ... establish new block formatting contexts for their contents."
    ///
    /// Every such root lays out its own content in an inline formatting
    /// context here.
    #[must_use]
    pub fn establishes_formatting_context(&self, id: BoxId) -> bool {
        id == BoxId::ROOT
            || (self.is_container(id) && (self.is_inline_block(id) || self.is_floating(id)))
    }

    /// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
    #[must_use]
    pub fn is_in_flow_positioned(&self, id: BoxId) -> bool {
        self.style(id).position == Position::Relative && !self.is_floating(id)
    }

    /// Whether the box has any in-flow or floating children to lay out.
    #[must_use]
    pub fn has_in_flow_or_floating_child(&self, id: BoxId) -> bool {
        !self.children(id).is_empty()
    }

    /// The nearest strict ancestor that establishes a formatting context.
    /// `None` for the root.
    #[must_use]
    pub fn formatting_context_root(&self, id: BoxId) -> Option<BoxId> {
        self.ancestors(id)
            .find(|&ancestor| self.establishes_formatting_context(ancestor))
    }

    /// Iterate over ancestors, from parent to root.
    #[must_use]
    pub const fn ancestors(&self, id: BoxId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: Some(id),
        }
    }

    /// Next box after `id` in pre-order, staying inside `within`.
    ///
    /// With `descend == false` the children of `id` are skipped, which is
    /// how traversal steps over a nested formatting context.
    #[must_use]
    pub fn next_in_pre_order(&self, id: BoxId, within: BoxId, descend: bool) -> Option<BoxId> {
        if descend {
            if let Some(child) = self.first_child(id) {
                return Some(child);
            }
        }
        let mut current = id;
        while current != within {
            if let Some(sibling) = self.next_sibling(current) {
                return Some(sibling);
            }
            current = self.parent(current)?;
        }
        None
    }
}

/// Iterator over the strict ancestors of a box.
pub struct Ancestors<'a> {
    tree: &'a BoxTree,
    current: Option<BoxId>,
}

impl Iterator for Ancestors<'_> {
    type Item = BoxId;

    fn next(&mut self) -> Option<Self::Item> {
        let parent = self.tree.parent(self.current?);
        self.current = parent;
        parent
    }
}
