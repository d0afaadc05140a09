//! Inline items: the flattened, typed view of inline content.
//!
//! `<span>text<span></span><img></span>` becomes
//! `[ContainerStart][Text][ContainerStart][ContainerEnd][Box][ContainerEnd]`.

use serde::Serialize;

use crate::box_tree::{BoxId, BoxKind, BoxTree};
use crate::text::TextMeasurer;

/// A slice of a text box.
///
/// Text boxes are cut into word and whitespace segments at collection
/// time, so a line can only ever end between items or inside a splittable
/// word.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InlineTextItem {
    /// The text box this slice belongs to.
    pub layout_box: BoxId,
    /// Start byte offset into the box's text.
    pub start: usize,
    /// Length in bytes.
    pub length: usize,
    /// Measured width. Whitespace measures as a single collapsed space.
    pub width: f32,
    /// [§ 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
    ///
    /// A run of collapsible whitespace.
    pub is_whitespace: bool,
    /// Whether a soft wrap may be taken right after this slice.
    pub has_trailing_soft_wrap_opportunity: bool,
}

impl InlineTextItem {
    /// End byte offset (exclusive).
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// The slice of the box's text this item covers.
    #[must_use]
    pub fn content<'t>(&self, tree: &'t BoxTree) -> &'t str {
        tree.text(self.layout_box)
            .and_then(|text| text.get(self.start..self.end()))
            .unwrap_or_default()
    }

    /// The first `length` bytes of this item.
    #[must_use]
    pub fn left(&self, length: usize, tree: &BoxTree, measurer: &dyn TextMeasurer) -> Self {
        let mut item = Self {
            length,
            has_trailing_soft_wrap_opportunity: false,
            ..*self
        };
        item.width = item.measure(tree, measurer);
        item
    }

    /// The last `length` bytes of this item.
    #[must_use]
    pub fn right(&self, length: usize, tree: &BoxTree, measurer: &dyn TextMeasurer) -> Self {
        let mut item = Self {
            start: self.end() - length,
            length,
            ..*self
        };
        item.width = item.measure(tree, measurer);
        item
    }

    /// Width of the covered text.
    #[must_use]
    pub fn measure(&self, tree: &BoxTree, measurer: &dyn TextMeasurer) -> f32 {
        let font_size = tree.style(self.layout_box).font_size;
        if self.is_whitespace {
            measurer.text_width(" ", font_size)
        } else {
            measurer.text_width(self.content(tree), font_size)
        }
    }
}

/// One unit of inline content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InlineItem {
    /// Opening edge of an inline container (`<span>`).
    ContainerStart {
        /// The inline container.
        layout_box: BoxId,
    },
    /// Closing edge of an inline container (`</span>`).
    ContainerEnd {
        /// The inline container.
        layout_box: BoxId,
    },
    /// An atomic inline: replaced content or an inline-block.
    Box {
        /// The atomic box.
        layout_box: BoxId,
    },
    /// A text slice.
    Text(InlineTextItem),
    /// A float met in the inline content.
    Float {
        /// The floating box.
        layout_box: BoxId,
    },
    /// A forced line break (`<br>`).
    ForcedLineBreak {
        /// The line break box.
        layout_box: BoxId,
    },
}

impl InlineItem {
    /// The box this item was created from.
    #[must_use]
    pub const fn layout_box(&self) -> BoxId {
        match self {
            Self::ContainerStart { layout_box }
            | Self::ContainerEnd { layout_box }
            | Self::Box { layout_box }
            | Self::Float { layout_box }
            | Self::ForcedLineBreak { layout_box } => *layout_box,
            Self::Text(text) => text.layout_box,
        }
    }

    /// Whether this is a container start or end.
    #[must_use]
    pub const fn is_container_boundary(&self) -> bool {
        matches!(self, Self::ContainerStart { .. } | Self::ContainerEnd { .. })
    }

    /// Whether this is a float.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float { .. })
    }

    /// The text slice, for text items.
    #[must_use]
    pub const fn as_text(&self) -> Option<&InlineTextItem> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Flatten the inline content of `root` into items, in tree order.
///
/// Nested formatting context roots are not entered: an inline-block
/// becomes a single [`InlineItem::Box`] and a floating box a single
/// [`InlineItem::Float`].
#[must_use]
pub fn collect_inline_items(tree: &BoxTree, measurer: &dyn TextMeasurer, root: BoxId) -> Vec<InlineItem> {
    let mut items = Vec::new();
    collect_children(tree, measurer, root, &mut items);
    items
}

fn collect_children(tree: &BoxTree, measurer: &dyn TextMeasurer, container: BoxId, items: &mut Vec<InlineItem>) {
    for &layout_box in tree.children(container) {
        if tree.is_floating(layout_box) {
            items.push(InlineItem::Float { layout_box });
            continue;
        }
        if tree.is_inline_container(layout_box) {
            items.push(InlineItem::ContainerStart { layout_box });
            collect_children(tree, measurer, layout_box, items);
            items.push(InlineItem::ContainerEnd { layout_box });
            continue;
        }
        match tree.kind(layout_box) {
            BoxKind::Text(text) => append_text_items(tree, measurer, layout_box, text, items),
            BoxKind::LineBreak => items.push(InlineItem::ForcedLineBreak { layout_box }),
            BoxKind::Replaced(_) | BoxKind::Container => items.push(InlineItem::Box { layout_box }),
        }
    }
}

/// [§ 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
///
/// "Any sequence of collapsible spaces and tabs immediately preceding or
/// following a segment break is removed." Segment breaks are collapsed to
/// spaces as well, so a whitespace run always renders as one space.
const fn is_collapsible_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

fn append_text_items(
    tree: &BoxTree,
    measurer: &dyn TextMeasurer,
    layout_box: BoxId,
    text: &str,
    items: &mut Vec<InlineItem>,
) {
    let style = tree.style(layout_box);
    let allows_wrapping = style.allows_wrapping();
    let opportunities = if allows_wrapping {
        measurer.break_opportunities(text)
    } else {
        Vec::new()
    };

    // STEP 1: Split into maximal whitespace / non-whitespace runs.
    let mut segments: Vec<(usize, usize, bool)> = Vec::new();
    for (offset, c) in text.char_indices() {
        let is_whitespace = is_collapsible_whitespace(c);
        match segments.last_mut() {
            Some((_, end, whitespace)) if *whitespace == is_whitespace => *end = offset + c.len_utf8(),
            _ => segments.push((offset, offset + c.len_utf8(), is_whitespace)),
        }
    }

    // STEP 2: Cut words again at soft wrap opportunities inside them.
    for (start, end, is_whitespace) in segments {
        if is_whitespace {
            let item = InlineTextItem {
                layout_box,
                start,
                length: end - start,
                width: 0.0,
                is_whitespace: true,
                has_trailing_soft_wrap_opportunity: allows_wrapping,
            };
            items.push(InlineItem::Text(InlineTextItem {
                width: item.measure(tree, measurer),
                ..item
            }));
            continue;
        }
        let mut word_start = start;
        let cuts = opportunities
            .iter()
            .copied()
            .filter(|&offset| offset > start && offset < end)
            .chain(std::iter::once(end));
        for word_end in cuts {
            let item = InlineTextItem {
                layout_box,
                start: word_start,
                length: word_end - word_start,
                width: 0.0,
                is_whitespace: false,
                has_trailing_soft_wrap_opportunity: opportunities.binary_search(&word_end).is_ok(),
            };
            items.push(InlineItem::Text(InlineTextItem {
                width: item.measure(tree, measurer),
                ..item
            }));
            word_start = word_end;
        }
    }
}
