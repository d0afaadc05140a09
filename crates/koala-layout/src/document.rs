//! JSON box-tree documents.
//!
//! A document is one [`BoxNode`] (the root) with nested children:
//!
//! ```json
//! {
//!   "type": "container",
//!   "style": { "width": 200, "text-align": "center" },
//!   "children": [
//!     { "type": "text", "text": "Hello " },
//!     { "type": "replaced", "intrinsic-width": 40, "intrinsic-height": 20 },
//!     { "type": "line-break" }
//!   ]
//! }
//! ```
//!
//! Style declarations use the kebab-case property names of [`BoxStyle`].
//! Font and text properties a node does not declare are inherited from its
//! parent; everything else starts from its initial value. The root is a
//! block container unless it says otherwise.

use koala_common::warning::warn_once;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::box_tree::{BoxId, BoxTree, IntrinsicSize};
use crate::error::TreeError;
use crate::style::BoxStyle;

/// Declared style properties of a node, by kebab-case name.
pub type StyleDeclarations = Map<String, Value>;

/// Properties that only mean something on boxes with box geometry.
const BOX_ONLY_PROPERTIES: [&str; 5] = ["display", "float", "position", "width", "height"];

/// One node of a box-tree document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BoxNode {
    /// A run of text.
    Text {
        /// The text content.
        text: String,
        /// Declared style.
        #[serde(default)]
        style: StyleDeclarations,
    },
    /// Atomic replaced content such as an image.
    Replaced {
        /// Natural width, if any.
        #[serde(default, rename = "intrinsic-width")]
        intrinsic_width: Option<f32>,
        /// Natural height, if any.
        #[serde(default, rename = "intrinsic-height")]
        intrinsic_height: Option<f32>,
        /// Declared style.
        #[serde(default)]
        style: StyleDeclarations,
    },
    /// A forced line break.
    LineBreak {
        /// Declared style.
        #[serde(default)]
        style: StyleDeclarations,
    },
    /// A box with children.
    Container {
        /// Declared style.
        #[serde(default)]
        style: StyleDeclarations,
        /// Child nodes in tree order.
        #[serde(default)]
        children: Vec<BoxNode>,
    },
}

impl BoxNode {
    /// Short name of the node type, as written in documents.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Replaced { .. } => "replaced",
            Self::LineBreak { .. } => "line-break",
            Self::Container { .. } => "container",
        }
    }

    /// Build a box tree with this node as the root.
    ///
    /// # Errors
    ///
    /// Fails if the root is not a block container, if a style value does not
    /// parse, or if any node is rejected by the [`BoxTree`] builder.
    pub fn into_tree(self) -> Result<BoxTree, TreeError> {
        let type_name = self.type_name();
        let Self::Container { style, children } = self else {
            return Err(TreeError::RootNotBlockContainer(type_name.to_string()));
        };
        let mut tree = BoxTree::new(computed_style(BoxStyle::block(), style)?)?;
        let root = tree.root();
        for child in children {
            let _ = append_node(&mut tree, root, child)?;
        }
        Ok(tree)
    }
}

/// Parse a JSON document into a box tree.
///
/// # Errors
///
/// Returns [`TreeError::Json`] for malformed JSON and the builder's error
/// for a well-formed document describing an invalid tree.
pub fn from_json(json: &str) -> Result<BoxTree, TreeError> {
    let node: BoxNode = serde_json::from_str(json)?;
    node.into_tree()
}

fn append_node(tree: &mut BoxTree, parent: BoxId, node: BoxNode) -> Result<BoxId, TreeError> {
    let base = inherited_style(tree.style(parent));
    match node {
        BoxNode::Text { text, style } => {
            warn_ignored_properties(&style, "text");
            tree.append_text(parent, text, computed_style(base, style)?)
        }
        BoxNode::Replaced {
            intrinsic_width,
            intrinsic_height,
            style,
        } => {
            let intrinsic = IntrinsicSize {
                width: intrinsic_width,
                height: intrinsic_height,
            };
            tree.append_replaced(parent, intrinsic, computed_style(base, style)?)
        }
        BoxNode::LineBreak { style } => {
            warn_ignored_properties(&style, "line-break");
            tree.append_line_break(parent, computed_style(base, style)?)
        }
        BoxNode::Container { style, children } => {
            let id = tree.append_container(parent, computed_style(base, style)?)?;
            for child in children {
                let _ = append_node(tree, id, child)?;
            }
            Ok(id)
        }
    }
}

/// [§ 7.2 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// Initial values, except for the inherited properties which take the
/// parent's computed value.
fn inherited_style(parent: &BoxStyle) -> BoxStyle {
    let mut style = BoxStyle::default();
    style.inherit_from(parent);
    style
}

/// Apply `declarations` on top of `base`.
fn computed_style(base: BoxStyle, declarations: StyleDeclarations) -> Result<BoxStyle, TreeError> {
    if declarations.is_empty() {
        return Ok(base);
    }
    let mut value = serde_json::to_value(base)?;
    if let Value::Object(properties) = &mut value {
        properties.extend(declarations);
    }
    Ok(serde_json::from_value(value)?)
}

fn warn_ignored_properties(declarations: &StyleDeclarations, node_type: &str) {
    for property in BOX_ONLY_PROPERTIES {
        if declarations.contains_key(property) {
            let _ = warn_once("document", &format!("ignoring '{property}' on a {node_type} box"));
        }
    }
}
