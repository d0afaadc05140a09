//! Errors raised while building a box tree.
//!
//! Layout itself never fails: every input that reaches the engine has been
//! validated here first.

use thiserror::Error;

use crate::box_tree::BoxId;

/// Rejected box-tree input.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Children can only be appended to container boxes.
    #[error("box {0} is not a container and cannot have children")]
    ParentNotContainer(BoxId),

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// Block-in-inline splitting is not performed; block-level boxes may
    /// only appear as the root or establish their own formatting context.
    #[error("block-level box cannot be placed inside inline content of box {0}")]
    BlockInInline(BoxId),

    /// The root must be a block container that establishes the inline
    /// formatting context.
    #[error("root box must be a block container, found {0}")]
    RootNotBlockContainer(String),

    /// [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
    #[error("replaced box has no intrinsic size and no specified width/height")]
    ReplacedWithoutSize,

    /// The box handle does not belong to this tree.
    #[error("unknown box {0}")]
    UnknownBox(BoxId),

    /// A length value could not be parsed.
    #[error("invalid length value {0:?}")]
    InvalidValue(String),

    /// The document is not valid JSON or does not match the schema.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}
