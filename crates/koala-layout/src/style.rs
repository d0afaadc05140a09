//! Computed style values consumed by the inline engine.
//!
//! Selector matching and the cascade live outside this crate; a
//! [`BoxStyle`] is what that collaborator hands over for each box.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::values::{AutoOr, LengthPercentage, Sides};

/// [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// Only the outer/inner combinations the inline engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DisplayType {
    /// "The element generates a block box."
    Block,
    /// "The element generates one or more inline boxes."
    #[default]
    Inline,
    /// "The element generates a block container box, and lays it out as an
    /// atomic inline-level box."
    InlineBlock,
}

/// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FloatSide {
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "The element generates a block box that is floated to the right."
    Right,
}

/// [§ 9.3.1 Choosing a positioning scheme: 'position' property](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow.
    /// Then the box is offset relative to its normal position."
    Relative,
}

/// [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
///
/// "This property describes how inline-level content of a block container
/// is aligned."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TextAlign {
    /// Align to the start edge (left in horizontal left-to-right text).
    #[default]
    Start,
    /// Align to the end edge.
    End,
    /// Align to the line's left edge.
    Left,
    /// Align to the line's right edge.
    Right,
    /// Center within the line.
    Center,
    /// Distribute free space over word separators.
    Justify,
}

/// [§ 3 White Space and Wrapping: the white-space property](https://www.w3.org/TR/css-text-3/#white-space-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WhiteSpace {
    /// Collapse whitespace and wrap at soft wrap opportunities.
    #[default]
    Normal,
    /// Collapse whitespace but suppress line wrapping.
    Nowrap,
}

/// [§ 5.2 Breaking Rules for Letters: the word-break property](https://www.w3.org/TR/css-text-3/#word-break-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WordBreak {
    /// "Words break according to their customary rules."
    #[default]
    Normal,
    /// "Breaking is allowed within 'words'."
    BreakAll,
}

/// [§ 5.5 Overflow Wrapping: the overflow-wrap property](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OverflowWrap {
    /// "Lines may break only at allowed break points."
    #[default]
    Normal,
    /// "An otherwise unbreakable sequence of characters may be broken at an
    /// arbitrary point if there are no otherwise-acceptable break points in
    /// the line."
    BreakWord,
}

/// Computed values for one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BoxStyle {
    /// 'display'
    pub display: DisplayType,
    /// 'float'; `None` is `float: none`.
    pub float: Option<FloatSide>,
    /// 'position'
    pub position: Position,
    /// 'top'/'right'/'bottom'/'left'; `None` is 'auto'.
    pub inset: Sides<Option<LengthPercentage>>,
    /// 'width'
    pub width: AutoOr,
    /// 'height'
    pub height: AutoOr,
    /// 'min-width'
    pub min_width: LengthPercentage,
    /// 'max-width'; `None` is 'none'.
    pub max_width: Option<LengthPercentage>,
    /// 'margin'
    pub margin: Sides<AutoOr>,
    /// 'padding'
    pub padding: Sides<LengthPercentage>,
    /// 'border-*-width' in pixels.
    pub border: Sides<f32>,
    /// 'font-size' in pixels.
    pub font_size: f32,
    /// 'line-height' in pixels; `None` is 'normal'.
    pub line_height: Option<f32>,
    /// 'text-align'
    pub text_align: TextAlign,
    /// 'white-space'
    pub white_space: WhiteSpace,
    /// 'word-break'
    pub word_break: WordBreak,
    /// 'overflow-wrap'
    pub overflow_wrap: OverflowWrap,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            display: DisplayType::Inline,
            float: None,
            position: Position::Static,
            inset: Sides::all(None),
            width: AutoOr::Auto,
            height: AutoOr::Auto,
            min_width: LengthPercentage::Px(0.0),
            max_width: None,
            margin: Sides::all(AutoOr::from(0.0)),
            padding: Sides::all(LengthPercentage::Px(0.0)),
            border: Sides::all(0.0),
            font_size: 16.0,
            line_height: None,
            text_align: TextAlign::Start,
            white_space: WhiteSpace::Normal,
            word_break: WordBreak::Normal,
            overflow_wrap: OverflowWrap::Normal,
        }
    }
}

impl BoxStyle {
    /// Default style for a block container.
    #[must_use]
    pub fn block() -> Self {
        Self {
            display: DisplayType::Block,
            ..Self::default()
        }
    }

    /// Default style for an inline-block.
    #[must_use]
    pub fn inline_block() -> Self {
        Self {
            display: DisplayType::InlineBlock,
            ..Self::default()
        }
    }

    /// Default style for a float on `side`.
    #[must_use]
    pub fn floating(side: FloatSide) -> Self {
        Self {
            display: DisplayType::Block,
            float: Some(side),
            ..Self::default()
        }
    }

    /// Copy the inherited properties (font and text) from `parent`.
    ///
    /// [§ 7.2 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    pub fn inherit_from(&mut self, parent: &Self) {
        self.font_size = parent.font_size;
        self.line_height = parent.line_height;
        self.text_align = parent.text_align;
        self.white_space = parent.white_space;
        self.word_break = parent.word_break;
        self.overflow_wrap = parent.overflow_wrap;
    }

    /// [§ 3 White Space and Wrapping](https://www.w3.org/TR/css-text-3/#white-space-property)
    ///
    /// Whether soft wrap opportunities inside this box may be taken.
    #[must_use]
    pub const fn allows_wrapping(&self) -> bool {
        matches!(self.white_space, WhiteSpace::Normal)
    }
}
