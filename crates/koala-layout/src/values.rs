//! Computed length values and their resolution to used pixel values.
//!
//! [§ 6 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! The style collaborator hands the engine computed values. Percentages
//! are still unresolved at that point; they become pixels only once the
//! containing block width is known.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
///
/// A `<length-percentage>`: either absolute pixels or a percentage of some
/// reference length (the containing block width, for every property the
/// inline engine consumes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ValueInput", into = "String")]
pub enum LengthPercentage {
    /// Absolute length in CSS pixels.
    Px(f32),
    /// Percentage of the reference length (0..=100 scale).
    Percent(f32),
}

impl Default for LengthPercentage {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl LengthPercentage {
    /// [§ 6.1 Used Values](https://www.w3.org/TR/css-cascade-4/#used)
    ///
    /// "The used value is the result of taking the computed value and
    /// completing any remaining calculations to make it the absolute
    /// theoretical value used in the layout of the document."
    #[must_use]
    pub fn resolve(&self, reference: f32) -> f32 {
        match *self {
            Self::Px(px) => px,
            Self::Percent(percent) => reference * percent / 100.0,
        }
    }

    /// The fixed pixel value, if this is not a percentage.
    #[must_use]
    pub const fn fixed(&self) -> Option<f32> {
        match *self {
            Self::Px(px) => Some(px),
            Self::Percent(_) => None,
        }
    }

    /// Whether this value depends on the reference length.
    #[must_use]
    pub const fn is_percent(&self) -> bool {
        matches!(self, Self::Percent(_))
    }
}

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ValueInput", into = "String")]
pub enum AutoOr {
    /// The value is 'auto' and must be resolved during layout.
    Auto,
    /// The value is a specific length or percentage.
    Length(LengthPercentage),
}

/// Missing margin sides in a document are `0`, the initial value of
/// 'margin'. Properties whose initial value is 'auto' set it explicitly.
impl Default for AutoOr {
    fn default() -> Self {
        Self::Length(LengthPercentage::Px(0.0))
    }
}

impl AutoOr {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve against `reference`; `None` for 'auto'.
    #[must_use]
    pub fn resolve(&self, reference: f32) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Length(length) => Some(length.resolve(reference)),
        }
    }

    /// Resolve against `reference`, using `default` for 'auto'.
    #[must_use]
    pub fn to_px_or(&self, reference: f32, default: f32) -> f32 {
        self.resolve(reference).unwrap_or(default)
    }

    /// The fixed pixel value, if this is neither 'auto' nor a percentage.
    #[must_use]
    pub const fn fixed(&self) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Length(length) => length.fixed(),
        }
    }
}

impl From<f32> for AutoOr {
    fn from(px: f32) -> Self {
        Self::Length(LengthPercentage::Px(px))
    }
}

impl From<LengthPercentage> for AutoOr {
    fn from(length: LengthPercentage) -> Self {
        Self::Length(length)
    }
}

/// Per-side values of a box property (margin, padding, border, inset).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Sides<T> {
    /// Top edge value.
    pub top: T,
    /// Right edge value.
    pub right: T,
    /// Bottom edge value.
    pub bottom: T,
    /// Left edge value.
    pub left: T,
}

impl<T: Copy> Sides<T> {
    /// All four sides set to `value`.
    pub const fn all(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Untyped value as it appears in a JSON document: a bare number (pixels)
/// or a string such as `"auto"`, `"12px"` or `"50%"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ValueInput {
    Number(f32),
    Text(String),
}

impl FromStr for LengthPercentage {
    type Err = TreeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let invalid = || TreeError::InvalidValue(input.to_string());
        if let Some(percent) = trimmed.strip_suffix('%') {
            return percent
                .trim()
                .parse::<f32>()
                .map(Self::Percent)
                .map_err(|_| invalid());
        }
        let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
        number.trim().parse::<f32>().map(Self::Px).map_err(|_| invalid())
    }
}

impl FromStr for AutoOr {
    type Err = TreeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        input.parse::<LengthPercentage>().map(Self::Length)
    }
}

impl TryFrom<ValueInput> for LengthPercentage {
    type Error = TreeError;

    fn try_from(value: ValueInput) -> Result<Self, Self::Error> {
        match value {
            ValueInput::Number(px) => Ok(Self::Px(px)),
            ValueInput::Text(text) => text.parse(),
        }
    }
}

impl TryFrom<ValueInput> for AutoOr {
    type Error = TreeError;

    fn try_from(value: ValueInput) -> Result<Self, Self::Error> {
        match value {
            ValueInput::Number(px) => Ok(Self::from(px)),
            ValueInput::Text(text) => text.parse(),
        }
    }
}

impl fmt::Display for LengthPercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(percent) => write!(f, "{percent}%"),
        }
    }
}

impl fmt::Display for AutoOr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Length(length) => length.fmt(f),
        }
    }
}

impl From<LengthPercentage> for String {
    fn from(value: LengthPercentage) -> Self {
        value.to_string()
    }
}

impl From<AutoOr> for String {
    fn from(value: AutoOr) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lengths() {
        assert_eq!("12px".parse::<LengthPercentage>().ok(), Some(LengthPercentage::Px(12.0)));
        assert_eq!("12".parse::<LengthPercentage>().ok(), Some(LengthPercentage::Px(12.0)));
        assert_eq!(
            " 50% ".parse::<LengthPercentage>().ok(),
            Some(LengthPercentage::Percent(50.0))
        );
        assert_eq!("auto".parse::<AutoOr>().ok(), Some(AutoOr::Auto));
        assert!("wide".parse::<AutoOr>().is_err());
    }

    #[test]
    fn test_resolve_percentages() {
        assert_eq!(LengthPercentage::Percent(25.0).resolve(200.0), 50.0);
        assert_eq!(LengthPercentage::Px(7.0).resolve(200.0), 7.0);
        assert_eq!(AutoOr::Auto.resolve(200.0), None);
        assert_eq!(AutoOr::Auto.to_px_or(200.0, 3.0), 3.0);
    }

    #[test]
    fn test_deserialize_from_json() {
        let value: AutoOr = serde_json::from_str("\"10%\"").unwrap();
        assert_eq!(value, AutoOr::Length(LengthPercentage::Percent(10.0)));
        let value: AutoOr = serde_json::from_str("4").unwrap();
        assert_eq!(value, AutoOr::from(4.0));
    }
}
