//! Layout configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a layout run.
///
/// Every field has a default, so a configuration file only needs to name
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Width of the initial containing block in pixels.
    pub viewport_width: f32,
    /// Average glyph advance as a fraction of the font size.
    pub char_width_ratio: f32,
    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "We recommend a used value for 'normal' between 1.0 and 1.2."
    pub line_height_ratio: f32,
    /// Ascent above the baseline as a fraction of the font size.
    pub ascent_ratio: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            char_width_ratio: 0.6,
            line_height_ratio: 1.2,
            ascent_ratio: 0.8,
        }
    }
}

impl LayoutConfig {
    /// Parse a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `json` is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Same configuration with a different viewport width.
    #[must_use]
    pub const fn with_viewport_width(mut self, width: f32) -> Self {
        self.viewport_width = width;
        self
    }
}
