//! Preview surface style state
//!
//! `PreviewStyle` is what the preview pane renders from. It mirrors the set of
//! custom properties a stylesheet would consume, so the same values end up in
//! the terminal preview and in `to_css()`.

use crate::theme::{ColorField, HexColor, ThemeColors};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BORDER_WIDTH_ON: &str = "2px";
pub const BORDER_WIDTH_OFF: &str = "0";
pub const SHADOW_OFF: &str = "none";
pub const PIXEL_FONT_FAMILY: &str = "'Courier New', monospace";
pub const PLAIN_FONT_FAMILY: &str = "Arial, sans-serif";

/// Low-opacity alpha (0x40 = 25%) applied to the accent glow
const SHADOW_ALPHA: u8 = 0x40;

/// Visual toggles that affect the preview independently of the colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOptions {
    pub enable_border: bool,
    pub enable_shadow: bool,
    pub pixel_font: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            enable_border: false,
            enable_shadow: false,
            pixel_font: true,
        }
    }
}

/// Style state of the preview surface
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewStyle {
    properties: BTreeMap<&'static str, String>,
    font_family: String,
}

impl PreviewStyle {
    /// Push colors and options onto the style. Writing the same inputs twice
    /// leaves the style unchanged.
    pub fn apply(&mut self, colors: &ThemeColors, options: &DisplayOptions) {
        for field in ColorField::ALL {
            self.set_property(field.css_variable(), colors.get(field).to_hex());
        }

        let border_width = if options.enable_border {
            BORDER_WIDTH_ON
        } else {
            BORDER_WIDTH_OFF
        };
        self.set_property("--border-width", border_width.to_string());

        let shadow = if options.enable_shadow {
            format!("0 0 20px {}", colors.accent.with_alpha_hex(SHADOW_ALPHA))
        } else {
            SHADOW_OFF.to_string()
        };
        self.set_property("--shadow", shadow);

        self.font_family = if options.pixel_font {
            PIXEL_FONT_FAMILY
        } else {
            PLAIN_FONT_FAMILY
        }
        .to_string();
    }

    fn set_property(&mut self, name: &'static str, value: String) {
        self.properties.insert(name, value);
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.properties.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn color(&self, field: ColorField) -> Option<HexColor> {
        self.property(field.css_variable())?.parse().ok()
    }

    pub fn has_border(&self) -> bool {
        matches!(self.property("--border-width"), Some(w) if w != BORDER_WIDTH_OFF)
    }

    pub fn has_shadow(&self) -> bool {
        matches!(self.property("--shadow"), Some(s) if s != SHADOW_OFF)
    }

    pub fn is_monospace(&self) -> bool {
        self.font_family.ends_with("monospace")
    }

    /// Render as an inline CSS declaration block
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (name, value) in self.properties() {
            css.push_str(&format!("{}: {};\n", name, value));
        }
        if !self.font_family.is_empty() {
            css.push_str(&format!("font-family: {};\n", self.font_family));
        }
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeCatalog;

    #[test]
    fn test_apply_sets_every_variable() {
        let mut style = PreviewStyle::default();
        let colors = ThemeCatalog::get(5).unwrap().colors;
        style.apply(&colors, &DisplayOptions::default());

        assert_eq!(style.property("--bg-color"), Some("#0f0f23"));
        assert_eq!(style.property("--text-color"), Some("#ff0080"));
        assert_eq!(style.property("--accent-color"), Some("#00ffff"));
        assert_eq!(style.property("--border-color"), Some("#ff0080"));
        assert_eq!(style.property("--border-width"), Some("0"));
        assert_eq!(style.property("--shadow"), Some("none"));
        assert_eq!(style.font_family(), PIXEL_FONT_FAMILY);
    }

    #[test]
    fn test_shadow_uses_accent_with_low_alpha() {
        let mut style = PreviewStyle::default();
        let colors = ThemeCatalog::get(5).unwrap().colors;
        let options = DisplayOptions {
            enable_shadow: true,
            ..DisplayOptions::default()
        };
        style.apply(&colors, &options);
        assert_eq!(style.property("--shadow"), Some("0 0 20px #00ffff40"));
        assert!(style.has_shadow());
    }

    #[test]
    fn test_plain_font() {
        let mut style = PreviewStyle::default();
        let options = DisplayOptions {
            pixel_font: false,
            ..DisplayOptions::default()
        };
        style.apply(&ThemeCatalog::get(0).unwrap().colors, &options);
        assert_eq!(style.font_family(), PLAIN_FONT_FAMILY);
        assert!(!style.is_monospace());
    }

    #[test]
    fn test_css_output() {
        let mut style = PreviewStyle::default();
        style.apply(&ThemeCatalog::get(0).unwrap().colors, &DisplayOptions::default());
        let css = style.to_css();
        assert!(css.contains("--bg-color: #000000;"));
        assert!(css.ends_with("font-family: 'Courier New', monospace;\n"));
    }
}
