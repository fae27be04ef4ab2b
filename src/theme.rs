//! Built-in BBS theme catalog
//!
//! Provides the fixed, ordered list of presets the editor offers plus the
//! `#rrggbb` color type shared by the controller, the preview and the export
//! format.

use anyhow::{bail, Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 24-bit color written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// Build from a packed `0xRRGGBB` literal
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }

    /// Lowercase `#rrggbb` form, matching what native color inputs emit
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#rrggbbaa` form used for translucent glows
    pub fn with_alpha_hex(&self, alpha: u8) -> String {
        format!("{}{:02x}", self.to_hex(), alpha)
    }

    pub fn to_ratatui(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Scale each channel toward black; `factor` is clamped to 0.0..=1.0
    pub fn dimmed(&self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * f).round() as u8,
            g: (self.g as f32 * f).round() as u8,
            b: (self.b as f32 * f).round() as u8,
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_hex())
    }
}

impl FromStr for HexColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            bail!("expected a #rrggbb color, got {:?}", s);
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).with_context(|| format!("invalid hex color {:?}", s))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One of the four editable color slots of a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorField {
    Bg,
    Text,
    Accent,
    Border,
}

impl ColorField {
    pub const ALL: [ColorField; 4] = [
        ColorField::Bg,
        ColorField::Text,
        ColorField::Accent,
        ColorField::Border,
    ];

    /// Key used in the exported JSON
    pub fn key(&self) -> &'static str {
        match self {
            Self::Bg => "bg",
            Self::Text => "text",
            Self::Accent => "accent",
            Self::Border => "border",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bg => "Background",
            Self::Text => "Text",
            Self::Accent => "Accent",
            Self::Border => "Border",
        }
    }

    /// Preview custom property this field drives
    pub fn css_variable(&self) -> &'static str {
        match self {
            Self::Bg => "--bg-color",
            Self::Text => "--text-color",
            Self::Accent => "--accent-color",
            Self::Border => "--border-color",
        }
    }
}

/// The four colors that make up a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: HexColor,
    pub text: HexColor,
    pub accent: HexColor,
    pub border: HexColor,
}

impl ThemeColors {
    pub fn get(&self, field: ColorField) -> HexColor {
        match field {
            ColorField::Bg => self.bg,
            ColorField::Text => self.text,
            ColorField::Accent => self.accent,
            ColorField::Border => self.border,
        }
    }

    pub fn set(&mut self, field: ColorField, value: HexColor) {
        match field {
            ColorField::Bg => self.bg = value,
            ColorField::Text => self.text = value,
            ColorField::Accent => self.accent = value,
            ColorField::Border => self.border = value,
        }
    }
}

/// A named, immutable built-in theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    pub name: &'static str,
    pub colors: ThemeColors,
}

impl ThemePreset {
    const fn new(name: &'static str, bg: u32, text: u32, accent: u32, border: u32) -> Self {
        Self {
            name,
            colors: ThemeColors {
                bg: HexColor::from_u32(bg),
                text: HexColor::from_u32(text),
                accent: HexColor::from_u32(accent),
                border: HexColor::from_u32(border),
            },
        }
    }
}

static PRESETS: [ThemePreset; 8] = [
    ThemePreset::new("Classic Green", 0x000000, 0x00ff00, 0xffff00, 0xffffff),
    ThemePreset::new("Amber Terminal", 0x1a0f00, 0xffb000, 0xff6600, 0xffb000),
    ThemePreset::new("Blue Screen", 0x000080, 0xffffff, 0xffff00, 0xc0c0c0),
    ThemePreset::new("Matrix", 0x000000, 0x00ff41, 0x008f11, 0x00ff41),
    ThemePreset::new("Retro Pink", 0x2d1b69, 0xff6ec7, 0x00d4aa, 0xff6ec7),
    ThemePreset::new("Cyberpunk", 0x0f0f23, 0xff0080, 0x00ffff, 0xff0080),
    ThemePreset::new("Hacker Green", 0x0d1117, 0x39ff14, 0xff073a, 0x39ff14),
    ThemePreset::new("DOS Classic", 0x000000, 0xc0c0c0, 0xffff00, 0x808080),
];

/// Read-only access to the built-in presets
pub struct ThemeCatalog;

impl ThemeCatalog {
    /// All presets, always the same entries in the same order
    pub fn list() -> &'static [ThemePreset] {
        &PRESETS
    }

    pub fn len() -> usize {
        PRESETS.len()
    }

    pub fn get(index: usize) -> Option<&'static ThemePreset> {
        PRESETS.get(index)
    }

    /// Case-insensitive lookup by display name, returning the catalog index
    pub fn find(name: &str) -> Option<usize> {
        PRESETS
            .iter()
            .position(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Resolve a CLI-style reference: either a catalog index or a preset name
    pub fn resolve(reference: &str) -> Result<usize> {
        if let Ok(index) = reference.trim().parse::<usize>() {
            if index < Self::len() {
                return Ok(index);
            }
            bail!("preset index {} out of range (0-{})", index, Self::len() - 1);
        }
        Self::find(reference).with_context(|| format!("no preset named {:?}", reference))
    }
}

/// Case-insensitive substring match used by every theme search box
pub fn matches_search(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_fixed_and_ordered() {
        let names: Vec<_> = ThemeCatalog::list().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "Classic Green",
                "Amber Terminal",
                "Blue Screen",
                "Matrix",
                "Retro Pink",
                "Cyberpunk",
                "Hacker Green",
                "DOS Classic",
            ]
        );
        assert_eq!(ThemeCatalog::list(), ThemeCatalog::list());
    }

    #[test]
    fn test_blue_screen_colors() {
        let preset = ThemeCatalog::get(2).unwrap();
        assert_eq!(preset.colors.bg.to_hex(), "#000080");
        assert_eq!(preset.colors.text.to_hex(), "#ffffff");
        assert_eq!(preset.colors.accent.to_hex(), "#ffff00");
        assert_eq!(preset.colors.border.to_hex(), "#c0c0c0");
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!("#1a0f00".parse::<HexColor>().unwrap(), HexColor::from_u32(0x1a0f00));
        assert_eq!("FF6EC7".parse::<HexColor>().unwrap(), HexColor::from_u32(0xff6ec7));
        assert!("#12345".parse::<HexColor>().is_err());
        assert!("#gg0000".parse::<HexColor>().is_err());
        assert!("#ééé".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_hex_parsing_rejects_signs_and_repeated_hash() {
        assert!("#+1+2+3".parse::<HexColor>().is_err());
        assert!("##123456".parse::<HexColor>().is_err());
        assert!("#-12345".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_alpha_suffix() {
        assert_eq!(HexColor::from_u32(0x00ffff).with_alpha_hex(0x40), "#00ffff40");
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(ThemeCatalog::resolve("matrix").unwrap(), 3);
        assert_eq!(ThemeCatalog::resolve("7").unwrap(), 7);
        assert!(ThemeCatalog::resolve("8").is_err());
        assert!(ThemeCatalog::resolve("Solarized").is_err());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        assert!(matches_search("Matrix", "MAT"));
        assert!(matches_search("Hacker Green", ""));
        assert!(!matches_search("DOS Classic", "green"));
    }

    #[test]
    fn test_color_field_set_touches_one_slot() {
        let mut colors = ThemeCatalog::get(0).unwrap().colors;
        colors.set(ColorField::Accent, HexColor::from_u32(0x123456));
        assert_eq!(colors.accent.to_hex(), "#123456");
        assert_eq!(colors.bg, ThemeCatalog::get(0).unwrap().colors.bg);
    }
}
