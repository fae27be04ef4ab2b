//! UI State - focus and in-progress input for the editor widgets
//!
//! This module contains UI state that is independent of rendering. The theme
//! itself lives in the controller; this only tracks which widget has focus,
//! what is typed into text fields, and the list cursor.

use crate::theme::ColorField;

/// Which checkbox a focus slot refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionToggle {
    Border,
    Shadow,
    PixelFont,
}

impl OptionToggle {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Border => "Enable Border",
            Self::Shadow => "Enable Shadow",
            Self::PixelFont => "Pixel Font",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorButton {
    Apply,
    Export,
    Reset,
    Fullscreen,
}

impl EditorButton {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Apply => "Apply",
            Self::Export => "Export",
            Self::Reset => "Reset",
            Self::Fullscreen => "Fullscreen",
        }
    }
}

/// Focusable widgets in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    ThemeList,
    Search,
    Color(ColorField),
    Option(OptionToggle),
    Button(EditorButton),
}

pub const FOCUS_ORDER: [Focus; 13] = [
    Focus::ThemeList,
    Focus::Search,
    Focus::Color(ColorField::Bg),
    Focus::Color(ColorField::Text),
    Focus::Color(ColorField::Accent),
    Focus::Color(ColorField::Border),
    Focus::Option(OptionToggle::Border),
    Focus::Option(OptionToggle::Shadow),
    Focus::Option(OptionToggle::PixelFont),
    Focus::Button(EditorButton::Apply),
    Focus::Button(EditorButton::Export),
    Focus::Button(EditorButton::Reset),
    Focus::Button(EditorButton::Fullscreen),
];

impl Focus {
    /// True for widgets that consume printable keys
    pub fn is_text_input(&self) -> bool {
        matches!(self, Focus::Search | Focus::Color(_))
    }
}

/// A color field being typed into, not yet committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDraft {
    pub field: ColorField,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub focus: Focus,

    /// Search box contents
    pub search_input: String,

    /// Highlighted row in the theme list (catalog index)
    pub list_cursor: usize,

    pub color_draft: Option<ColorDraft>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::ThemeList,
            search_input: String::new(),
            list_cursor: 0,
            color_draft: None,
        }
    }

    pub fn focus_next(&mut self) {
        self.move_focus(1);
    }

    pub fn focus_previous(&mut self) {
        self.move_focus(FOCUS_ORDER.len() - 1);
    }

    fn move_focus(&mut self, step: usize) {
        let current = FOCUS_ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        self.focus = FOCUS_ORDER[(current + step) % FOCUS_ORDER.len()];
        // Leaving a color field abandons its uncommitted text
        self.color_draft = None;
    }

    /// Draft text for `field`, if that field is being edited
    pub fn draft_for(&self, field: ColorField) -> Option<&str> {
        self.color_draft
            .as_ref()
            .filter(|d| d.field == field)
            .map(|d| d.text.as_str())
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut ui = UiState::new();
        ui.focus_previous();
        assert_eq!(ui.focus, Focus::Button(EditorButton::Fullscreen));
        ui.focus_next();
        assert_eq!(ui.focus, Focus::ThemeList);
        ui.focus_next();
        assert_eq!(ui.focus, Focus::Search);
    }

    #[test]
    fn test_focus_change_drops_draft() {
        let mut ui = UiState::new();
        ui.focus = Focus::Color(ColorField::Bg);
        ui.color_draft = Some(ColorDraft {
            field: ColorField::Bg,
            text: "#12".to_string(),
        });
        assert_eq!(ui.draft_for(ColorField::Bg), Some("#12"));
        assert_eq!(ui.draft_for(ColorField::Text), None);

        ui.focus_next();
        assert!(ui.color_draft.is_none());
    }
}
