//! Theme controller: the single owner of "what the preview looks like".
//!
//! Holds the editable copy of the selected preset, the display options, the
//! theme list view state, the color input values and the computed preview
//! style. Every operation runs synchronously and ends by re-applying state to
//! the preview.

use super::export::ExportedThemeFile;
use super::notification::Notifier;
use super::preview::{DisplayOptions, PreviewStyle};
use crate::theme::{matches_search, ColorField, HexColor, ThemeCatalog, ThemeColors, ThemePreset};
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Editable copy of a preset. May drift from every catalog entry after edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentTheme {
    pub name: String,
    pub colors: ThemeColors,
}

impl CurrentTheme {
    fn from_preset(preset: &ThemePreset) -> Self {
        Self {
            name: preset.name.to_string(),
            colors: preset.colors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeListEntry {
    pub name: &'static str,
    pub visible: bool,
}

/// Theme list as displayed: one entry per preset plus the selection marker
#[derive(Debug, Clone)]
pub struct ThemeListState {
    entries: Vec<ThemeListEntry>,
    selected: usize,
}

impl ThemeListState {
    fn populate() -> Self {
        Self {
            entries: ThemeCatalog::list()
                .iter()
                .map(|preset| ThemeListEntry {
                    name: preset.name,
                    visible: true,
                })
                .collect(),
            selected: 0,
        }
    }

    pub fn entries(&self) -> &[ThemeListEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.visible)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Something that can put the preview container into fullscreen
pub trait FullscreenHost {
    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&mut self) -> Result<()>;
    fn exit_fullscreen(&mut self);
}

pub struct ThemeController {
    current: CurrentTheme,
    options: DisplayOptions,
    theme_list: ThemeListState,
    color_inputs: ThemeColors,
    preview: PreviewStyle,
    notifier: Notifier,
    export_dir: PathBuf,
}

impl ThemeController {
    /// Build the controller with the first preset selected and applied
    pub fn new(export_dir: impl Into<PathBuf>, notification_hold: Duration) -> Self {
        let first = &ThemeCatalog::list()[0];
        let mut controller = Self {
            current: CurrentTheme::from_preset(first),
            options: DisplayOptions::default(),
            theme_list: ThemeListState::populate(),
            color_inputs: first.colors,
            preview: PreviewStyle::default(),
            notifier: Notifier::new(notification_hold),
            export_dir: export_dir.into(),
        };
        controller.apply_theme();
        controller
    }

    /// Replace the current theme with a fresh copy of the preset at `index`
    pub fn select_theme(&mut self, index: usize) -> Result<()> {
        let Some(preset) = ThemeCatalog::get(index) else {
            tracing::warn!("Ignoring selection of unknown preset index {}", index);
            bail!("no preset at index {}", index);
        };

        self.theme_list.selected = index;
        self.current = CurrentTheme::from_preset(preset);
        self.color_inputs = preset.colors;
        tracing::debug!("Selected preset {} ({})", index, preset.name);

        self.apply_theme();
        Ok(())
    }

    /// Overwrite one color of the current theme. The list selection is left
    /// alone even though the theme no longer matches that preset.
    pub fn update_color(&mut self, field: ColorField, value: HexColor) {
        self.current.colors.set(field, value);
        self.color_inputs.set(field, value);
        self.apply_theme();
    }

    /// Push the current theme and options onto the preview surface
    pub fn apply_theme(&mut self) {
        self.preview.apply(&self.current.colors, &self.options);
        tracing::trace!(css = %self.preview.to_css(), "Preview updated");
    }

    /// Store new display options (from the checkboxes) and apply them
    pub fn apply_options(&mut self, options: DisplayOptions) {
        self.options = options;
        self.apply_theme();
    }

    /// What the Apply button does
    pub fn apply_and_notify(&mut self) {
        self.apply_theme();
        self.show_notification("Theme applied successfully!");
    }

    /// Show only presets whose name contains `term`, ignoring case
    pub fn filter_themes(&mut self, term: &str) {
        for entry in &mut self.theme_list.entries {
            entry.visible = matches_search(entry.name, term);
        }
    }

    pub fn exported_file(&self) -> ExportedThemeFile {
        ExportedThemeFile::new(self.current.colors, self.options)
    }

    pub fn export_json(&self) -> Result<String> {
        self.exported_file().to_json()
    }

    /// Write the export file into the export directory and notify
    pub fn export_theme(&mut self) -> Result<PathBuf> {
        let path = self.exported_file().write_to_dir(&self.export_dir)?;
        self.show_notification("Theme exported successfully!");
        Ok(path)
    }

    /// Back to the first preset with default options
    pub fn reset_theme(&mut self) {
        if let Err(e) = self.select_theme(0) {
            tracing::error!("Reset failed to select the default preset: {}", e);
        }
        self.options = DisplayOptions::default();
        self.apply_theme();
        self.show_notification("Theme reset to default!");
    }

    /// Enter fullscreen if not already there, otherwise leave it. Failing to
    /// enter is logged only.
    pub fn toggle_fullscreen(&mut self, host: &mut dyn FullscreenHost) {
        if !host.is_fullscreen() {
            if let Err(e) = host.request_fullscreen() {
                tracing::warn!("Error attempting to enable fullscreen: {:#}", e);
            }
        } else {
            host.exit_fullscreen();
        }
    }

    pub fn show_notification(&mut self, message: impl Into<String>) -> u64 {
        self.notifier.show(message)
    }

    /// Advance toast phases; call once per frame
    pub fn pump_notifications(&mut self) -> bool {
        self.notifier.pump()
    }

    pub fn current_theme(&self) -> &CurrentTheme {
        &self.current
    }

    pub fn options(&self) -> DisplayOptions {
        self.options
    }

    pub fn theme_list(&self) -> &ThemeListState {
        &self.theme_list
    }

    /// Values shown in the four color inputs
    pub fn color_inputs(&self) -> &ThemeColors {
        &self.color_inputs
    }

    pub fn preview(&self) -> &PreviewStyle {
        &self.preview
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Drop the newest toast early, if any
    pub fn dismiss_notification(&mut self) -> bool {
        match self.notifier.latest().map(|t| t.id) {
            Some(id) => {
                self.notifier.dismiss(id);
                true
            }
            None => false,
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notification::DEFAULT_HOLD;

    fn controller() -> ThemeController {
        ThemeController::new(".", DEFAULT_HOLD)
    }

    struct FakeHost {
        fullscreen: bool,
        fail: bool,
        requests: usize,
    }

    impl FullscreenHost for FakeHost {
        fn is_fullscreen(&self) -> bool {
            self.fullscreen
        }

        fn request_fullscreen(&mut self) -> Result<()> {
            self.requests += 1;
            if self.fail {
                bail!("terminal size unavailable");
            }
            self.fullscreen = true;
            Ok(())
        }

        fn exit_fullscreen(&mut self) {
            self.fullscreen = false;
        }
    }

    #[test]
    fn test_select_copies_every_preset() {
        let mut c = controller();
        for (i, preset) in ThemeCatalog::list().iter().enumerate() {
            c.select_theme(i).unwrap();
            assert_eq!(c.current_theme().name, preset.name);
            assert_eq!(c.current_theme().colors, preset.colors);
            assert_eq!(c.color_inputs(), &preset.colors);
            assert_eq!(c.theme_list().selected(), i);
        }
    }

    #[test]
    fn test_select_invalid_index_is_rejected() {
        let mut c = controller();
        c.select_theme(3).unwrap();
        let before = c.current_theme().clone();
        let style = c.preview().clone();

        assert!(c.select_theme(8).is_err());
        assert_eq!(c.current_theme(), &before);
        assert_eq!(c.preview(), &style);
        assert_eq!(c.theme_list().selected(), 3);
    }

    #[test]
    fn test_edits_do_not_touch_the_catalog() {
        let mut c = controller();
        c.select_theme(1).unwrap();
        c.update_color(ColorField::Bg, HexColor::from_u32(0x222222));
        assert_eq!(ThemeCatalog::get(1).unwrap().colors.bg.to_hex(), "#1a0f00");

        c.select_theme(1).unwrap();
        assert_eq!(c.current_theme().colors.bg.to_hex(), "#1a0f00");
    }

    #[test]
    fn test_update_color_changes_one_field() {
        let mut c = controller();
        c.select_theme(6).unwrap();
        let before = c.current_theme().colors;

        c.update_color(ColorField::Accent, HexColor::from_u32(0xabcdef));
        let after = c.current_theme().colors;
        assert_eq!(after.accent.to_hex(), "#abcdef");
        assert_eq!(after.bg, before.bg);
        assert_eq!(after.text, before.text);
        assert_eq!(after.border, before.border);
        assert_eq!(c.theme_list().selected(), 6);
        assert_eq!(c.preview().property("--accent-color"), Some("#abcdef"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut c = controller();
        c.apply_options(DisplayOptions {
            enable_border: true,
            enable_shadow: true,
            pixel_font: false,
        });
        let first = c.preview().clone();
        c.apply_theme();
        c.apply_theme();
        assert_eq!(c.preview(), &first);
    }

    #[test]
    fn test_border_toggle_restores_width() {
        let mut c = controller();
        let on = DisplayOptions {
            enable_border: true,
            ..DisplayOptions::default()
        };
        c.apply_options(on);
        let width = c.preview().property("--border-width").map(str::to_string);

        c.apply_options(DisplayOptions::default());
        assert_eq!(c.preview().property("--border-width"), Some("0"));

        c.apply_options(on);
        assert_eq!(c.preview().property("--border-width").map(str::to_string), width);
        assert_eq!(width.as_deref(), Some("2px"));
    }

    #[test]
    fn test_filter() {
        let mut c = controller();
        c.select_theme(2).unwrap();

        c.filter_themes("matrix");
        let visible: Vec<_> = c
            .theme_list()
            .visible_indices()
            .into_iter()
            .map(|i| c.theme_list().entries()[i].name)
            .collect();
        assert_eq!(visible, vec!["Matrix"]);
        assert_eq!(c.theme_list().selected(), 2);
        assert_eq!(c.current_theme().name, "Blue Screen");

        c.filter_themes("GREEN");
        assert_eq!(c.theme_list().visible_indices(), vec![0, 6]);

        c.filter_themes("");
        assert_eq!(c.theme_list().visible_indices().len(), ThemeCatalog::len());
    }

    #[test]
    fn test_export_blue_screen_with_defaults() {
        let mut c = controller();
        c.select_theme(2).unwrap();
        let json = c.export_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["name"], "Custom Theme");
        assert_eq!(value["bg"], "#000080");
        assert_eq!(value["text"], "#ffffff");
        assert_eq!(value["accent"], "#ffff00");
        assert_eq!(value["border"], "#c0c0c0");
        assert_eq!(
            value["options"],
            serde_json::json!({"enableBorder": false, "enableShadow": false, "pixelFont": true})
        );
    }

    #[test]
    fn test_export_theme_writes_file_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = ThemeController::new(dir.path(), DEFAULT_HOLD);
        let path = c.export_theme().unwrap();

        assert!(path.exists());
        assert_eq!(
            c.notifier().latest().map(|t| t.message.as_str()),
            Some("Theme exported successfully!")
        );
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut c = controller();
        c.select_theme(5).unwrap();
        c.update_color(ColorField::Text, HexColor::from_u32(0x010203));
        c.apply_options(DisplayOptions {
            enable_border: true,
            enable_shadow: true,
            pixel_font: false,
        });

        c.reset_theme();
        let first = ThemeCatalog::get(0).unwrap();
        assert_eq!(c.current_theme().name, "Classic Green");
        assert_eq!(c.current_theme().colors, first.colors);
        assert_eq!(
            c.options(),
            DisplayOptions {
                enable_border: false,
                enable_shadow: false,
                pixel_font: true
            }
        );
        assert_eq!(c.preview().property("--shadow"), Some("none"));
        assert_eq!(
            c.notifier().latest().map(|t| t.message.as_str()),
            Some("Theme reset to default!")
        );
    }

    #[test]
    fn test_toggle_fullscreen() {
        let mut c = controller();
        let mut host = FakeHost {
            fullscreen: false,
            fail: false,
            requests: 0,
        };

        c.toggle_fullscreen(&mut host);
        assert!(host.is_fullscreen());
        c.toggle_fullscreen(&mut host);
        assert!(!host.is_fullscreen());
        assert_eq!(host.requests, 1);
    }

    #[test]
    fn test_fullscreen_failure_is_swallowed() {
        let mut c = controller();
        let mut host = FakeHost {
            fullscreen: false,
            fail: true,
            requests: 0,
        };
        c.toggle_fullscreen(&mut host);
        assert!(!host.is_fullscreen());
        assert!(c.notifier().toasts().is_empty());
    }
}
