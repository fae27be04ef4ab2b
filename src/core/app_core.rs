use super::controller::{FullscreenHost, ThemeController};
use super::preview::DisplayOptions;
use crate::config::Config;
use crate::data::{ColorDraft, EditorButton, Focus, OptionToggle, UiState};
use crate::frontend::FrontendEvent;
use crate::theme::{ColorField, HexColor, ThemeCatalog};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};

/// Length of `#rrggbb`
const MAX_COLOR_DRAFT: usize = 7;

/// Core application state (frontend-agnostic)
///
/// AppCore is the thin adapter between widget input and the theme controller:
/// it turns key presses into controller operations and keeps the UI state
/// (focus, search text, color drafts) that the frontend renders.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    pub controller: ThemeController,

    pub ui_state: UiState,

    /// Application running flag
    pub running: bool,
}

impl AppCore {
    pub fn new(config: Config) -> Result<Self> {
        let mut controller =
            ThemeController::new(config.export.directory.clone(), config.ui.notification_hold());

        let initial = ThemeCatalog::resolve(&config.ui.default_preset)?;
        controller.select_theme(initial)?;

        let mut ui_state = UiState::new();
        ui_state.list_cursor = initial;

        Ok(Self {
            config,
            controller,
            ui_state,
            running: true,
        })
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Route one frontend event
    pub fn handle_event(&mut self, event: FrontendEvent, host: &mut dyn FullscreenHost) {
        match event {
            FrontendEvent::Key { code, modifiers } => self.handle_key(code, modifiers, host),
            FrontendEvent::Paste { text } => {
                for c in text.chars().filter(|c| !c.is_control()) {
                    self.insert_char(c);
                }
            }
            FrontendEvent::Resize { .. } => {}
            FrontendEvent::Quit => self.quit(),
        }
    }

    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        host: &mut dyn FullscreenHost,
    ) {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match code {
            KeyCode::Tab => return self.ui_state.focus_next(),
            KeyCode::BackTab => return self.ui_state.focus_previous(),
            KeyCode::F(11) => return self.controller.toggle_fullscreen(host),
            KeyCode::Esc => {
                if self.ui_state.color_draft.take().is_some() {
                    return;
                }
                if host.is_fullscreen() {
                    host.exit_fullscreen();
                } else {
                    self.quit();
                }
                return;
            }
            _ => {}
        }

        if self.ui_state.focus.is_text_input() {
            self.handle_text_key(code);
        } else {
            self.handle_command_key(code, host);
        }
    }

    fn handle_text_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Enter => {
                if let Focus::Color(field) = self.ui_state.focus {
                    self.commit_color(field);
                }
            }
            KeyCode::Down if self.ui_state.focus == Focus::Search => {
                self.ui_state.focus = Focus::ThemeList;
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, code: KeyCode, host: &mut dyn FullscreenHost) {
        match code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('a') => self.controller.apply_and_notify(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('f') => self.controller.toggle_fullscreen(host),
            KeyCode::Char('y') => self.copy_to_clipboard(),
            KeyCode::Char('d') => {
                self.controller.dismiss_notification();
            }
            KeyCode::Char('/') => self.ui_state.focus = Focus::Search,
            KeyCode::Up if self.ui_state.focus == Focus::ThemeList => self.move_list_cursor(-1),
            KeyCode::Down if self.ui_state.focus == Focus::ThemeList => self.move_list_cursor(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(host),
            _ => {}
        }
    }

    /// Enter/Space on the focused widget
    fn activate(&mut self, host: &mut dyn FullscreenHost) {
        match self.ui_state.focus {
            Focus::ThemeList => {
                let index = self.ui_state.list_cursor;
                // A filtered-out row is never selectable
                if !self.controller.theme_list().visible_indices().contains(&index) {
                    return;
                }
                if let Err(e) = self.controller.select_theme(index) {
                    tracing::warn!("Theme selection failed: {}", e);
                }
            }
            Focus::Option(toggle) => self.toggle_option(toggle),
            Focus::Button(EditorButton::Apply) => self.controller.apply_and_notify(),
            Focus::Button(EditorButton::Export) => self.export(),
            Focus::Button(EditorButton::Reset) => self.reset(),
            Focus::Button(EditorButton::Fullscreen) => self.controller.toggle_fullscreen(host),
            Focus::Search | Focus::Color(_) => {}
        }
    }

    /// Sync a checkbox change into the controller's display options
    fn toggle_option(&mut self, toggle: OptionToggle) {
        let mut options: DisplayOptions = self.controller.options();
        match toggle {
            OptionToggle::Border => options.enable_border = !options.enable_border,
            OptionToggle::Shadow => options.enable_shadow = !options.enable_shadow,
            OptionToggle::PixelFont => options.pixel_font = !options.pixel_font,
        }
        self.controller.apply_options(options);
    }

    fn insert_char(&mut self, c: char) {
        match self.ui_state.focus {
            Focus::Search => {
                self.ui_state.search_input.push(c);
                self.refilter();
            }
            Focus::Color(field) => {
                let draft = self.color_draft_mut(field);
                if draft.text.len() < MAX_COLOR_DRAFT {
                    draft.text.push(c);
                }
            }
            _ => {}
        }
    }

    fn delete_char(&mut self) {
        match self.ui_state.focus {
            Focus::Search => {
                self.ui_state.search_input.pop();
                self.refilter();
            }
            Focus::Color(field) => {
                self.color_draft_mut(field).text.pop();
            }
            _ => {}
        }
    }

    /// Draft for `field`; a new draft always starts empty
    fn color_draft_mut(&mut self, field: ColorField) -> &mut ColorDraft {
        let draft = self.ui_state.color_draft.get_or_insert_with(|| ColorDraft {
            field,
            text: String::new(),
        });
        if draft.field != field {
            *draft = ColorDraft {
                field,
                text: String::new(),
            };
        }
        draft
    }

    fn refilter(&mut self) {
        self.controller.filter_themes(&self.ui_state.search_input);
        let visible = self.controller.theme_list().visible_indices();
        if !visible.contains(&self.ui_state.list_cursor) {
            if let Some(first) = visible.first() {
                self.ui_state.list_cursor = *first;
            }
        }
    }

    /// Commit the typed color. The terminal field stands in for a native color
    /// picker, so anything that is not `#rrggbb` is refused before it reaches
    /// the controller.
    fn commit_color(&mut self, field: ColorField) {
        let Some(draft) = self.ui_state.color_draft.take() else {
            return;
        };
        match draft.text.parse::<HexColor>() {
            Ok(color) => self.controller.update_color(field, color),
            Err(e) => {
                tracing::debug!("Rejected color input for {}: {}", field.key(), e);
                self.controller
                    .show_notification(format!("Invalid color: {}", draft.text));
            }
        }
    }

    fn move_list_cursor(&mut self, delta: isize) {
        let visible = self.controller.theme_list().visible_indices();
        if visible.is_empty() {
            return;
        }
        let pos = visible
            .iter()
            .position(|i| *i == self.ui_state.list_cursor)
            .unwrap_or(0) as isize;
        let next = (pos + delta).clamp(0, visible.len() as isize - 1) as usize;
        self.ui_state.list_cursor = visible[next];
    }

    fn export(&mut self) {
        if let Err(e) = self.controller.export_theme() {
            tracing::error!("Export failed: {:#}", e);
            self.controller.show_notification(format!("Export failed: {}", e));
        }
    }

    fn reset(&mut self) {
        self.controller.reset_theme();
        self.ui_state.color_draft = None;
        self.ui_state.list_cursor = self.controller.theme_list().selected();
    }

    fn copy_to_clipboard(&mut self) {
        let result = self
            .controller
            .export_json()
            .and_then(|json| crate::clipboard::copy_text(&json));
        match result {
            Ok(bytes) => {
                tracing::debug!("Copied {} bytes of theme JSON", bytes);
                self.controller.show_notification("Theme JSON copied to clipboard!");
            }
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {:#}", e);
                self.controller.show_notification("Clipboard unavailable");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Viewport {
        fullscreen: bool,
    }

    impl FullscreenHost for Viewport {
        fn is_fullscreen(&self) -> bool {
            self.fullscreen
        }

        fn request_fullscreen(&mut self) -> Result<()> {
            self.fullscreen = true;
            Ok(())
        }

        fn exit_fullscreen(&mut self) {
            self.fullscreen = false;
        }
    }

    fn app() -> AppCore {
        let mut config = Config::default();
        config.export.directory = std::env::temp_dir();
        AppCore::new(config).unwrap()
    }

    fn press(app: &mut AppCore, host: &mut Viewport, code: KeyCode) {
        app.handle_key(code, KeyModifiers::NONE, host);
    }

    fn type_text(app: &mut AppCore, host: &mut Viewport, text: &str) {
        for c in text.chars() {
            press(app, host, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_default_preset_from_config() {
        let mut config = Config::default();
        config.ui.default_preset = "DOS Classic".to_string();
        let app = AppCore::new(config).unwrap();
        assert_eq!(app.controller.current_theme().name, "DOS Classic");
        assert_eq!(app.ui_state.list_cursor, 7);
    }

    #[test]
    fn test_list_navigation_selects_on_enter() {
        let mut app = app();
        let mut host = Viewport::default();
        press(&mut app, &mut host, KeyCode::Down);
        press(&mut app, &mut host, KeyCode::Down);
        assert_eq!(app.controller.current_theme().name, "Classic Green");

        press(&mut app, &mut host, KeyCode::Enter);
        assert_eq!(app.controller.current_theme().name, "Blue Screen");
    }

    #[test]
    fn test_search_filters_live() {
        let mut app = app();
        let mut host = Viewport::default();
        press(&mut app, &mut host, KeyCode::Char('/'));
        type_text(&mut app, &mut host, "cyber");

        assert_eq!(app.controller.theme_list().visible_indices(), vec![5]);
        assert_eq!(app.ui_state.list_cursor, 5);

        for _ in 0..5 {
            press(&mut app, &mut host, KeyCode::Backspace);
        }
        assert_eq!(app.controller.theme_list().visible_indices().len(), 8);
    }

    #[test]
    fn test_color_commit_and_reject() {
        let mut app = app();
        let mut host = Viewport::default();
        app.ui_state.focus = Focus::Color(ColorField::Border);

        type_text(&mut app, &mut host, "#a1b2c3");
        press(&mut app, &mut host, KeyCode::Enter);
        assert_eq!(app.controller.current_theme().colors.border.to_hex(), "#a1b2c3");

        type_text(&mut app, &mut host, "zz");
        press(&mut app, &mut host, KeyCode::Enter);
        assert_eq!(app.controller.current_theme().colors.border.to_hex(), "#a1b2c3");
        assert_eq!(
            app.controller.notifier().latest().map(|t| t.message.as_str()),
            Some("Invalid color: zz")
        );
    }

    #[test]
    fn test_backspace_and_typing_start_the_same_draft() {
        let mut app = app();
        let mut host = Viewport::default();
        app.ui_state.focus = Focus::Color(ColorField::Bg);

        press(&mut app, &mut host, KeyCode::Backspace);
        assert_eq!(app.ui_state.draft_for(ColorField::Bg), Some(""));

        type_text(&mut app, &mut host, "#123456");
        press(&mut app, &mut host, KeyCode::Enter);
        assert_eq!(app.controller.current_theme().colors.bg.to_hex(), "#123456");
    }

    #[test]
    fn test_enter_ignores_hidden_row_when_search_matches_nothing() {
        let mut app = app();
        let mut host = Viewport::default();
        press(&mut app, &mut host, KeyCode::Down);
        assert_eq!(app.ui_state.list_cursor, 1);

        press(&mut app, &mut host, KeyCode::Char('/'));
        type_text(&mut app, &mut host, "zzz");
        assert!(app.controller.theme_list().visible_indices().is_empty());

        press(&mut app, &mut host, KeyCode::Down);
        press(&mut app, &mut host, KeyCode::Enter);
        assert_eq!(app.controller.current_theme().name, "Classic Green");
        assert_eq!(app.controller.theme_list().selected(), 0);
    }

    #[test]
    fn test_checkbox_toggles_options() {
        let mut app = app();
        let mut host = Viewport::default();
        app.ui_state.focus = Focus::Option(OptionToggle::Shadow);
        press(&mut app, &mut host, KeyCode::Char(' '));
        assert!(app.controller.options().enable_shadow);
        assert!(app.controller.preview().has_shadow());
    }

    #[test]
    fn test_fullscreen_then_escape() {
        let mut app = app();
        let mut host = Viewport::default();
        press(&mut app, &mut host, KeyCode::F(11));
        assert!(host.fullscreen);

        press(&mut app, &mut host, KeyCode::Esc);
        assert!(!host.fullscreen);
        assert!(app.running);

        press(&mut app, &mut host, KeyCode::Esc);
        assert!(!app.running);
    }

    #[test]
    fn test_dismiss_key_drops_newest_toast() {
        let mut app = app();
        let mut host = Viewport::default();
        press(&mut app, &mut host, KeyCode::Char('a'));
        assert_eq!(app.controller.notifier().toasts().len(), 1);

        press(&mut app, &mut host, KeyCode::Char('d'));
        assert!(app.controller.notifier().toasts().is_empty());
    }

    #[test]
    fn test_reset_key_restores_cursor() {
        let mut app = app();
        let mut host = Viewport::default();
        app.controller.select_theme(4).unwrap();
        app.ui_state.list_cursor = 4;
        press(&mut app, &mut host, KeyCode::Char('r'));
        assert_eq!(app.ui_state.list_cursor, 0);
        assert_eq!(app.controller.current_theme().name, "Classic Green");
    }
}
