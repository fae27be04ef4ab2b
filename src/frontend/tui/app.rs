use super::editor_view;
use crate::core::{AppCore, FullscreenHost};
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// TUI Frontend using ratatui
///
/// Renders the editor with ratatui and handles events via crossterm. It also
/// acts as the fullscreen host for the preview pane.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    fullscreen: bool,
}

impl TuiFrontend {
    /// Create a new TUI frontend
    ///
    /// Initializes terminal in raw mode, enables bracketed paste, and enters alternate screen.
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            fullscreen: false,
        })
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (ignore repeats and releases)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(FrontendEvent::key(key_event.code, key_event.modifiers))
            }
            Event::Resize(w, h) => Some(FrontendEvent::resize(w, h)),
            Event::Paste(text) => Some(FrontendEvent::paste(text)),
            _ => None,
        }
    }
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();

        // Never block: the editor loop sleeps on the runtime between frames
        // so notification timers keep running
        while event::poll(Duration::ZERO)? {
            if let Some(frontend_event) = Self::convert_event(event::read()?) {
                events.push(frontend_event);
            }
        }

        Ok(events)
    }

    fn render(&mut self, app: &AppCore) -> Result<()> {
        let fullscreen = self.fullscreen;
        self.terminal
            .draw(|f| editor_view::draw(f, app, fullscreen))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )
        .context("Failed to restore terminal")?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl FullscreenHost for TuiFrontend {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn request_fullscreen(&mut self) -> Result<()> {
        let (width, height) =
            crossterm::terminal::size().context("Could not query terminal size")?;
        if width == 0 || height == 0 {
            bail!("terminal reports an empty {}x{} area", width, height);
        }
        self.fullscreen = true;
        tracing::debug!("Preview fullscreen at {}x{}", width, height);
        Ok(())
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
    }
}
