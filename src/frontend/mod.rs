//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait the terminal editor implements.
//! It provides a unified interface for event polling, rendering, and cleanup.

pub mod events;
pub mod tui;

use crate::core::AppCore;
use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

/// Frontend trait
///
/// Separates rendering concerns from the theme logic in `AppCore`.
pub trait Frontend {
    /// Poll for user input events
    ///
    /// Returns all pending events converted to `FrontendEvent` (empty if none).
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Render the current application state. Called once per frame.
    fn render(&mut self, app: &AppCore) -> Result<()>;

    /// Restore the terminal before exit
    fn cleanup(&mut self) -> Result<()>;
}
