//! Data layer - frontend-agnostic UI state
//!
//! Frontends read these structures to render; the core mutates them.

pub mod ui_state;

pub use ui_state::{ColorDraft, EditorButton, Focus, OptionToggle, UiState, FOCUS_ORDER};
