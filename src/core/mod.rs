//! Core business logic layer
//!
//! Theme state, the preview style it produces, export and notifications.
//! No rendering code lives here; frontends read the state and draw it.

pub mod app_core;
pub mod controller;
pub mod export;
pub mod notification;
pub mod preview;

pub use app_core::AppCore;
pub use controller::{FullscreenHost, ThemeController};
pub use preview::{DisplayOptions, PreviewStyle};
