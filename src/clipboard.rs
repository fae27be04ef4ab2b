//! Clipboard integration for the exported theme JSON
//!
//! Uses arboard for cross-platform clipboard access

use anyhow::{bail, Context, Result};
use arboard::Clipboard;

/// Put `text` on the system clipboard, returning the number of bytes copied
pub fn copy_text(text: &str) -> Result<usize> {
    if text.is_empty() {
        bail!("refusing to copy empty text");
    }

    let mut clipboard = Clipboard::new().context("Failed to open clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to set clipboard text")?;
    tracing::debug!("Copied {} bytes to clipboard", text.len());
    Ok(text.len())
}
