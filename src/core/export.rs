//! Exported theme file format
//!
//! The file is a snapshot of the current colors plus the display options under
//! a fixed name, written as two-space indented JSON.

use super::preview::DisplayOptions;
use crate::theme::ThemeColors;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const EXPORT_FILENAME: &str = "bbs-theme.json";
pub const EXPORT_THEME_NAME: &str = "Custom Theme";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedThemeFile {
    pub name: String,
    #[serde(flatten)]
    pub colors: ThemeColors,
    pub options: DisplayOptions,
}

impl ExportedThemeFile {
    pub fn new(colors: ThemeColors, options: DisplayOptions) -> Self {
        Self {
            name: EXPORT_THEME_NAME.to_string(),
            colors,
            options,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize theme")
    }

    /// Write `bbs-theme.json` into `dir`, creating the directory if needed
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {:?}", dir))?;
        let path = dir.join(EXPORT_FILENAME);
        fs::write(&path, self.to_json()?)
            .with_context(|| format!("Failed to write {:?}", path))?;
        tracing::info!("Exported theme to {:?}", path);
        Ok(path)
    }
}
