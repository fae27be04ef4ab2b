//! Bridge to a BBS installation's `config/bbs` directory.
//!
//! A BBS directory holds theme folders (`theme/<name>/config.txt` plus optional
//! `background.png`/`icons.png`), the live settings in `settings/bbs.json`, and
//! the active textures in `assets/textures/`. Importing a theme pushes its
//! colors and textures into the live settings; snapshotting does the reverse.

use crate::theme::matches_search;
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

const TEXTURES: [&str; 2] = ["background.png", "icons.png"];

pub struct BbsDir {
    root: PathBuf,
}

/// What an import changed, for reporting
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub primary_color: Option<i64>,
    pub background_color: Option<i64>,
    pub textures_copied: Vec<String>,
    pub backup: Option<PathBuf>,
}

impl BbsDir {
    /// Open a BBS config directory. The final path component must contain
    /// `bbs`, which is how a `config/bbs` folder is recognized.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let root = path.into();
        let is_bbs = root
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.contains("bbs"))
            .unwrap_or(false);
        if !is_bbs {
            bail!("{:?} is not a config/bbs directory", root);
        }
        if !root.is_dir() {
            bail!("{:?} does not exist or is not a directory", root);
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn themes_dir(&self) -> PathBuf {
        self.root.join("theme")
    }

    /// `theme/<name>`, where `name` must be a single plain folder name
    fn theme_dir(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.themes_dir().join(name)),
            _ => bail!("invalid theme name {:?}", name),
        }
    }

    fn settings_path(&self) -> PathBuf {
        self.root.join("settings").join("bbs.json")
    }

    fn textures_dir(&self) -> PathBuf {
        self.root.join("assets").join("textures")
    }

    /// Names of the theme folders, sorted. A missing `theme/` means none.
    pub fn available_themes(&self) -> Result<Vec<String>> {
        let dir = self.themes_dir();
        if !dir.exists() {
            tracing::debug!("Theme root directory not found: {:?}", dir);
            return Ok(Vec::new());
        }

        let mut themes = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("Failed to read {:?}", dir))? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    themes.push(name.to_string());
                }
            }
        }
        themes.sort();
        Ok(themes)
    }

    pub fn search(&self, term: &str) -> Result<Vec<String>> {
        Ok(self
            .available_themes()?
            .into_iter()
            .filter(|name| matches_search(name, term))
            .collect())
    }

    /// Apply `theme/<name>` to the live settings and textures
    pub fn import_theme(&self, name: &str) -> Result<ImportSummary> {
        let theme_dir = self.theme_dir(name)?;
        let config_txt = theme_dir.join("config.txt");
        if !config_txt.exists() {
            bail!("config.txt not found in theme folder {:?}", theme_dir);
        }
        let values = parse_theme_config(
            &fs::read_to_string(&config_txt)
                .with_context(|| format!("Failed to read {:?}", config_txt))?,
        )?;

        let settings_path = self.settings_path();
        if !settings_path.exists() {
            bail!("bbs.json not found at {:?}", settings_path);
        }
        let raw = fs::read_to_string(&settings_path)
            .with_context(|| format!("Failed to read {:?}", settings_path))?;
        let mut settings: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in {:?}", settings_path))?;

        let mut summary = ImportSummary::default();
        if let (Some(appearance), Some(color)) = (
            settings.get_mut("appearance").and_then(Value::as_object_mut),
            values.get("primary_color"),
        ) {
            appearance.insert("primary_color".to_string(), Value::from(*color));
            summary.primary_color = Some(*color);
        }
        if let (Some(background), Some(color)) = (
            settings.get_mut("background").and_then(Value::as_object_mut),
            values.get("background_color"),
        ) {
            background.insert("color".to_string(), Value::from(*color));
            summary.background_color = Some(*color);
        }

        summary.backup = Some(backup_file(&settings_path)?);
        write_json_4space(&settings_path, &settings)?;
        tracing::info!("Applied theme {} to {:?}", name, settings_path);

        let textures = self.textures_dir();
        fs::create_dir_all(&textures)
            .with_context(|| format!("Failed to create {:?}", textures))?;
        for texture in TEXTURES {
            let src = theme_dir.join(texture);
            if src.exists() {
                tracing::debug!("Copying {:?} to {:?}", src, textures);
                fs::copy(&src, textures.join(texture))
                    .with_context(|| format!("Failed to copy {:?}", src))?;
                summary.textures_copied.push(texture.to_string());
            }
        }

        Ok(summary)
    }

    /// Capture the live colors and textures as `theme/<name>`
    pub fn snapshot_theme(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Please enter a name for the export");
        }

        let dest = self.theme_dir(name)?;

        let settings_path = self.settings_path();
        let raw = fs::read_to_string(&settings_path)
            .with_context(|| format!("Failed to read {:?}", settings_path))?;
        let settings: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in {:?}", settings_path))?;

        let primary = settings
            .pointer("/appearance/primary_color")
            .context("bbs.json has no appearance.primary_color")?;
        let background = settings
            .pointer("/background/color")
            .context("bbs.json has no background.color")?;

        fs::create_dir_all(&dest).with_context(|| format!("Failed to create {:?}", dest))?;
        let config_txt = format!(
            "{{\n\t\"primary_color\": {},\n\t\"background_color\": {}\n}}",
            primary, background
        );
        fs::write(dest.join("config.txt"), config_txt)
            .with_context(|| format!("Failed to write config.txt in {:?}", dest))?;

        for texture in TEXTURES {
            let src = self.textures_dir().join(texture);
            if src.exists() {
                fs::copy(&src, dest.join(texture))
                    .with_context(|| format!("Failed to copy {:?}", src))?;
            }
        }

        tracing::info!("Snapshot of current settings saved to {:?}", dest);
        Ok(dest)
    }
}

/// Parse the `"key": <int>,` lines of a theme's config.txt. Braces and blank
/// lines are skipped; any other line with a colon must hold an integer.
pub fn parse_theme_config(contents: &str) -> Result<BTreeMap<String, i64>> {
    let line_re = Regex::new(r#"^\s*"?([A-Za-z0-9_]+)"?\s*:\s*(-?\d+)\s*,?\s*$"#)?;
    let mut values = BTreeMap::new();

    for (lineno, line) in contents.lines().enumerate() {
        if !line.contains(':') {
            continue;
        }
        let caps = line_re
            .captures(line)
            .with_context(|| format!("config.txt line {}: expected \"key\": number", lineno + 1))?;
        let value: i64 = caps[2]
            .parse()
            .with_context(|| format!("config.txt line {}: number out of range", lineno + 1))?;
        values.insert(caps[1].to_string(), value);
    }

    Ok(values)
}

fn backup_file(path: &Path) -> Result<PathBuf> {
    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("bbs.json");
    let backup = path.with_file_name(format!("{}.{}.bak", file_name, stamp));
    fs::copy(path, &backup).with_context(|| format!("Failed to back up {:?}", path))?;
    Ok(backup)
}

fn write_json_4space(path: &Path, value: &Value) -> Result<()> {
    use serde::Serialize;

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    fs::write(path, out).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bbs_fixture() -> (TempDir, BbsDir) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("config").join("bbs");
        fs::create_dir_all(root.join("settings")).unwrap();
        fs::create_dir_all(root.join("theme").join("Neon")).unwrap();
        fs::create_dir_all(root.join("theme").join("amber")).unwrap();
        fs::write(
            root.join("settings").join("bbs.json"),
            r#"{"appearance": {"primary_color": 1, "font": "vga"}, "background": {"color": 2}}"#,
        )
        .unwrap();
        fs::write(
            root.join("theme").join("Neon").join("config.txt"),
            "{\n\t\"primary_color\": 16711935,\n\t\"background_color\": 0\n}",
        )
        .unwrap();
        fs::write(root.join("theme").join("Neon").join("icons.png"), b"png").unwrap();
        let dir = BbsDir::open(&root).unwrap();
        (tmp, dir)
    }

    #[test]
    fn test_open_requires_bbs_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let other = tmp.path().join("settings");
        fs::create_dir_all(&other).unwrap();
        assert!(BbsDir::open(&other).is_err());
        assert!(BbsDir::open(tmp.path().join("bbs")).is_err());
    }

    #[test]
    fn test_list_and_search() {
        let (_tmp, dir) = bbs_fixture();
        assert_eq!(dir.available_themes().unwrap(), vec!["Neon", "amber"]);
        assert_eq!(dir.search("NEO").unwrap(), vec!["Neon"]);
        assert_eq!(dir.search("").unwrap().len(), 2);
    }

    #[test]
    fn test_parse_theme_config() {
        let values = parse_theme_config("{\n\t\"primary_color\": 42,\n\t\"background_color\": -1\n}")
            .unwrap();
        assert_eq!(values.get("primary_color"), Some(&42));
        assert_eq!(values.get("background_color"), Some(&-1));
        assert!(parse_theme_config("\"primary_color\": red").is_err());
    }

    #[test]
    fn test_import_updates_settings_and_textures() {
        let (_tmp, dir) = bbs_fixture();
        let summary = dir.import_theme("Neon").unwrap();
        assert_eq!(summary.primary_color, Some(16711935));
        assert_eq!(summary.background_color, Some(0));
        assert_eq!(summary.textures_copied, vec!["icons.png"]);
        assert!(summary.backup.unwrap().exists());

        let raw = fs::read_to_string(dir.root().join("settings").join("bbs.json")).unwrap();
        assert!(raw.contains("\n    \"appearance\""));
        let settings: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(settings["appearance"]["primary_color"], 16711935);
        assert_eq!(settings["appearance"]["font"], "vga");
        assert_eq!(settings["background"]["color"], 0);
        assert!(dir.root().join("assets/textures/icons.png").exists());
    }

    #[test]
    fn test_import_missing_config_fails() {
        let (_tmp, dir) = bbs_fixture();
        assert!(dir.import_theme("amber").is_err());
    }

    #[test]
    fn test_theme_names_cannot_leave_theme_folder() {
        let (tmp, dir) = bbs_fixture();
        fs::create_dir_all(tmp.path().join("x")).unwrap();
        fs::write(tmp.path().join("x").join("config.txt"), "\"primary_color\": 5").unwrap();

        assert!(dir.import_theme("../../../x").is_err());
        assert!(dir.import_theme("/tmp").is_err());
        assert!(dir.snapshot_theme("../escaped").is_err());
        assert!(dir.snapshot_theme("a/b").is_err());
        assert!(!dir.root().join("escaped").exists());

        let settings = fs::read_to_string(dir.root().join("settings").join("bbs.json")).unwrap();
        assert!(settings.contains("\"primary_color\": 1"));
    }

    #[test]
    fn test_snapshot_then_import_round_trip() {
        let (_tmp, dir) = bbs_fixture();
        let dest = dir.snapshot_theme("Saved").unwrap();
        let values = parse_theme_config(&fs::read_to_string(dest.join("config.txt")).unwrap())
            .unwrap();
        assert_eq!(values.get("primary_color"), Some(&1));
        assert_eq!(values.get("background_color"), Some(&2));
        assert!(dir.available_themes().unwrap().contains(&"Saved".to_string()));

        assert!(dir.snapshot_theme("   ").is_err());
    }
}
