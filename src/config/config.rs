use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::app_paths::AppPaths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Preference store document; defaults to the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Pretty-print the store document
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for icons
    pub use_glyphs: bool,

    /// Icons used by the column editor (can be overridden)
    pub icons: IconConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub lock: String,
    pub visible: String,
    pub hidden: String,
    pub move_up: String,
    pub move_down: String,
    pub reset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "column_prefs=debug"
    pub level: String,

    /// Write logs to the data directory instead of stderr
    pub log_to_file: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: None,
            pretty_json: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            icons: IconConfig::default(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            lock: "🔒".to_string(),
            visible: "☑".to_string(),
            hidden: "☐".to_string(),
            move_up: "▲".to_string(),
            move_down: "▼".to_string(),
            reset: "⟲".to_string(),
        }
    }
}

impl IconConfig {
    /// ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            lock: "[L]".to_string(),
            visible: "[x]".to_string(),
            hidden: "[ ]".to_string(),
            move_up: "^".to_string(),
            move_down: "v".to_string(),
            reset: "[R]".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: true,
        }
    }
}

impl Config {
    /// Load config from the default location, creating it on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if !config.display.use_glyphs {
            config.display.icons = IconConfig::simple();
        }

        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        AppPaths::config_file()
    }

    /// Where the preference store lives, honouring `[storage] file`
    pub fn preferences_file(&self) -> Result<PathBuf> {
        match &self.storage.file {
            Some(path) => Ok(path.clone()),
            None => AppPaths::preferences_file(),
        }
    }

    /// Default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# column-prefs configuration
# Location: ~/.config/column-prefs/config.toml (Linux)
#           ~/Library/Application Support/column-prefs/config.toml (macOS)
#           %APPDATA%\column-prefs\config.toml (Windows)

[storage]
# Preference store document (leave commented to use the data directory)
# file = "/path/to/column_preferences.json"

# Pretty-print the store document
pretty_json = true

[display]
# Use Unicode glyphs in the column editor
# Set to false for ASCII-only mode
use_glyphs = true

# Icons, set to ASCII automatically when use_glyphs = false
[display.icons]
lock = "🔒"
visible = "☑"
hidden = "☐"
move_up = "▲"
move_down = "▼"
reset = "⟲"

[logging]
# Filter directive; RUST_LOG takes precedence when set
level = "info"

# Write logs under the data directory instead of stderr
log_to_file = true
"#
        .to_string()
    }
}
