mod ignore;

pub use ignore::IgnoreSet;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file at {settings_path}: {source}")]
    SettingsReadError {
        settings_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file at {settings_path}: {source}")]
    SettingsParseError {
        settings_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid ignore pattern {pattern:?}: {source}")]
    InvalidIgnorePattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// Persisted user settings.
///
/// Persistence is explicit: mutate the struct, then call [`Settings::save`].
/// `format_options` is an opaque bag of style knobs forwarded verbatim to
/// the external formatting engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub format_on_save: bool,
    pub format_on_file_change: bool,
    pub format_embedded_code: bool,
    pub remove_extra_spaces: bool,
    pub add_trailing_spaces: bool,
    /// Newline-separated glob patterns for paths to skip; `#` starts a
    /// comment line and a leading `!` negates.
    pub ignore_patterns: String,
    pub format_options: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format_on_save: false,
            format_on_file_change: false,
            format_embedded_code: false,
            remove_extra_spaces: false,
            add_trailing_spaces: false,
            ignore_patterns: String::new(),
            format_options: BTreeMap::from([
                ("tab_width".to_owned(), "4".to_owned()),
                ("single_quote".to_owned(), "true".to_owned()),
                ("semi".to_owned(), "false".to_owned()),
                ("trailing_comma".to_owned(), "es5".to_owned()),
            ]),
        }
    }
}

impl Settings {
    pub fn load_from_path<P: AsRef<Path>>(settings_path: P) -> Result<Option<Self>, SettingsError> {
        let settings_path = settings_path.as_ref();
        if !settings_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(settings_path).map_err(|source| {
            SettingsError::SettingsReadError {
                settings_path: settings_path.to_path_buf(),
                source,
            }
        })?;

        let settings: Settings =
            toml::from_str(&content).map_err(|source| SettingsError::SettingsParseError {
                settings_path: settings_path.to_path_buf(),
                source,
            })?;

        Ok(Some(settings))
    }

    pub fn load() -> Result<Option<Self>, SettingsError> {
        let settings_path = Self::settings_path();
        Self::load_from_path(&settings_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, settings_path: P) -> anyhow::Result<()> {
        let settings_path = settings_path.as_ref();
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(settings_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let settings_path = Self::settings_path();
        self.save_to_path(&settings_path)
    }

    pub fn settings_path() -> PathBuf {
        let settings_dir = shellexpand::tilde("~/.config/markdown-polish");
        PathBuf::from(settings_dir.as_ref()).join("config.toml")
    }

    /// Compile the ignore patterns into a matcher.
    pub fn ignore_set(&self) -> Result<IgnoreSet, SettingsError> {
        IgnoreSet::parse(&self.ignore_patterns)
    }
}
