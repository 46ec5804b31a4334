//! # Editor Configuration
//!
//! The `.rules-overlay.yaml` file tells the editor where its inputs live:
//!
//! ```yaml
//! base: data/rulesmd.ini
//! translation: data/translation.ini
//! schema: data/schema.json
//! overlay: overlay.ini
//! language: zh-TW
//! description_language: en
//! ```
//!
//! `base` and `translation` are required by the time the editor starts, but
//! either may come from the command line instead of the file. Relative paths
//! in the file are relative to the file itself; paths given on the command
//! line are used as-is.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::defaults::{
    default_overlay_path, DEFAULT_CONFIG_FILENAME, DEFAULT_DESCRIPTION_LANGUAGE, DEFAULT_LANGUAGE,
};
use crate::error::{Error, Result};

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_description_language() -> String {
    DEFAULT_DESCRIPTION_LANGUAGE.to_string()
}

/// Where the editor reads its layers from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorConfig {
    /// Base rules file, never written
    #[serde(default)]
    pub base: Option<PathBuf>,
    /// Localization table, never written
    #[serde(default)]
    pub translation: Option<PathBuf>,
    /// Property catalog (JSON); without it no properties are suggested
    #[serde(default)]
    pub schema: Option<PathBuf>,
    /// User overlay; defaults to the platform data directory
    #[serde(default)]
    pub overlay: Option<PathBuf>,
    /// Section of the localization table used for display names
    #[serde(default = "default_language")]
    pub language: String,
    /// Language of property descriptions
    #[serde(default = "default_description_language")]
    pub description_language: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            base: None,
            translation: None,
            schema: None,
            overlay: None,
            language: default_language(),
            description_language: default_description_language(),
        }
    }
}

/// Values given on the command line; each one replaces the file's value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base: Option<PathBuf>,
    pub translation: Option<PathBuf>,
    pub schema: Option<PathBuf>,
    pub overlay: Option<PathBuf>,
    pub language: Option<String>,
}

impl EditorConfig {
    /// Parse YAML text; relative paths are left untouched
    pub fn parse(yaml: &str) -> Result<Self> {
        // An empty file is a valid, empty configuration
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a config file and resolve its relative paths against its directory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Cannot read config file {}: {}", path.display(), e),
            hint: Some(format!(
                "Create {} or point --config at an existing file",
                DEFAULT_CONFIG_FILENAME
            )),
        })?;
        let mut config = Self::parse(&content)?;
        if let Some(dir) = path.parent() {
            config.resolve_relative_to(dir);
        }
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config for a run
    ///
    /// An explicit path must exist. Without one, the default file in `dir` is
    /// used when present, otherwise the built-in defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILENAME);
        if candidate.is_file() {
            Self::from_file(candidate)
        } else {
            debug!("No {} in {}, using defaults", DEFAULT_CONFIG_FILENAME, dir.display());
            Ok(Self::default())
        }
    }

    /// Prefix every relative path with `dir`
    pub fn resolve_relative_to(&mut self, dir: &Path) {
        for path in [
            &mut self.base,
            &mut self.translation,
            &mut self.schema,
            &mut self.overlay,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if overrides.base.is_some() {
            self.base = overrides.base;
        }
        if overrides.translation.is_some() {
            self.translation = overrides.translation;
        }
        if overrides.schema.is_some() {
            self.schema = overrides.schema;
        }
        if overrides.overlay.is_some() {
            self.overlay = overrides.overlay;
        }
        if let Some(language) = overrides.language {
            self.language = language;
        }
    }

    /// Check that every required input is configured
    pub fn validate(&self) -> Result<()> {
        self.base_path()?;
        self.translation_path()?;
        if self.language.trim().is_empty() {
            return Err(Error::Config {
                message: "language must not be empty".to_string(),
                hint: Some(format!("Remove 'language:' to use {}", DEFAULT_LANGUAGE)),
            });
        }
        Ok(())
    }

    pub fn base_path(&self) -> Result<&Path> {
        self.base.as_deref().ok_or_else(|| Error::Config {
            message: "No base rules file configured".to_string(),
            hint: Some("Pass --base <FILE> or set 'base:' in .rules-overlay.yaml".to_string()),
        })
    }

    pub fn translation_path(&self) -> Result<&Path> {
        self.translation.as_deref().ok_or_else(|| Error::Config {
            message: "No localization file configured".to_string(),
            hint: Some(
                "Pass --translation <FILE> or set 'translation:' in .rules-overlay.yaml".to_string(),
            ),
        })
    }

    /// The configured overlay, or the platform default
    pub fn overlay_path(&self) -> PathBuf {
        self.overlay.clone().unwrap_or_else(default_overlay_path)
    }
}
