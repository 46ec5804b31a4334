//! Default values for rules-overlay configuration.
//!
//! Centralized so the CLI, the config loader and the tests agree.

use std::path::PathBuf;

/// Config file looked up in the current directory when `--config` is absent
pub const DEFAULT_CONFIG_FILENAME: &str = ".rules-overlay.yaml";

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "RULES_OVERLAY_CONFIG";

/// Section of the localization table used for display names
pub const DEFAULT_LANGUAGE: &str = "zh-TW";

/// Language of schema descriptions
pub const DEFAULT_DESCRIPTION_LANGUAGE: &str = "en";

/// Returns the default overlay path.
///
/// Uses the platform-appropriate data directory:
/// - Linux: `~/.local/share/rules-overlay/overlay.ini`
/// - macOS: `~/Library/Application Support/rules-overlay/overlay.ini`
/// - Windows: `{FOLDERID_RoamingAppData}\rules-overlay\overlay.ini`
///
/// Falls back to `overlay.ini` in the current directory if the platform data
/// directory cannot be determined.
pub fn default_overlay_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("rules-overlay").join("overlay.ini"),
        None => PathBuf::from("overlay.ini"),
    }
}
