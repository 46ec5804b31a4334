//! # Output Configuration
//!
//! Controls CLI output appearance (colors and emojis) based on terminal
//! capabilities and user preferences, and formats entities for display.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rules_overlay::output::{emoji, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Overlay saved", emoji(&config, "✅", "[OK]"));
//! ```

use std::env;

use console::style;

use crate::editor::{AvailableProperty, EntityDetail, EntitySummary, PropertyView};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// - `always`: force colors on (overrides NO_COLOR)
    /// - `never`: force colors off
    /// - anything else: detect from the environment
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colors (https://no-color.org/)
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain alternative otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// One listing line: `type  id  name  (display name)`
///
/// The display name is only shown when it differs from the stored name.
pub fn format_summary(config: &OutputConfig, entity: &EntitySummary) -> String {
    let kind = style(format!("{:<9}", entity.kind.as_str()))
        .dim()
        .force_styling(config.use_color);
    let name = style(&entity.name).bold().force_styling(config.use_color);
    if entity.display_name == entity.name {
        format!("{} {:>5}  {}", kind, entity.id, name)
    } else {
        format!("{} {:>5}  {}  ({})", kind, entity.id, name, entity.display_name)
    }
}

/// Header plus one line per property
pub fn format_detail(config: &OutputConfig, entity: &EntityDetail) -> String {
    let mut output = format!(
        "{} #{} {}",
        entity.kind,
        entity.id,
        style(&entity.name).bold().force_styling(config.use_color)
    );
    if entity.display_name != entity.name {
        output.push_str(&format!(" ({})", entity.display_name));
    }
    output.push('\n');
    for property in &entity.properties {
        output.push_str("  ");
        output.push_str(&format_property(config, property));
        output.push('\n');
    }
    output
}

/// `key=value ;comment` followed by the catalog description, if any
pub fn format_property(config: &OutputConfig, property: &PropertyView) -> String {
    let mut line = format!(
        "{}={}",
        style(&property.key).cyan().force_styling(config.use_color),
        property.value
    );
    if !property.comment.is_empty() {
        line.push_str(&format!(" ;{}", property.comment));
    }
    if let Some(description) = &property.description {
        line.push_str(&format!(
            "  {}",
            style(format!("# {}", description))
                .dim()
                .force_styling(config.use_color)
        ));
    }
    line
}

/// `key (default) description`
pub fn format_available(config: &OutputConfig, property: &AvailableProperty) -> String {
    let mut line = style(&property.key)
        .cyan()
        .force_styling(config.use_color)
        .to_string();
    if !property.default_value.is_empty() {
        line.push_str(&format!(" (default: {})", property.default_value));
    }
    if !property.description.is_empty() {
        line.push_str(&format!("  {}", property.description));
    }
    line
}
