//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `rules-overlay` command-line tool, one file per subcommand.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `rules_overlay` library.
//!
//! Commands that read or edit the rules open a [`Session`], which loads the
//! editor from the configuration and knows where to persist the overlay.

pub mod completions;
pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod next_id;
pub mod props;
pub mod save;
pub mod set;
pub mod show;

use std::path::{Path, PathBuf};

use anyhow::Result;

use rules_overlay::config::EditorConfig;
use rules_overlay::editor::Editor;
use rules_overlay::entity::EntityType;
use rules_overlay::suggestions;

use crate::cli::GlobalArgs;

/// An opened editor plus the overlay file it was loaded from
pub struct Session {
    pub editor: Editor,
    pub overlay_path: PathBuf,
}

impl Session {
    /// Open the editor using the current directory for config discovery
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::open_in(global, &cwd)
    }

    /// Open the editor, looking for the default config file in `dir`
    pub fn open_in(global: &GlobalArgs, dir: &Path) -> Result<Self> {
        if let Some(path) = &global.config {
            if !path.exists() {
                return Err(suggestions::config_not_found(path));
            }
        }

        let mut config = EditorConfig::discover(global.config.as_deref(), dir)?;
        config.apply_overrides(global.overrides());
        let editor = Editor::open(&config).map_err(suggestions::explain)?;

        Ok(Self {
            editor,
            overlay_path: config.overlay_path(),
        })
    }

    /// Write the overlay back to its file
    pub fn persist(&self) -> Result<()> {
        self.editor
            .save_overlay_file(&self.overlay_path)
            .map_err(|e| suggestions::overlay_not_saved(&self.overlay_path, e))
    }
}

/// clap value parser for entity type arguments
pub fn parse_kind(name: &str) -> std::result::Result<EntityType, String> {
    name.parse()
        .map_err(|_| suggestions::unknown_entity_type(name).to_string())
}
