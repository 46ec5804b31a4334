//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use rules_overlay::config::ConfigOverrides;
use rules_overlay::defaults::CONFIG_ENV_VAR;

use crate::commands;

/// Rules Overlay - Edit game rules through a layered user overlay
#[derive(Parser, Debug)]
#[command(name = "rules-overlay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

/// Where to find the layers; shared by every command that opens the editor
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to the .rules-overlay.yaml configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Base rules file (overrides 'base:')
    #[arg(long, global = true, value_name = "FILE")]
    pub base: Option<PathBuf>,

    /// Localization table (overrides 'translation:')
    #[arg(long, global = true, value_name = "FILE")]
    pub translation: Option<PathBuf>,

    /// Property catalog JSON (overrides 'schema:')
    #[arg(long, global = true, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// User overlay file (overrides 'overlay:')
    #[arg(long, global = true, value_name = "FILE")]
    pub overlay: Option<PathBuf>,

    /// Language section used for display names (overrides 'language:')
    #[arg(long, global = true, value_name = "LANG")]
    pub language: Option<String>,
}

impl GlobalArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base: self.base.clone(),
            translation: self.translation.clone(),
            schema: self.schema.clone(),
            overlay: self.overlay.clone(),
            language: self.language.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List entities in the effective rules
    List(commands::list::ListArgs),

    /// Show the effective properties of one entity
    Show(commands::show::ShowArgs),

    /// List catalog properties for an entity type or property group
    Props(commands::props::PropsArgs),

    /// Print the next free id for an entity type
    NextId(commands::next_id::NextIdArgs),

    /// Save a desired entity state from JSON into the overlay
    Save(commands::save::SaveArgs),

    /// Change properties of an entity, or create one
    Set(commands::set::SetArgs),

    /// Delete an entity from the overlay
    Delete(commands::delete::DeleteArgs),

    /// Print or write the overlay text
    Export(commands::export::ExportArgs),

    /// Replace the overlay with the contents of a file
    Import(commands::import::ImportArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .format_timestamp(None)
        .try_init();

        let global = &self.global;
        let color = self.color.as_str();
        match self.command {
            Commands::List(args) => commands::list::execute(args, global, color),
            Commands::Show(args) => commands::show::execute(args, global, color),
            Commands::Props(args) => commands::props::execute(args, global, color),
            Commands::NextId(args) => commands::next_id::execute(args, global),
            Commands::Save(args) => commands::save::execute(args, global, color),
            Commands::Set(args) => commands::set::execute(args, global, color),
            Commands::Delete(args) => commands::delete::execute(args, global, color),
            Commands::Export(args) => commands::export::execute(args, global),
            Commands::Import(args) => commands::import::execute(args, global, color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
