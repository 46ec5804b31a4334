//! # Import Command Implementation
//!
//! Replaces the whole overlay with the contents of a file and persists it.
//! The file must parse; on error the current overlay is left untouched.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rules_overlay::output::{emoji, OutputConfig};

use super::Session;
use crate::cli::GlobalArgs;

/// Replace the overlay with the contents of a file
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Overlay file to import
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute the `import` command.
pub fn execute(args: ImportArgs, global: &GlobalArgs, color_flag: &str) -> Result<()> {
    let mut session = Session::open(global)?;
    let out = OutputConfig::from_env_and_flag(color_flag);
    let count = run(&args, &mut session)?;
    println!(
        "{} Imported {} overlay entit{} into {}",
        emoji(&out, "📥", "[OK]"),
        count,
        if count == 1 { "y" } else { "ies" },
        session.overlay_path.display()
    );
    Ok(())
}

/// Load and persist; returns how many entities the new overlay registers
fn run(args: &ImportArgs, session: &mut Session) -> Result<usize> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    session
        .editor
        .load_overlay(&content)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;
    session.persist()?;
    Ok(session.editor.user().units().len())
}
