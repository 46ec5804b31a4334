//! # Export Command Implementation
//!
//! Prints the overlay text, or writes it to `--output`. Only the user layer is
//! exported; the base rules are never copied into it.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::Session;
use crate::cli::GlobalArgs;

/// Print or write the overlay text
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the `export` command.
pub fn execute(args: ExportArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let text = session.editor.export_overlay();
    match &args.output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", text),
    }
    Ok(())
}
