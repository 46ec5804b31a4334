//! # Save Command Implementation
//!
//! Reads a desired entity state as JSON and reconciles the overlay so the
//! effective rules show exactly that state, then writes the overlay back.
//!
//! ```json
//! {
//!   "type": "infantry",
//!   "id": 0,
//!   "name": "E1",
//!   "properties": [
//!     { "key": "Cost", "value": "100" },
//!     { "key": "Speed", "value": "6", "comment": "faster" }
//!   ]
//! }
//! ```
//!
//! Properties missing from the list are suppressed in the effective rules.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use rules_overlay::editor::DesiredEntity;
use rules_overlay::output::{emoji, OutputConfig};
use rules_overlay::reconcile::OverlayPatch;
use rules_overlay::suggestions;

use super::Session;
use crate::cli::GlobalArgs;

/// Save a desired entity state from JSON into the overlay
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// JSON file with the desired entity state, or '-' for stdin
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute the `save` command.
pub fn execute(args: SaveArgs, global: &GlobalArgs, color_flag: &str) -> Result<()> {
    let desired = read_desired(&args.file)?;
    let mut session = Session::open(global)?;
    let out = OutputConfig::from_env_and_flag(color_flag);

    let patch = apply(&mut session, &desired)?;
    println!("{}", describe(&out, &desired, &patch));
    Ok(())
}

/// Reconcile and persist; nothing is written when the overlay already matched
pub(crate) fn apply(session: &mut Session, desired: &DesiredEntity) -> Result<OverlayPatch> {
    let patch = session
        .editor
        .save_entity(desired)
        .map_err(suggestions::explain)?;
    if !patch.is_empty() {
        session.persist()?;
    }
    Ok(patch)
}

pub(crate) fn describe(out: &OutputConfig, desired: &DesiredEntity, patch: &OverlayPatch) -> String {
    if patch.is_empty() {
        format!(
            "{} {} #{} {} already up to date",
            emoji(out, "✅", "[OK]"),
            desired.kind,
            desired.id,
            desired.name
        )
    } else {
        format!(
            "{} Saved {} #{} {} ({} change(s))",
            emoji(out, "💾", "[OK]"),
            desired.kind,
            desired.id,
            desired.name,
            patch.ops.len()
        )
    }
}

fn read_desired(path: &Path) -> Result<DesiredEntity> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid desired entity JSON in {}", path.display()))
}
