//! # Show Command Implementation
//!
//! Prints the effective properties of one entity, with catalog descriptions
//! where the schema knows the key. A property suppressed by the overlay is
//! shown with an empty value.

use anyhow::Result;
use clap::Args;

use rules_overlay::editor::Editor;
use rules_overlay::entity::EntityType;
use rules_overlay::output::{format_detail, OutputConfig};
use rules_overlay::suggestions;

use super::{parse_kind, Session};
use crate::cli::GlobalArgs;

/// Show the effective properties of one entity
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Entity type (infantry, vehicle, aircraft, building)
    #[arg(value_name = "TYPE", value_parser = parse_kind)]
    pub kind: EntityType,

    /// Entity id
    pub id: u32,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Execute the `show` command.
pub fn execute(args: ShowArgs, global: &GlobalArgs, color_flag: &str) -> Result<()> {
    let session = Session::open(global)?;
    let out = OutputConfig::from_env_and_flag(color_flag);
    print!("{}", render(&args, &session.editor, &out)?);
    Ok(())
}

fn render(args: &ShowArgs, editor: &Editor, out: &OutputConfig) -> Result<String> {
    let detail = editor
        .get_entity(args.kind, args.id)
        .map_err(suggestions::explain)?;
    if args.json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&detail)?))
    } else {
        Ok(format_detail(out, &detail))
    }
}
