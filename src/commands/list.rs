//! # List Command Implementation
//!
//! Lists the entities of the effective rules (base merged with overlay), one
//! per line, or as JSON with `--json`.
//!
//! This command is read-only.

use anyhow::Result;
use clap::Args;

use rules_overlay::editor::{Editor, EntitySummary};
use rules_overlay::entity::EntityType;
use rules_overlay::output::{format_summary, OutputConfig};

use super::{parse_kind, Session};
use crate::cli::GlobalArgs;

/// List entities in the effective rules
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list entities of this type (infantry, vehicle, aircraft, building)
    #[arg(short = 't', long = "type", value_name = "TYPE", value_parser = parse_kind)]
    pub kind: Option<EntityType>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, global: &GlobalArgs, color_flag: &str) -> Result<()> {
    let session = Session::open(global)?;
    let out = OutputConfig::from_env_and_flag(color_flag);
    print!("{}", render(&args, &session.editor, &out)?);
    Ok(())
}

fn render(args: &ListArgs, editor: &Editor, out: &OutputConfig) -> Result<String> {
    let entities: Vec<EntitySummary> = match args.kind {
        Some(kind) => editor.list_entities_by_type(kind),
        None => editor.list_all_entities(),
    };

    if args.json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&entities)?));
    }
    if entities.is_empty() {
        return Ok("No entities found.\n".to_string());
    }

    let mut output = String::new();
    for entity in &entities {
        output.push_str(&format_summary(out, entity));
        output.push('\n');
    }
    output.push_str(&format!("\n{} entit{}\n", entities.len(), if entities.len() == 1 { "y" } else { "ies" }));
    Ok(output)
}
