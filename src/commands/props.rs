//! # Props Command Implementation
//!
//! Lists the properties the schema catalog offers for an entity type or for
//! one of the catalog's global groups (`country`, `crate_rules`, ...).

use anyhow::Result;
use clap::Args;

use rules_overlay::editor::Editor;
use rules_overlay::output::{format_available, OutputConfig};
use rules_overlay::suggestions;

use super::Session;
use crate::cli::GlobalArgs;

/// List catalog properties for an entity type or property group
#[derive(Args, Debug)]
pub struct PropsArgs {
    /// Entity type or schema group name
    #[arg(value_name = "GROUP")]
    pub group: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Execute the `props` command.
pub fn execute(args: PropsArgs, global: &GlobalArgs, color_flag: &str) -> Result<()> {
    let session = Session::open(global)?;
    let out = OutputConfig::from_env_and_flag(color_flag);
    print!("{}", render(&args, &session.editor, &out)?);
    Ok(())
}

fn render(args: &PropsArgs, editor: &Editor, out: &OutputConfig) -> Result<String> {
    let properties = editor
        .list_group_properties(&args.group)
        .map_err(suggestions::explain)?;
    if args.json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&properties)?));
    }
    if properties.is_empty() {
        return Ok(format!("No catalogued properties for {}.\n", args.group));
    }
    Ok(properties
        .iter()
        .map(|property| format!("{}\n", format_available(out, property)))
        .collect())
}
