//! # Delete Command Implementation
//!
//! Removes an entity from the overlay and writes the overlay back. Entities
//! that also exist in the base rules revert to their base definition; base
//! rules themselves cannot be deleted.

use anyhow::Result;
use clap::Args;

use rules_overlay::entity::EntityType;
use rules_overlay::output::{emoji, OutputConfig};
use rules_overlay::suggestions;

use super::{parse_kind, Session};
use crate::cli::GlobalArgs;

/// Delete an entity from the overlay
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Entity type (infantry, vehicle, aircraft, building)
    #[arg(value_name = "TYPE", value_parser = parse_kind)]
    pub kind: EntityType,

    /// Entity id
    pub id: u32,
}

/// Execute the `delete` command.
pub fn execute(args: DeleteArgs, global: &GlobalArgs, color_flag: &str) -> Result<()> {
    let mut session = Session::open(global)?;
    let out = OutputConfig::from_env_and_flag(color_flag);
    run(&args, &mut session)?;
    println!(
        "{} Deleted {} #{} from {}",
        emoji(&out, "🗑️", "[OK]"),
        args.kind,
        args.id,
        session.overlay_path.display()
    );
    Ok(())
}

fn run(args: &DeleteArgs, session: &mut Session) -> Result<()> {
    session
        .editor
        .delete_entity(args.kind, args.id)
        .map_err(suggestions::explain)?;
    session.persist()
}
