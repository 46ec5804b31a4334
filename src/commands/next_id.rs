//! # Next-Id Command Implementation
//!
//! Prints the id a new entity of the given type should use: one above the
//! highest id registered in the base or the overlay.

use anyhow::Result;
use clap::Args;

use rules_overlay::entity::EntityType;
use rules_overlay::suggestions;

use super::{parse_kind, Session};
use crate::cli::GlobalArgs;

/// Print the next free id for an entity type
#[derive(Args, Debug)]
pub struct NextIdArgs {
    /// Entity type (infantry, vehicle, aircraft, building)
    #[arg(value_name = "TYPE", value_parser = parse_kind)]
    pub kind: EntityType,
}

/// Execute the `next-id` command.
pub fn execute(args: NextIdArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let id = session
        .editor
        .next_entity_id(args.kind)
        .map_err(suggestions::explain)?;
    println!("{}", id);
    Ok(())
}
