//! # Set Command Implementation
//!
//! Edits an entity from the command line. The desired state starts from the
//! entity's current effective properties; `KEY=VALUE` arguments replace or
//! append keys and `--unset KEY` drops them (suppressing base values). The
//! result goes through the same reconciliation as `save`.
//!
//! ```bash
//! rules-overlay set infantry 0 Speed=6 Armor=Light --unset Pip
//! rules-overlay set vehicle 42 --name NEWV Cost=700
//! ```

use anyhow::Result;
use clap::Args;

use rules_overlay::document::Property;
use rules_overlay::editor::{DesiredEntity, Editor};
use rules_overlay::entity::EntityType;
use rules_overlay::error::Error;
use rules_overlay::output::OutputConfig;
use rules_overlay::suggestions;

use super::{parse_kind, save, Session};
use crate::cli::GlobalArgs;

/// Change properties of an entity, or create one
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Entity type (infantry, vehicle, aircraft, building)
    #[arg(value_name = "TYPE", value_parser = parse_kind)]
    pub kind: EntityType,

    /// Entity id
    pub id: u32,

    /// Entity name; required when creating a new entity
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Properties to set
    #[arg(value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,

    /// Properties to remove
    #[arg(long = "unset", value_name = "KEY")]
    pub unset: Vec<String>,
}

/// Execute the `set` command.
pub fn execute(args: SetArgs, global: &GlobalArgs, color_flag: &str) -> Result<()> {
    let mut session = Session::open(global)?;
    let out = OutputConfig::from_env_and_flag(color_flag);

    let desired = build_desired(&args, &session.editor)?;
    let patch = save::apply(&mut session, &desired)?;
    println!("{}", save::describe(&out, &desired, &patch));
    Ok(())
}

/// Current effective state with the command-line edits applied
fn build_desired(args: &SetArgs, editor: &Editor) -> Result<DesiredEntity> {
    let assignments = args
        .assignments
        .iter()
        .map(|argument| parse_assignment(argument))
        .collect::<Result<Vec<_>>>()?;

    let (name, mut properties) = match editor.get_entity(args.kind, args.id) {
        Ok(current) => (
            args.name.clone().unwrap_or_else(|| current.name.clone()),
            current.to_properties(),
        ),
        Err(Error::NotFound { .. }) => {
            let name = args.name.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "{} #{} does not exist yet\n\n\
                     hint: Pass --name <NAME> to create it\n\
                     hint: Run 'rules-overlay next-id {}' for a free id",
                    args.kind,
                    args.id,
                    args.kind
                )
            })?;
            (name, Vec::new())
        }
        Err(other) => return Err(suggestions::explain(other)),
    };

    for assignment in assignments {
        match properties.iter_mut().find(|p| p.key == assignment.key) {
            Some(existing) => existing.value = assignment.value,
            None => properties.push(assignment),
        }
    }
    properties.retain(|p| !args.unset.contains(&p.key));

    Ok(DesiredEntity {
        kind: args.kind,
        id: args.id,
        name,
        properties,
    })
}

fn parse_assignment(argument: &str) -> Result<Property> {
    match argument.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok(Property::new(key.trim(), value.trim())),
        _ => Err(suggestions::invalid_assignment(argument)),
    }
}
