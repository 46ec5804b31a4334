//! # Error Suggestions
//!
//! Helpers that turn failures into messages telling users what went wrong
//! AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::suggestions;
//!
//! let kind: EntityType = args
//!     .kind
//!     .parse()
//!     .map_err(|_| suggestions::unknown_entity_type(&args.kind))?;
//! ```

use std::fmt::Display;
use std::path::Path;

use crate::entity::EntityType;
use crate::error::Error;
use crate::schema::Schema;

/// Generate an error for when the configuration file is not found.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a .rules-overlay.yaml file with 'base:' and 'translation:' entries\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set RULES_OVERLAY_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for an entity type name that does not exist.
///
/// Suggests the closest valid type.
pub fn unknown_entity_type(name: &str) -> anyhow::Error {
    let valid: Vec<&str> = EntityType::ALL.iter().map(|kind| kind.as_str()).collect();
    let did_you_mean = find_similar(&name.to_lowercase(), &valid)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown entity type: {name}{did_you_mean}\n\n\
         Valid types are: {types}",
        types = valid.join(", ")
    )
}

/// Generate an error for a property group missing from the schema.
pub fn unknown_group(name: &str) -> anyhow::Error {
    let did_you_mean = find_similar(name, &Schema::GROUPS)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown property group: {name}{did_you_mean}\n\n\
         Valid groups are: {groups}",
        groups = Schema::GROUPS.join(", ")
    )
}

/// Generate an error for a `set` argument that is not `KEY=VALUE`.
pub fn invalid_assignment(argument: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid property assignment: {argument}\n\n\
         hint: Use KEY=VALUE, e.g. Cost=700\n\
         hint: Use KEY= to set an empty value, or --unset KEY to drop the key"
    )
}

/// Generate an error for an edit that could not be written to disk.
///
/// The edit itself succeeded; only the overlay file is stale.
pub fn overlay_not_saved(path: &Path, error: impl Display) -> anyhow::Error {
    anyhow::anyhow!(
        "Failed to write overlay {path}: {error}\n\n\
         hint: The change was not persisted; the overlay file still holds its previous content\n\
         hint: Check that the directory exists and is writable, or pass --overlay <FILE>",
        path = path.display()
    )
}

/// Add a hint for library errors users commonly hit from the command line.
pub fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::OriginImmutable { kind, id } => anyhow::anyhow!(
            "{error}\n\n\
             hint: Only entities added or changed in the overlay can be deleted\n\
             hint: Use 'rules-overlay set {kind} {id} --unset KEY' to suppress base properties"
        ),
        Error::NameMismatch { ref expected, .. } => anyhow::anyhow!(
            "{error}\n\n\
             hint: Entities cannot be renamed; pass --name {expected} or omit --name"
        ),
        Error::DuplicateName { ref name } => anyhow::anyhow!(
            "{error}\n\n\
             hint: [{name}] is already a section or an entity directory; pick another name for the new entity"
        ),
        Error::IdsExhausted { kind } => anyhow::anyhow!(
            "{error}\n\n\
             hint: Pick an unused lower id and pass it to 'rules-overlay set {kind} <ID> --name <NAME>'"
        ),
        Error::UnknownEntityType { ref name } => unknown_entity_type(name),
        Error::UnknownGroup { ref name } => unknown_group(name),
        other => other.into(),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // Single rolling row
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b_chars.len()]
}
