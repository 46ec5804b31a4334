//! Three-way reconciliation of one entity's overlay
//!
//! Given the entity's properties in the base layer, its current properties in
//! the user overlay, and the full property list the caller wants to see, this
//! module computes the overlay edits that make `merge(base, overlay)` show
//! exactly the desired list while keeping the overlay minimal.
//!
//! The overlay can only add or override base keys. A base key the caller
//! dropped is therefore suppressed with an empty value (a tombstone) instead
//! of being removed. A suppressed key reads as an empty string in the
//! effective view, the same as a key explicitly set to empty.
//!
//! [`reconcile`] is pure: it reads three property slices and returns an
//! [`OverlayPatch`]. Applying the patch is a separate step.

use std::collections::HashSet;

use crate::document::{Property, Section};

/// One overlay edit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchOp {
    /// Set value and comment, appending the key if absent
    Set(Property),
    /// Remove the key from the overlay
    Delete(String),
}

/// Edits to bring one overlay entity in line with a desired state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayPatch {
    /// The overlay has no entry for the entity yet and must register one
    pub create_entity: bool,
    pub ops: Vec<PatchOp>,
}

impl OverlayPatch {
    /// Whether applying the patch would change nothing
    pub fn is_empty(&self) -> bool {
        !self.create_entity && self.ops.is_empty()
    }

    /// Apply the edits, in order, to the entity's overlay section
    pub fn apply(&self, section: &mut Section) {
        for op in &self.ops {
            match op {
                PatchOp::Set(property) => section.set_property(property.clone()),
                PatchOp::Delete(key) => {
                    section.delete(key);
                }
            }
        }
    }

    /// Keys this patch sets, in order
    pub fn set_keys(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            PatchOp::Set(property) => Some(property.key.as_str()),
            PatchOp::Delete(_) => None,
        })
    }

    /// Keys this patch deletes, in order
    pub fn deleted_keys(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            PatchOp::Delete(key) => Some(key.as_str()),
            PatchOp::Set(_) => None,
        })
    }
}

/// Compute the overlay edits for one entity
///
/// - `origin`: the entity's base properties, `None` for a user-created entity
/// - `user`: its current overlay properties, `None` if the overlay has no entry
/// - `desired`: the complete property list to show; keys must be unique
///
/// Rules, in order:
/// 1. A desired property that differs from the base (or is new) is set,
///    unless the overlay already holds exactly that property.
/// 2. A desired property equal to the base drops any stale overlay override.
/// 3. An overlay key the caller dropped is deleted when the base does not
///    define it.
/// 4. A base key the caller dropped is tombstoned (set to empty). A key
///    present in `desired` is never tombstoned.
pub fn reconcile(
    origin: Option<&[Property]>,
    user: Option<&[Property]>,
    desired: &[Property],
) -> OverlayPatch {
    let origin_props = origin.unwrap_or_default();
    let user_props = user.unwrap_or_default();
    let desired_keys: HashSet<&str> = desired.iter().map(|p| p.key.as_str()).collect();
    let mut ops = Vec::new();

    // Additions and overrides relative to the base
    for wanted in desired {
        let current = find(user_props, &wanted.key);
        if find(origin_props, &wanted.key) == Some(wanted) {
            if current.is_some() {
                ops.push(PatchOp::Delete(wanted.key.clone()));
            }
        } else if current != Some(wanted) {
            ops.push(PatchOp::Set(wanted.clone()));
        }
    }

    // Keys the user introduced and no longer wants
    for current in user_props {
        let dropped = !desired_keys.contains(current.key.as_str());
        if dropped && find(origin_props, &current.key).is_none() {
            ops.push(PatchOp::Delete(current.key.clone()));
        }
    }

    // Base keys the user wants suppressed
    for base in origin_props {
        if desired_keys.contains(base.key.as_str()) {
            continue;
        }
        let tombstone = Property::new(base.key.clone(), "");
        if find(user_props, &base.key) != Some(&tombstone) {
            ops.push(PatchOp::Set(tombstone));
        }
    }

    OverlayPatch {
        create_entity: user.is_none(),
        ops,
    }
}

fn find<'a>(properties: &'a [Property], key: &str) -> Option<&'a Property> {
    properties.iter().find(|property| property.key == key)
}
