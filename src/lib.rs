//! # Rules Overlay Library
//!
//! A layered model for INI-style game rules. The base rules shipped with the
//! game are never modified; every edit lands in a separate user overlay, and
//! the rules the game sees are the overlay merged over the base.
//!
//! ## Quick Example
//!
//! ```
//! use rules_overlay::document::Document;
//! use rules_overlay::merge::merge;
//! use rules_overlay::reconcile::reconcile;
//! use rules_overlay::document::{Property, Section};
//!
//! let base = Document::parse("[E1]\nCost=100\nSpeed=5\n").unwrap();
//! let origin = base.section("E1").unwrap().properties();
//!
//! // The caller wants Speed changed and Armor added
//! let desired = vec![
//!     Property::new("Cost", "100"),
//!     Property::new("Speed", "6"),
//!     Property::new("Armor", "Light"),
//! ];
//! let patch = reconcile(Some(origin), None, &desired);
//!
//! let mut overlay = Document::new();
//! patch.apply(overlay.ensure_section("E1"));
//! assert_eq!(overlay.serialize(), "[E1]\nSpeed=6\nArmor=Light\n");
//!
//! let effective = merge(&base, &[&overlay]);
//! assert_eq!(effective.serialize(), "[E1]\nCost=100\nSpeed=6\nArmor=Light\n");
//! ```
//!
//! ## Core Concepts
//!
//! - **Document (`document`)**: the ordered section/key/value text model,
//!   with parsing and serialization.
//! - **Entities (`entity`)**: units registered in directory sections
//!   (`[InfantryTypes]`, `[VehicleTypes]`, ...) viewed as typed records.
//! - **Merge (`merge`)**: composes layers; later layers add or override.
//! - **Reconcile (`reconcile`)**: computes the minimal overlay edits that make
//!   the effective view match a desired entity state. Base keys the caller
//!   dropped are suppressed with an empty value (a tombstone).
//! - **Editor (`editor`)**: the boundary operations over a shared, read-only
//!   base layer and an owned overlay.
//! - **Assets (`schema`, `translation`)**: the property catalog and the
//!   display-name table, both read-only.

pub mod config;
pub mod defaults;
pub mod document;
pub mod editor;
pub mod entity;
pub mod error;
pub mod merge;
pub mod output;
pub mod reconcile;
pub mod rules;
pub mod schema;
pub mod suggestions;
pub mod translation;

#[cfg(test)]
mod document_proptest;
