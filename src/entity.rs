//! Typed entity view over a [`Document`]
//!
//! Rules files register their units in directory sections, one per entity
//! type, each entry mapping a numeric id to a unit name:
//!
//! ```ini
//! [InfantryTypes]
//! 0=E1
//! 1=E2
//!
//! [E1]
//! Cost=100
//! ```
//!
//! The unit's own properties live in the section named after it. This module
//! interprets those sections without teaching the text model anything about
//! units: [`EntityIndex`] reads, [`EntityIndexMut`] adds and removes.

use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::document::{Document, Property};
use crate::error::{Error, Result};

/// Property holding the translation token for an entity's display name
pub const UI_NAME_KEY: &str = "UIName";

/// The fixed set of entity categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Infantry,
    Vehicle,
    Aircraft,
    Building,
}

impl EntityType {
    /// All types in declaration order; listings follow this order.
    pub const ALL: [EntityType; 4] = [
        EntityType::Infantry,
        EntityType::Vehicle,
        EntityType::Aircraft,
        EntityType::Building,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Infantry => "infantry",
            EntityType::Vehicle => "vehicle",
            EntityType::Aircraft => "aircraft",
            EntityType::Building => "building",
        }
    }

    /// Name of the directory section registering entities of this type
    pub fn directory_section(self) -> &'static str {
        match self {
            EntityType::Infantry => "InfantryTypes",
            EntityType::Vehicle => "VehicleTypes",
            EntityType::Aircraft => "AircraftTypes",
            EntityType::Building => "BuildingTypes",
        }
    }

    /// Whether `name` is the directory section of any type
    pub fn is_directory_section(name: &str) -> bool {
        EntityType::ALL
            .into_iter()
            .any(|kind| kind.directory_section() == name)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EntityType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownEntityType {
                name: s.to_string(),
            })
    }
}

/// A resolved entity: directory entry plus a snapshot of its section
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub id: u32,
    pub name: String,
    pub properties: Vec<Property>,
}

impl Entity {
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.key == key)
    }

    /// Translation token for the display name, if set
    pub fn ui_name(&self) -> Option<&str> {
        self.get(UI_NAME_KEY)
            .map(|property| property.value.as_str())
            .filter(|value| !value.is_empty())
    }
}

/// A directory entry: the stored key, its parsed id and the entity name
struct DirectoryEntry<'a> {
    key: &'a str,
    id: u32,
    name: &'a str,
}

/// Read-only entity lookups over a document
#[derive(Clone, Copy, Debug)]
pub struct EntityIndex<'a> {
    document: &'a Document,
}

impl<'a> EntityIndex<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Entities registered for `kind`, in directory order
    ///
    /// Entries whose id is not numeric or whose section does not exist are
    /// skipped.
    pub fn list_by_type(&self, kind: EntityType) -> Vec<Entity> {
        self.directory(kind)
            .filter_map(|entry| self.resolve(kind, &entry))
            .collect()
    }

    /// Every entity, grouped by type in [`EntityType::ALL`] order
    pub fn list_all(&self) -> Vec<Entity> {
        EntityType::ALL
            .into_iter()
            .flat_map(|kind| self.list_by_type(kind))
            .collect()
    }

    pub fn get(&self, kind: EntityType, id: u32) -> Option<Entity> {
        self.directory(kind)
            .find(|entry| entry.id == id)
            .and_then(|entry| self.resolve(kind, &entry))
    }

    /// Whether the directory registers `(kind, id)`, even if its section is missing
    pub fn contains(&self, kind: EntityType, id: u32) -> bool {
        self.directory(kind).any(|entry| entry.id == id)
    }

    /// The name registered for `(kind, id)`
    pub fn name_of(&self, kind: EntityType, id: u32) -> Option<&'a str> {
        self.directory(kind)
            .find(|entry| entry.id == id)
            .map(|entry| entry.name)
    }

    /// Every registered id of `kind`, including entries with no section
    pub fn ids(&self, kind: EntityType) -> Vec<u32> {
        self.directory(kind).map(|entry| entry.id).collect()
    }

    fn directory(&self, kind: EntityType) -> impl Iterator<Item = DirectoryEntry<'a>> + 'a {
        let document = self.document;
        document
            .section(kind.directory_section())
            .into_iter()
            .flat_map(|section| section.properties())
            .filter_map(move |property| match property.key.parse::<u32>() {
                Ok(id) => Some(DirectoryEntry {
                    key: property.key.as_str(),
                    id,
                    name: property.value.as_str(),
                }),
                Err(_) => {
                    warn!(
                        "Skipping {} entry with non-numeric id '{}'",
                        kind.directory_section(),
                        property.key
                    );
                    None
                }
            })
    }

    fn resolve(&self, kind: EntityType, entry: &DirectoryEntry<'_>) -> Option<Entity> {
        if entry.name.is_empty() {
            warn!("Skipping {} #{}: empty name", kind, entry.id);
            return None;
        }
        let Some(section) = self.document.section(entry.name) else {
            warn!(
                "Skipping {} #{}: section [{}] does not exist",
                kind, entry.id, entry.name
            );
            return None;
        };
        Some(Entity {
            kind,
            id: entry.id,
            name: entry.name.to_string(),
            properties: section.properties().to_vec(),
        })
    }
}

/// Entity mutations over a document
#[derive(Debug)]
pub struct EntityIndexMut<'a> {
    document: &'a mut Document,
}

impl<'a> EntityIndexMut<'a> {
    pub fn new(document: &'a mut Document) -> Self {
        Self { document }
    }

    /// Read-only view of the same document
    pub fn as_index(&self) -> EntityIndex<'_> {
        EntityIndex::new(self.document)
    }

    /// Register a new entity and create its property section
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateName`] if `name` already names a section or is a
    ///   directory section name
    /// - [`Error::DuplicateId`] if `(kind, id)` is already registered
    pub fn add(
        &mut self,
        kind: EntityType,
        id: u32,
        name: &str,
        properties: &[Property],
    ) -> Result<Entity> {
        if self.document.has_section(name) || EntityType::is_directory_section(name) {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }
        if self.as_index().contains(kind, id) {
            return Err(Error::DuplicateId { kind, id });
        }

        self.document
            .ensure_section(kind.directory_section())
            .set(id.to_string(), name, "");
        let section = self.document.ensure_section(name);
        for property in properties {
            section.set_property(property.clone());
        }

        Ok(Entity {
            kind,
            id,
            name: name.to_string(),
            properties: section.properties().to_vec(),
        })
    }

    /// Bind `(kind, id)` to `name` and make sure its section exists, without
    /// collision checks. Used to shadow an entity another layer defines.
    pub(crate) fn register(&mut self, kind: EntityType, id: u32, name: &str) {
        self.document
            .ensure_section(kind.directory_section())
            .set(id.to_string(), name, "");
        self.document.ensure_section(name);
    }

    /// Remove the directory entry and the property section of `(kind, id)`
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the directory does not register `(kind, id)`.
    pub fn delete(&mut self, kind: EntityType, id: u32) -> Result<()> {
        let (key, name) = {
            let index = self.as_index();
            let entry = index
                .directory(kind)
                .find(|entry| entry.id == id)
                .ok_or(Error::NotFound { kind, id })?;
            (entry.key.to_string(), entry.name.to_string())
        };

        if let Some(directory) = self.document.section_mut(kind.directory_section()) {
            directory.delete(&key);
        }
        self.document.delete_section(&name);
        Ok(())
    }
}
