//! Rules layers
//!
//! A [`Rules`] value wraps one [`Document`] and exposes the entity view on
//! top of it. Two layers exist side by side while editing: the base rules
//! shipped with the game, and the user overlay. The effective rules are a
//! third, temporary `Rules` produced by [`Rules::merge`].

use std::fs;
use std::path::Path;

use crate::document::{Document, Property, Section};
use crate::entity::{Entity, EntityIndex, EntityIndexMut, EntityType};
use crate::error::Result;
use crate::merge;

/// One rules layer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rules {
    document: Document,
}

impl Rules {
    /// An empty layer, the starting point of a user overlay
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a layer from rules text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self::from_document(Document::parse(content)?))
    }

    /// Read and parse a rules file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Serialized rules text
    pub fn content(&self) -> String {
        self.document.serialize()
    }

    /// Compose this layer with `others` on top, later layers winning
    pub fn merge(&self, others: &[&Rules]) -> Rules {
        let overlays: Vec<&Document> = others.iter().map(|rules| &rules.document).collect();
        Rules::from_document(merge::merge(&self.document, &overlays))
    }

    pub fn entities(&self) -> EntityIndex<'_> {
        EntityIndex::new(&self.document)
    }

    pub fn units(&self) -> Vec<Entity> {
        self.entities().list_all()
    }

    pub fn units_by_type(&self, kind: EntityType) -> Vec<Entity> {
        self.entities().list_by_type(kind)
    }

    pub fn get_unit(&self, kind: EntityType, id: u32) -> Option<Entity> {
        self.entities().get(kind, id)
    }

    /// See [`EntityIndexMut::add`]
    pub fn add_unit(
        &mut self,
        kind: EntityType,
        id: u32,
        name: &str,
        properties: &[Property],
    ) -> Result<Entity> {
        EntityIndexMut::new(&mut self.document).add(kind, id, name, properties)
    }

    /// See [`EntityIndexMut::delete`]
    pub fn delete_unit(&mut self, kind: EntityType, id: u32) -> Result<()> {
        EntityIndexMut::new(&mut self.document).delete(kind, id)
    }

    /// See [`EntityIndexMut::register`]
    pub(crate) fn register_unit(&mut self, kind: EntityType, id: u32, name: &str) {
        EntityIndexMut::new(&mut self.document).register(kind, id, name);
    }

    /// Whether any section, entity or not, is named `name`
    pub fn has_section(&self, name: &str) -> bool {
        self.document.has_section(name)
    }

    pub(crate) fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.document.section_mut(name)
    }
}
