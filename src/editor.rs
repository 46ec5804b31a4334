//! # Overlay Editor
//!
//! The editor owns the two layers and answers every boundary operation:
//!
//! - the **origin** layer, loaded once and shared read-only behind an `Arc`
//! - the **user** overlay, the only thing that ever changes
//!
//! Reads go through the effective view (`origin` merged with `user`). Writes
//! never touch `origin`: [`Editor::save_entity`] turns a desired entity state
//! into overlay edits with [`reconcile`], and [`Editor::delete_entity`] only
//! removes overlay entities.
//!
//! Every fallible check runs before the overlay is touched, so a failed
//! operation leaves the overlay as it was.
//!
//! ```
//! use std::sync::Arc;
//! use rules_overlay::document::Property;
//! use rules_overlay::editor::{DesiredEntity, Editor};
//! use rules_overlay::entity::EntityType;
//! use rules_overlay::rules::Rules;
//! use rules_overlay::schema::Schema;
//! use rules_overlay::translation::Translation;
//!
//! let origin = Rules::parse("[InfantryTypes]\n0=E1\n\n[E1]\nCost=100\nSpeed=5\n").unwrap();
//! let mut editor = Editor::new(
//!     Arc::new(origin),
//!     Arc::new(Schema::default()),
//!     Arc::new(Translation::empty("en")),
//! );
//!
//! editor
//!     .save_entity(&DesiredEntity {
//!         kind: EntityType::Infantry,
//!         id: 0,
//!         name: "E1".to_string(),
//!         properties: vec![Property::new("Cost", "100"), Property::new("Speed", "6")],
//!     })
//!     .unwrap();
//!
//! assert_eq!(editor.export_overlay(), "[InfantryTypes]\n0=E1\n\n[E1]\nSpeed=6\n");
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::document::Property;
use crate::entity::{Entity, EntityType};
use crate::error::{Error, Result};
use crate::reconcile::{reconcile, OverlayPatch};
use crate::rules::Rules;
use crate::schema::{Schema, SchemaProperty};
use crate::translation::Translation;

/// One row of an entity listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub id: u32,
    pub name: String,
    pub display_name: String,
}

/// A property as shown to the caller, with its catalog description
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropertyView {
    pub key: String,
    pub value: String,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Full effective state of one entity
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntityDetail {
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub id: u32,
    pub name: String,
    pub display_name: String,
    pub properties: Vec<PropertyView>,
}

impl EntityDetail {
    /// Plain properties, ready to be edited and submitted back
    pub fn to_properties(&self) -> Vec<Property> {
        self.properties
            .iter()
            .map(|view| Property::new(view.key.as_str(), view.value.as_str()).with_comment(view.comment.as_str()))
            .collect()
    }
}

/// A catalog entry offered for editing
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AvailableProperty {
    pub key: String,
    pub default_value: String,
    pub description: String,
}

/// The complete property list the caller wants an entity to have
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredEntity {
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// The layered rules editor
#[derive(Debug, Clone)]
pub struct Editor {
    origin: Arc<Rules>,
    user: Rules,
    schema: Arc<Schema>,
    translation: Arc<Translation>,
    description_language: String,
}

impl Editor {
    /// An editor with an empty overlay
    pub fn new(origin: Arc<Rules>, schema: Arc<Schema>, translation: Arc<Translation>) -> Self {
        Self {
            origin,
            user: Rules::empty(),
            schema,
            translation,
            description_language: crate::defaults::DEFAULT_DESCRIPTION_LANGUAGE.to_string(),
        }
    }

    pub fn with_description_language(mut self, language: impl Into<String>) -> Self {
        self.description_language = language.into();
        self
    }

    /// Load every input named by `config`
    ///
    /// The overlay file is optional: when it does not exist yet the editor
    /// starts with an empty overlay.
    pub fn open(config: &EditorConfig) -> Result<Self> {
        config.validate()?;

        let base_path = config.base_path()?;
        let origin = Rules::from_file(base_path)?;
        debug!("Loaded base rules from {}", base_path.display());

        let translation = Translation::from_file(config.translation_path()?, &config.language)?;
        let schema = match &config.schema {
            Some(path) => Schema::from_file(path)?,
            None => Schema::default(),
        };

        let mut editor = Self::new(Arc::new(origin), Arc::new(schema), Arc::new(translation))
            .with_description_language(config.description_language.as_str());

        let overlay_path = config.overlay_path();
        if overlay_path.is_file() {
            editor.load_overlay_file(&overlay_path)?;
        } else {
            debug!("No overlay at {}, starting empty", overlay_path.display());
        }
        Ok(editor)
    }

    pub fn origin(&self) -> &Rules {
        &self.origin
    }

    pub fn user(&self) -> &Rules {
        &self.user
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// `origin` merged with `user`
    pub fn effective(&self) -> Rules {
        self.origin.merge(&[&self.user])
    }

    /// Every entity in the effective view
    pub fn list_all_entities(&self) -> Vec<EntitySummary> {
        self.effective()
            .units()
            .iter()
            .map(|entity| self.summarize(entity))
            .collect()
    }

    pub fn list_entities_by_type(&self, kind: EntityType) -> Vec<EntitySummary> {
        self.effective()
            .units_by_type(kind)
            .iter()
            .map(|entity| self.summarize(entity))
            .collect()
    }

    /// Effective state of `(kind, id)`
    ///
    /// A property suppressed by the overlay shows up with an empty value.
    pub fn get_entity(&self, kind: EntityType, id: u32) -> Result<EntityDetail> {
        let entity = self
            .effective()
            .get_unit(kind, id)
            .ok_or(Error::NotFound { kind, id })?;

        let properties = entity
            .properties
            .iter()
            .map(|property| PropertyView {
                key: property.key.clone(),
                value: property.value.clone(),
                comment: property.comment.clone(),
                description: self
                    .schema
                    .find_unit_property(kind, &property.key)
                    .and_then(|entry| entry.description(&self.description_language))
                    .map(str::to_string),
            })
            .collect();

        Ok(EntityDetail {
            kind,
            id,
            display_name: self.display_name(&entity),
            name: entity.name,
            properties,
        })
    }

    /// Catalog properties for an entity type
    pub fn list_available_properties(&self, kind: EntityType) -> Vec<AvailableProperty> {
        self.schema
            .list_available_unit_properties(kind)
            .into_iter()
            .map(|entry| self.available(entry))
            .collect()
    }

    /// Catalog properties for any schema group, entity types included
    pub fn list_group_properties(&self, group: &str) -> Result<Vec<AvailableProperty>> {
        let entries = self
            .schema
            .list_available_properties(group)
            .ok_or_else(|| Error::UnknownGroup {
                name: group.to_string(),
            })?;
        Ok(entries.into_iter().map(|entry| self.available(entry)).collect())
    }

    /// Smallest id above every registered id of `kind`, never below 1
    ///
    /// # Errors
    ///
    /// [`Error::IdsExhausted`] if `u32::MAX` is already registered.
    pub fn next_entity_id(&self, kind: EntityType) -> Result<u32> {
        let effective = self.effective();
        let max = effective.entities().ids(kind).into_iter().max().unwrap_or(0);
        max.checked_add(1).ok_or(Error::IdsExhausted { kind })
    }

    /// Make the effective view of one entity show exactly `desired`
    ///
    /// Creates the overlay entity when needed. Returns the edits that were
    /// applied; an empty patch means the overlay already matched.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidProperty`] for a property the text format cannot
    ///   hold, or a repeated key
    /// - [`Error::NameMismatch`] if `(kind, id)` is bound to another name
    /// - [`Error::DuplicateName`] if a new entity's name is already a section
    ///   or is the name of a directory section
    pub fn save_entity(&mut self, desired: &DesiredEntity) -> Result<OverlayPatch> {
        let properties = normalize(&desired.properties)?;
        let name = desired.name.trim();
        validate_name(name)?;

        let (kind, id) = (desired.kind, desired.id);
        let origin_name = self.origin.entities().name_of(kind, id);
        let user_name = self.user.entities().name_of(kind, id);
        if let Some(expected) = user_name.or(origin_name) {
            if expected != name {
                return Err(Error::NameMismatch {
                    expected: expected.to_string(),
                    found: name.to_string(),
                });
            }
        } else if self.origin.has_section(name)
            || self.user.has_section(name)
            || EntityType::is_directory_section(name)
        {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }

        let origin_entity = self.origin.get_unit(kind, id);
        let user_entity = self.user.get_unit(kind, id);
        let patch = reconcile(
            origin_entity.as_ref().map(|entity| entity.properties.as_slice()),
            user_entity.as_ref().map(|entity| entity.properties.as_slice()),
            &properties,
        );
        debug!("Reconciled {} #{} ({}): {:?}", kind, id, name, patch);

        if patch.create_entity {
            if origin_name.is_some() || user_name.is_some() {
                self.user.register_unit(kind, id, name);
            } else {
                self.user.add_unit(kind, id, name, &[])?;
            }
        }
        if let Some(section) = self.user.section_mut(name) {
            patch.apply(section);
        }
        Ok(patch)
    }

    /// Remove an entity from the overlay
    ///
    /// An entity that also exists in the base layer falls back to its base
    /// definition.
    ///
    /// # Errors
    ///
    /// - [`Error::OriginImmutable`] if only the base layer defines it
    /// - [`Error::NotFound`] if no layer defines it
    pub fn delete_entity(&mut self, kind: EntityType, id: u32) -> Result<()> {
        if self.user.entities().contains(kind, id) {
            self.user.delete_unit(kind, id)?;
            info!("Deleted {} #{} from the overlay", kind, id);
            Ok(())
        } else if self.origin.entities().contains(kind, id) {
            Err(Error::OriginImmutable { kind, id })
        } else {
            Err(Error::NotFound { kind, id })
        }
    }

    /// Replace the whole overlay; on a parse error the old one is kept
    pub fn load_overlay(&mut self, content: &str) -> Result<()> {
        let user = Rules::parse(content)?;
        info!("Replaced overlay ({} section(s))", user.document().len());
        self.user = user;
        Ok(())
    }

    /// Serialized overlay text
    pub fn export_overlay(&self) -> String {
        self.user.content()
    }

    pub fn load_overlay_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        self.load_overlay(&content)
    }

    /// Write the overlay to `path` through a temporary sibling file
    ///
    /// The in-memory overlay is not affected by a failed write.
    pub fn save_overlay_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = Path::new(&temp_name);

        fs::write(temp_path, self.export_overlay())?;
        if let Err(e) = fs::rename(temp_path, path) {
            let _ = fs::remove_file(temp_path);
            return Err(e.into());
        }
        debug!("Wrote overlay to {}", path.display());
        Ok(())
    }

    fn display_name(&self, entity: &Entity) -> String {
        self.translation.display_name(entity.ui_name(), &entity.name)
    }

    fn summarize(&self, entity: &Entity) -> EntitySummary {
        EntitySummary {
            kind: entity.kind,
            id: entity.id,
            name: entity.name.clone(),
            display_name: self.display_name(entity),
        }
    }

    fn available(&self, entry: &SchemaProperty) -> AvailableProperty {
        AvailableProperty {
            key: entry.key.clone(),
            default_value: entry.value.clone(),
            description: entry
                .description(&self.description_language)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Trim and validate submitted properties, rejecting repeated keys
fn normalize(properties: &[Property]) -> Result<Vec<Property>> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(properties.len());
    for property in properties {
        let property = property.normalized();
        property.validate()?;
        if !seen.insert(property.key.clone()) {
            return Err(Error::InvalidProperty {
                key: property.key,
                message: "key appears more than once".to_string(),
            });
        }
        normalized.push(property);
    }
    Ok(normalized)
}

/// An entity name becomes a section header and a directory value
fn validate_name(name: &str) -> Result<()> {
    let invalid = |message: &str| Error::InvalidProperty {
        key: name.to_string(),
        message: message.to_string(),
    };
    if name.is_empty() {
        return Err(invalid("entity name must not be empty"));
    }
    if name.contains(['[', ']', ';', '=', '\n', '\r']) {
        return Err(invalid("entity name must not contain '[', ']', ';', '=' or line breaks"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "\
[InfantryTypes]
0=E1
1=E2

[VehicleTypes]
3=MTNK

[E1]
UIName=Name:E1
Cost=100
Speed=5

[E2]
Cost=200

[MTNK]
UIName=Name:MTNK
Cost=900

[General]
Gravity=6
";

    const TRANSLATION: &str = "[zh-TW]\nName:E1=動員兵\n";

    const SCHEMA: &str = r#"{
        "unit": [{ "key": "Cost", "value": "0", "desc": { "en": "Price", "zh": "价格" } }],
        "moving_unit": [{ "key": "Speed", "value": "4", "desc": { "en": "Speed" } }],
        "infantry": [{ "key": "Pip", "value": "green" }],
        "country": [{ "key": "Side", "desc": { "en": "Faction" } }]
    }"#;

    fn editor() -> Editor {
        Editor::new(
            Arc::new(Rules::parse(ORIGIN).unwrap()),
            Arc::new(Schema::parse(SCHEMA).unwrap()),
            Arc::new(Translation::parse(TRANSLATION, "zh-TW").unwrap()),
        )
    }

    fn props(pairs: &[(&str, &str)]) -> Vec<Property> {
        pairs.iter().map(|(k, v)| Property::new(*k, *v)).collect()
    }

    fn desired(kind: EntityType, id: u32, name: &str, pairs: &[(&str, &str)]) -> DesiredEntity {
        DesiredEntity {
            kind,
            id,
            name: name.to_string(),
            properties: props(pairs),
        }
    }

    fn visible(detail: &EntityDetail) -> Vec<(String, String)> {
        detail
            .properties
            .iter()
            .filter(|p| !p.value.is_empty())
            .map(|p| (p.key.clone(), p.value.clone()))
            .collect()
    }

    mod read_tests {
        use super::*;

        #[test]
        fn test_list_all_entities() {
            let editor = editor();
            let all = editor.list_all_entities();
            let names: Vec<&str> = all.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, vec!["E1", "E2", "MTNK"]);
        }

        #[test]
        fn test_display_name_translation_and_fallback() {
            let editor = editor();
            let all = editor.list_all_entities();
            assert_eq!(all[0].display_name, "動員兵");
            // no UIName
            assert_eq!(all[1].display_name, "E2");
            // UIName without translation
            assert_eq!(all[2].display_name, "MTNK");
        }

        #[test]
        fn test_list_by_type() {
            let editor = editor();
            let vehicles = editor.list_entities_by_type(EntityType::Vehicle);
            assert_eq!(vehicles.len(), 1);
            assert_eq!(vehicles[0].id, 3);
            assert!(editor.list_entities_by_type(EntityType::Aircraft).is_empty());
        }

        #[test]
        fn test_get_entity_with_descriptions() {
            let editor = editor();
            let detail = editor.get_entity(EntityType::Infantry, 0).unwrap();
            assert_eq!(detail.name, "E1");
            assert_eq!(detail.display_name, "動員兵");
            assert_eq!(detail.properties.len(), 3);
            assert_eq!(detail.properties[1].key, "Cost");
            assert_eq!(detail.properties[1].description.as_deref(), Some("Price"));
            assert_eq!(detail.properties[0].description, None);
        }

        #[test]
        fn test_get_entity_description_language() {
            let editor = editor().with_description_language("zh");
            let detail = editor.get_entity(EntityType::Infantry, 0).unwrap();
            assert_eq!(detail.properties[1].description.as_deref(), Some("价格"));
        }

        #[test]
        fn test_get_missing_entity() {
            let err = editor().get_entity(EntityType::Aircraft, 1).unwrap_err();
            assert!(matches!(
                err,
                Error::NotFound {
                    kind: EntityType::Aircraft,
                    id: 1
                }
            ));
        }

        #[test]
        fn test_list_available_properties() {
            let editor = editor();
            let available = editor.list_available_properties(EntityType::Infantry);
            let keys: Vec<&str> = available.iter().map(|p| p.key.as_str()).collect();
            assert_eq!(keys, vec!["Cost", "Speed", "Pip"]);
            assert_eq!(available[2].default_value, "green");
            assert_eq!(available[2].description, "");

            let buildings = editor.list_available_properties(EntityType::Building);
            assert_eq!(buildings.len(), 1);
        }

        #[test]
        fn test_list_group_properties() {
            let editor = editor();
            assert_eq!(editor.list_group_properties("country").unwrap()[0].description, "Faction");
            assert_eq!(editor.list_group_properties("infantry").unwrap().len(), 3);
            assert!(matches!(
                editor.list_group_properties("weapons"),
                Err(Error::UnknownGroup { .. })
            ));
        }

        #[test]
        fn test_next_entity_id() {
            let mut editor = editor();
            assert_eq!(editor.next_entity_id(EntityType::Infantry).unwrap(), 2);
            assert_eq!(editor.next_entity_id(EntityType::Vehicle).unwrap(), 4);
            assert_eq!(editor.next_entity_id(EntityType::Aircraft).unwrap(), 1);

            editor
                .save_entity(&desired(EntityType::Vehicle, 10, "NEWV", &[]))
                .unwrap();
            assert_eq!(editor.next_entity_id(EntityType::Vehicle).unwrap(), 11);
        }

        #[test]
        fn test_next_entity_id_exhausted() {
            let mut editor = editor();
            editor
                .save_entity(&desired(EntityType::Aircraft, u32::MAX, "LAST", &[]))
                .unwrap();
            assert!(matches!(
                editor.next_entity_id(EntityType::Aircraft),
                Err(Error::IdsExhausted {
                    kind: EntityType::Aircraft
                })
            ));
            // other types are unaffected
            assert_eq!(editor.next_entity_id(EntityType::Vehicle).unwrap(), 4);
        }
    }

    mod save_tests {
        use super::*;

        #[test]
        fn test_scenario_override_and_add() {
            let mut editor = editor();
            editor
                .save_entity(&desired(
                    EntityType::Infantry,
                    0,
                    "E1",
                    &[("UIName", "Name:E1"), ("Cost", "100"), ("Speed", "6"), ("Armor", "Light")],
                ))
                .unwrap();

            let overlay = editor.user().document().section("E1").unwrap();
            assert_eq!(overlay.properties(), &props(&[("Speed", "6"), ("Armor", "Light")])[..]);
            assert!(!overlay.contains_key("Cost"));

            let detail = editor.get_entity(EntityType::Infantry, 0).unwrap();
            assert_eq!(
                visible(&detail),
                vec![
                    ("UIName".to_string(), "Name:E1".to_string()),
                    ("Cost".to_string(), "100".to_string()),
                    ("Speed".to_string(), "6".to_string()),
                    ("Armor".to_string(), "Light".to_string()),
                ]
            );
            // base untouched
            assert_eq!(editor.origin().content(), Rules::parse(ORIGIN).unwrap().content());
        }

        #[test]
        fn test_tombstone_round_trip() {
            let mut editor = editor();
            editor
                .save_entity(&desired(EntityType::Infantry, 1, "E2", &[("Extra", "3")]))
                .unwrap();

            let overlay = editor.user().document().section("E2").unwrap();
            assert_eq!(overlay.value("Cost"), Some(""));

            let reloaded = Rules::parse(&editor.export_overlay()).unwrap();
            let effective = editor.origin().merge(&[&reloaded]);
            let entity = effective.get_unit(EntityType::Infantry, 1).unwrap();
            assert_eq!(entity.get("Cost").unwrap().value, "");
            assert_eq!(entity.get("Extra").unwrap().value, "3");
        }

        #[test]
        fn test_save_twice_is_idempotent() {
            let mut editor = editor();
            let state = desired(EntityType::Infantry, 0, "E1", &[("Cost", "150"), ("New", "x")]);
            editor.save_entity(&state).unwrap();
            let once = editor.export_overlay();

            let patch = editor.save_entity(&state).unwrap();
            assert!(patch.is_empty());
            assert_eq!(editor.export_overlay(), once);
        }

        #[test]
        fn test_save_unchanged_entity_creates_empty_overlay_entry() {
            let mut editor = editor();
            let current = editor.get_entity(EntityType::Infantry, 1).unwrap();
            editor
                .save_entity(&DesiredEntity {
                    kind: EntityType::Infantry,
                    id: 1,
                    name: current.name.clone(),
                    properties: current.to_properties(),
                })
                .unwrap();
            assert_eq!(editor.export_overlay(), "[InfantryTypes]\n1=E2\n\n[E2]\n");
        }

        #[test]
        fn test_create_user_entity() {
            let mut editor = editor();
            editor
                .save_entity(&desired(EntityType::Vehicle, 5, "NEWV", &[("Cost", "700")]))
                .unwrap();

            let detail = editor.get_entity(EntityType::Vehicle, 5).unwrap();
            assert_eq!(detail.name, "NEWV");
            assert_eq!(visible(&detail), vec![("Cost".to_string(), "700".to_string())]);
            assert_eq!(editor.list_entities_by_type(EntityType::Vehicle).len(), 2);
        }

        #[test]
        fn test_edit_user_entity_drops_keys() {
            let mut editor = editor();
            editor
                .save_entity(&desired(EntityType::Vehicle, 5, "NEWV", &[("Cost", "700"), ("Speed", "8")]))
                .unwrap();
            editor
                .save_entity(&desired(EntityType::Vehicle, 5, "NEWV", &[("Speed", "9")]))
                .unwrap();
            let overlay = editor.user().document().section("NEWV").unwrap();
            assert_eq!(overlay.properties(), &props(&[("Speed", "9")])[..]);
        }

        #[test]
        fn test_new_entity_named_after_directory_section() {
            let mut editor = editor();
            for (kind, name) in [
                (EntityType::Aircraft, "AircraftTypes"),
                (EntityType::Aircraft, "VehicleTypes"),
                (EntityType::Building, "BuildingTypes"),
            ] {
                let err = editor
                    .save_entity(&desired(kind, 0, name, &[("Cost", "5")]))
                    .unwrap_err();
                assert!(matches!(err, Error::DuplicateName { name: n } if n == name));
            }
            assert!(editor.user().document().is_empty());
            assert!(editor.list_entities_by_type(EntityType::Aircraft).is_empty());

            // A valid name still saves, and saving again changes nothing
            let state = desired(EntityType::Aircraft, 0, "ORCA", &[("Cost", "5")]);
            editor.save_entity(&state).unwrap();
            assert!(editor.save_entity(&state).unwrap().is_empty());
            assert_eq!(editor.list_entities_by_type(EntityType::Aircraft).len(), 1);
        }

        #[test]
        fn test_name_mismatch() {
            let mut editor = editor();
            let err = editor
                .save_entity(&desired(EntityType::Infantry, 0, "E9", &[]))
                .unwrap_err();
            assert!(matches!(err, Error::NameMismatch { expected, found } if expected == "E1" && found == "E9"));
            assert!(editor.user().document().is_empty());
        }

        #[test]
        fn test_new_entity_name_collides_with_base_section() {
            let mut editor = editor();
            let err = editor
                .save_entity(&desired(EntityType::Aircraft, 0, "General", &[]))
                .unwrap_err();
            assert!(matches!(err, Error::DuplicateName { name } if name == "General"));
            let err = editor
                .save_entity(&desired(EntityType::Aircraft, 0, "MTNK", &[]))
                .unwrap_err();
            assert!(matches!(err, Error::DuplicateName { .. }));
            assert!(editor.user().document().is_empty());
        }

        #[test]
        fn test_invalid_property_rejected_before_mutation() {
            let mut editor = editor();
            let err = editor
                .save_entity(&desired(EntityType::Infantry, 0, "E1", &[("Cost", "1;2")]))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidProperty { key, .. } if key == "Cost"));
            assert!(editor.user().document().is_empty());
        }

        #[test]
        fn test_duplicate_keys_rejected() {
            let mut editor = editor();
            let err = editor
                .save_entity(&desired(EntityType::Infantry, 0, "E1", &[("Cost", "1"), (" Cost ", "2")]))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidProperty { message, .. } if message.contains("more than once")));
        }

        #[test]
        fn test_invalid_entity_name() {
            let mut editor = editor();
            for name in ["", "  ", "A]B", "X=Y"] {
                let err = editor
                    .save_entity(&desired(EntityType::Aircraft, 9, name, &[]))
                    .unwrap_err();
                assert!(matches!(err, Error::InvalidProperty { .. }), "{:?}", name);
            }
        }

        #[test]
        fn test_values_are_trimmed() {
            let mut editor = editor();
            editor
                .save_entity(&desired(EntityType::Infantry, 0, "E1", &[(" Speed ", " 7 ")]))
                .unwrap();
            let overlay = editor.user().document().section("E1").unwrap();
            assert_eq!(overlay.value("Speed"), Some("7"));
        }
    }

    mod delete_tests {
        use super::*;

        #[test]
        fn test_add_then_delete_user_entity() {
            let mut editor = editor();
            editor
                .save_entity(&desired(EntityType::Vehicle, 5, "NEWV", &[("Cost", "1")]))
                .unwrap();
            assert!(editor.get_entity(EntityType::Vehicle, 5).is_ok());

            editor.delete_entity(EntityType::Vehicle, 5).unwrap();
            assert!(matches!(
                editor.get_entity(EntityType::Vehicle, 5),
                Err(Error::NotFound { .. })
            ));
            assert!(!editor.user().has_section("NEWV"));
        }

        #[test]
        fn test_delete_origin_only_entity() {
            let mut editor = editor();
            let err = editor.delete_entity(EntityType::Infantry, 0).unwrap_err();
            assert!(matches!(
                err,
                Error::OriginImmutable {
                    kind: EntityType::Infantry,
                    id: 0
                }
            ));
        }

        #[test]
        fn test_delete_unknown_entity() {
            let mut editor = editor();
            let err = editor.delete_entity(EntityType::Building, 4).unwrap_err();
            assert!(matches!(err, Error::NotFound { .. }));
        }

        #[test]
        fn test_delete_overlay_of_base_entity_reverts() {
            let mut editor = editor();
            editor
                .save_entity(&desired(EntityType::Infantry, 0, "E1", &[("Speed", "9")]))
                .unwrap();
            editor.delete_entity(EntityType::Infantry, 0).unwrap();

            let detail = editor.get_entity(EntityType::Infantry, 0).unwrap();
            assert_eq!(detail.properties.len(), 3);
            assert!(editor.user().document().section("E1").is_none());
        }
    }

    mod overlay_io_tests {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn test_load_overlay_replaces_user_layer() {
            let mut editor = editor();
            editor
                .load_overlay("[InfantryTypes]\n0=E1\n\n[E1]\nCost=1\n")
                .unwrap();
            let detail = editor.get_entity(EntityType::Infantry, 0).unwrap();
            assert_eq!(detail.properties[1].value, "1");
        }

        #[test]
        fn test_failed_load_keeps_overlay() {
            let mut editor = editor();
            editor.load_overlay("[E1]\nCost=1\n").unwrap();
            let before = editor.export_overlay();
            assert!(matches!(editor.load_overlay("[broken\n"), Err(Error::Parse { .. })));
            assert_eq!(editor.export_overlay(), before);
        }

        #[test]
        fn test_save_and_reload_overlay_file() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("nested/overlay.ini");

            let mut editor = editor();
            editor
                .save_entity(&desired(EntityType::Vehicle, 5, "NEWV", &[("Cost", "1")]))
                .unwrap();
            editor.save_overlay_file(&path).unwrap();
            assert!(!temp.path().join("nested/overlay.ini.tmp").exists());

            let mut reopened = self::editor();
            reopened.load_overlay_file(&path).unwrap();
            assert_eq!(reopened.export_overlay(), editor.export_overlay());
        }

        #[test]
        fn test_open_from_config() {
            let temp = TempDir::new().unwrap();
            std::fs::write(temp.path().join("rules.ini"), ORIGIN).unwrap();
            std::fs::write(temp.path().join("tr.ini"), TRANSLATION).unwrap();
            std::fs::write(temp.path().join("schema.json"), SCHEMA).unwrap();
            std::fs::write(temp.path().join("overlay.ini"), "[E2]\nCost=1\n").unwrap();

            let config = EditorConfig {
                base: Some(temp.path().join("rules.ini")),
                translation: Some(temp.path().join("tr.ini")),
                schema: Some(temp.path().join("schema.json")),
                overlay: Some(temp.path().join("overlay.ini")),
                ..EditorConfig::default()
            };
            let editor = Editor::open(&config).unwrap();
            assert_eq!(editor.list_all_entities()[0].display_name, "動員兵");
            assert_eq!(editor.get_entity(EntityType::Infantry, 1).unwrap().properties[0].value, "1");
            assert_eq!(editor.list_available_properties(EntityType::Vehicle).len(), 2);
        }

        #[test]
        fn test_open_without_overlay_file() {
            let temp = TempDir::new().unwrap();
            std::fs::write(temp.path().join("rules.ini"), ORIGIN).unwrap();
            std::fs::write(temp.path().join("tr.ini"), TRANSLATION).unwrap();

            let config = EditorConfig {
                base: Some(temp.path().join("rules.ini")),
                translation: Some(temp.path().join("tr.ini")),
                overlay: Some(temp.path().join("missing.ini")),
                ..EditorConfig::default()
            };
            let editor = Editor::open(&config).unwrap();
            assert!(editor.user().document().is_empty());
            assert!(editor.schema().unit.is_empty());
        }

        #[test]
        fn test_open_missing_language_is_fatal() {
            let temp = TempDir::new().unwrap();
            std::fs::write(temp.path().join("rules.ini"), ORIGIN).unwrap();
            std::fs::write(temp.path().join("tr.ini"), TRANSLATION).unwrap();

            let config = EditorConfig {
                base: Some(temp.path().join("rules.ini")),
                translation: Some(temp.path().join("tr.ini")),
                overlay: Some(temp.path().join("missing.ini")),
                language: "fr".to_string(),
                ..EditorConfig::default()
            };
            assert!(matches!(Editor::open(&config), Err(Error::Translation { .. })));
        }
    }
}
