//! Property schema catalog
//!
//! A read-only JSON catalog describing the property keys the game
//! understands, grouped by the kind of object they apply to. It is used to
//! suggest keys and show descriptions; merge and reconciliation never consult
//! it, and values are never validated against it.
//!
//! ```json
//! {
//!   "unit": [{ "key": "Cost", "value": "100", "desc": { "en": "Purchase price" } }],
//!   "infantry": [{ "key": "Pip", "desc": { "en": "Pip color" } }]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::error::Result;

/// Language used when the requested one has no description
pub const FALLBACK_LANGUAGE: &str = "en";

/// One catalogued property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaProperty {
    pub key: String,
    /// Example or default value
    pub value: String,
    pub comment: String,
    pub name: String,
    /// Language code -> description
    pub desc: BTreeMap<String, String>,
}

impl SchemaProperty {
    /// Description in `language`, falling back to English, then to any language
    pub fn description(&self, language: &str) -> Option<&str> {
        self.desc
            .get(language)
            .or_else(|| self.desc.get(FALLBACK_LANGUAGE))
            .or_else(|| self.desc.values().next())
            .map(String::as_str)
    }
}

/// The catalog, one list per group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub country: Vec<SchemaProperty>,
    pub crate_rules: Vec<SchemaProperty>,
    pub combat_damage: Vec<SchemaProperty>,
    pub radiation: Vec<SchemaProperty>,
    pub elevation_model: Vec<SchemaProperty>,
    pub wall_model: Vec<SchemaProperty>,

    pub unit: Vec<SchemaProperty>,
    pub moving_unit: Vec<SchemaProperty>,
    pub turret_changer: Vec<SchemaProperty>,
    pub infantry: Vec<SchemaProperty>,
    pub vehicle: Vec<SchemaProperty>,
    pub aircraft: Vec<SchemaProperty>,
    pub building: Vec<SchemaProperty>,
}

impl Schema {
    /// Group names accepted by [`Schema::list_available_properties`]
    pub const GROUPS: [&'static str; 13] = [
        "country",
        "crate_rules",
        "combat_damage",
        "radiation",
        "elevation_model",
        "wall_model",
        "unit",
        "moving_unit",
        "turret_changer",
        "infantry",
        "vehicle",
        "aircraft",
        "building",
    ];

    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Properties available for a group; entity type names resolve to the
    /// per-type lists. Unknown groups yield `None`.
    pub fn list_available_properties(&self, group: &str) -> Option<Vec<&SchemaProperty>> {
        if let Ok(kind) = group.parse::<EntityType>() {
            return Some(self.list_available_unit_properties(kind));
        }
        let list = match group {
            "country" => &self.country,
            "crate_rules" => &self.crate_rules,
            "combat_damage" => &self.combat_damage,
            "radiation" => &self.radiation,
            "elevation_model" => &self.elevation_model,
            "wall_model" => &self.wall_model,
            "unit" => &self.unit,
            "moving_unit" => &self.moving_unit,
            "turret_changer" => &self.turret_changer,
            _ => return None,
        };
        Some(list.iter().collect())
    }

    /// Shared unit keys, then movement keys, then the type's own keys
    pub fn list_available_unit_properties(&self, kind: EntityType) -> Vec<&SchemaProperty> {
        let own = match kind {
            EntityType::Infantry => &self.infantry,
            EntityType::Vehicle => &self.vehicle,
            EntityType::Aircraft => &self.aircraft,
            EntityType::Building => &self.building,
        };
        let movement = match kind {
            EntityType::Building => &[][..],
            _ => self.moving_unit.as_slice(),
        };
        let groups = [self.unit.as_slice(), movement, own.as_slice()];
        groups.into_iter().flatten().collect()
    }

    /// Catalog entry for `key` as it applies to `kind`
    pub fn find_unit_property(&self, kind: EntityType, key: &str) -> Option<&SchemaProperty> {
        self.list_available_unit_properties(kind)
            .into_iter()
            .find(|property| property.key == key)
    }
}
