//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_standard_inputs();
//!     fixture.command().arg("list").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::inputs;
    pub use super::TestFixture;
}

/// Input files used across tests.
#[allow(dead_code)]
pub mod inputs {
    /// A small base rules file with one entity of each type.
    pub const BASE_RULES: &str = "\
; base rules
[General]
Gravity=6

[InfantryTypes]
0=E1
1=E2

[VehicleTypes]
0=MTNK

[AircraftTypes]
0=ORCA

[BuildingTypes]
0=GAPOWR

[E1]
UIName=Name:E1
Cost=100
Speed=5
Armor=none ;unarmored

[E2]
UIName=Name:E2
Cost=200
Speed=4

[MTNK]
UIName=Name:MTNK
Cost=900
Speed=6

[ORCA]
Cost=1200

[GAPOWR]
UIName=Name:GAPOWR
Power=200
";

    /// Localization table with two languages.
    pub const TRANSLATION: &str = "\
[en]
Name:E1=Conscript
Name:MTNK=Grizzly Tank

[zh-TW]
Name:E1=動員兵
Name:MTNK=灰熊坦克
Name:GAPOWR=發電廠
";

    /// Property catalog.
    pub const SCHEMA: &str = r#"{
  "country": [{ "key": "Side", "value": "", "desc": { "en": "Faction" } }],
  "unit": [
    { "key": "Cost", "value": "0", "desc": { "en": "Purchase price", "zh-TW": "價格" } },
    { "key": "UIName", "value": "", "desc": { "en": "Display name token" } }
  ],
  "moving_unit": [{ "key": "Speed", "value": "4", "desc": { "en": "Movement speed" } }],
  "infantry": [{ "key": "Pip", "value": "green", "desc": { "en": "Pip color" } }],
  "building": [{ "key": "Power", "value": "0", "desc": { "en": "Power output" } }]
}"#;

    /// Config pointing at the standard input files next to it.
    pub const CONFIG: &str = "\
base: rules.ini
translation: translation.ini
schema: schema.json
overlay: overlay.ini
";
}

/// A temporary directory holding the editor's inputs.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write base rules, translation, schema and a `.rules-overlay.yaml`.
    pub fn with_standard_inputs(self) -> Self {
        self.with_file("rules.ini", inputs::BASE_RULES)
            .with_file("translation.ini", inputs::TRANSLATION)
            .with_file("schema.json", inputs::SCHEMA)
            .with_file(".rules-overlay.yaml", inputs::CONFIG)
    }

    /// Add an overlay file.
    #[allow(dead_code)]
    pub fn with_overlay(self, content: &str) -> Self {
        self.with_file("overlay.ini", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the overlay file the config points at.
    #[allow(dead_code)]
    pub fn overlay_path(&self) -> PathBuf {
        self.temp_dir.path().join("overlay.ini")
    }

    /// Current overlay file content, empty if it was never written.
    #[allow(dead_code)]
    pub fn overlay(&self) -> String {
        std::fs::read_to_string(self.overlay_path()).unwrap_or_default()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    ///
    /// The config env var is cleared so the fixture's own file is used.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rules-overlay");
        cmd.current_dir(self.path())
            .env_remove("RULES_OVERLAY_CONFIG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_writes_inputs() {
        let fixture = TestFixture::new().with_standard_inputs();
        assert!(fixture.path().join("rules.ini").exists());
        assert!(fixture.path().join(".rules-overlay.yaml").exists());
        assert_eq!(fixture.overlay(), "");
    }

    #[test]
    fn test_inputs_are_well_formed() {
        serde_yaml::from_str::<serde_yaml::Value>(inputs::CONFIG).expect("Config should be valid YAML");
        serde_json::from_str::<serde_json::Value>(inputs::SCHEMA).expect("Schema should be valid JSON");
    }
}
