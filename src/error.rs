//! # Error Handling
//!
//! This module defines the centralized error type for `rules-overlay`. It uses
//! `thiserror` to build a single `Error` enum covering every failure the
//! layered rules model can report, each variant carrying enough context to
//! tell the user which section, entity or line was involved.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes. The core model reports
//!   parse failures, missing entities, duplicate names and ids, and attempts
//!   to mutate the read-only base layer. The boundary modules add I/O,
//!   JSON, YAML and configuration errors.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! None of these errors abort the process on their own. The binary decides
//! which ones are fatal (a base file or localization table that fails to
//! parse at startup).

use thiserror::Error;

use crate::entity::EntityType;

/// Main error type for rules-overlay operations
#[derive(Error, Debug)]
pub enum Error {
    /// The structured text could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// No entity with this type and id exists in the layer being queried.
    #[error("Entity not found: {kind} #{id}")]
    NotFound { kind: EntityType, id: u32 },

    /// The name is already used by another section of the document.
    #[error("Entity name already used: {name}")]
    DuplicateName { name: String },

    /// The type/id pair is already registered in the directory section.
    #[error("Entity id already exists: {kind} #{id}")]
    DuplicateId { kind: EntityType, id: u32 },

    /// Every id of the type is taken up to the largest representable one.
    #[error("No free id above the highest {kind} id")]
    IdsExhausted { kind: EntityType },

    /// The entity only exists in the base layer, which is never mutated.
    #[error("Cannot modify base rules: {kind} #{id} is only defined in the base layer")]
    OriginImmutable { kind: EntityType, id: u32 },

    /// The submitted name does not match the name already bound to the id.
    #[error("Entity name mismatch: expected {expected}, found {found}")]
    NameMismatch { expected: String, found: String },

    /// A property cannot be represented in the text format.
    #[error("Invalid property {key:?}: {message}")]
    InvalidProperty { key: String, message: String },

    /// The entity type name is not one of the known categories.
    #[error("Unknown entity type: {name}")]
    UnknownEntityType { name: String },

    /// The property group is not in the schema catalog.
    #[error("Unknown property group: {name}")]
    UnknownGroup { name: String },

    /// The localization table could not be built.
    #[error("Translation error: {message}")]
    Translation { message: String },

    /// The editor configuration is incomplete or unreadable.
    ///
    /// Carries an optional hint about how to fix it.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
