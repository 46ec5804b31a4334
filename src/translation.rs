//! Display-name translation table
//!
//! The localization file uses the same text dialect as the rules: one
//! section per language, mapping translation tokens (the `UIName` of a unit,
//! e.g. `Name:E1`) to localized text.
//!
//! ```ini
//! [zh-TW]
//! Name:E1=動員兵
//! ```

use std::path::Path;

use log::warn;

use crate::document::{Document, Section};
use crate::error::{Error, Result};

/// Token lookup for one language
#[derive(Debug, Clone)]
pub struct Translation {
    language: String,
    table: Section,
}

impl Translation {
    /// Take the section named `language` out of a localization document
    ///
    /// # Errors
    ///
    /// [`Error::Translation`] if the document has no section for `language`.
    pub fn from_document(document: &Document, language: &str) -> Result<Self> {
        let table = document
            .section(language)
            .cloned()
            .ok_or_else(|| Error::Translation {
                message: format!("no [{}] section in localization table", language),
            })?;
        Ok(Self {
            language: language.to_string(),
            table,
        })
    }

    pub fn parse(content: &str, language: &str) -> Result<Self> {
        Self::from_document(&Document::parse(content)?, language)
    }

    pub fn from_file<P: AsRef<Path>>(path: P, language: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, language)
    }

    /// A table with no entries; every lookup falls back.
    pub fn empty(language: &str) -> Self {
        Self {
            language: language.to_string(),
            table: Section::new(language),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.table.value(token)
    }

    /// Localized text for `token`, or `fallback` when there is no token or
    /// the table does not know it
    pub fn display_name(&self, token: Option<&str>, fallback: &str) -> String {
        match token {
            Some(token) => match self.get(token) {
                Some(text) => text.to_string(),
                None => {
                    warn!("No {} translation for '{}'", self.language, token);
                    fallback.to_string()
                }
            },
            None => fallback.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
