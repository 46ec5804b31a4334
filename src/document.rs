//! In-memory model of one rules layer
//!
//! A [`Document`] is an ordered collection of named [`Section`]s, each holding
//! an ordered list of [`Property`] entries (`key=value` with an optional
//! trailing comment). The model knows nothing about entities; it only parses
//! and serializes the text dialect shared by the base rules, the user overlay
//! and the localization table.
//!
//! ## Text Dialect
//!
//! - Section headers: `[SectionName]`, optionally followed by `; comment`
//! - Key-value pairs: `key=value`, `=` being the only delimiter
//! - Inline comments: everything after the first `;` on a key line
//! - Full-line comments: lines starting with `;` or `#` (not retained)
//! - Root-level entries (entries before any section header)
//!
//! ## Example
//!
//! ```
//! use rules_overlay::document::Document;
//!
//! let doc = Document::parse("[E1]\nCost=100 ;price\nSpeed=5\n").unwrap();
//! let section = doc.section("E1").unwrap();
//! assert_eq!(section.value("Cost"), Some("100"));
//! assert_eq!(section.get("Cost").unwrap().comment, "price");
//! assert_eq!(doc.serialize(), "[E1]\nCost=100 ;price\nSpeed=5\n");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const COMMENT_MARKER: char = ';';

/// A single `key=value ;comment` entry
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub comment: String,
}

impl Property {
    /// Create a property without a comment
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comment: String::new(),
        }
    }

    /// Attach a trailing comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// An empty value is how the overlay suppresses a base property.
    pub fn is_tombstone(&self) -> bool {
        self.value.is_empty()
    }

    /// Trim surrounding whitespace the same way the parser does.
    pub fn normalized(&self) -> Self {
        Self {
            key: self.key.trim().to_string(),
            value: self.value.trim().to_string(),
            comment: self.comment.trim().to_string(),
        }
    }

    /// Check that the property survives a serialize/parse round trip.
    ///
    /// This is not a schema check: values are otherwise free-form.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| Error::InvalidProperty {
            key: self.key.clone(),
            message: message.to_string(),
        };

        if self.key.trim().is_empty() {
            return Err(invalid("key must not be empty"));
        }
        if self.key.trim() != self.key {
            return Err(invalid("key must not start or end with whitespace"));
        }
        if self.key.starts_with('[') || self.key.starts_with('#') {
            return Err(invalid("key must not start with '[' or '#'"));
        }
        if self.key.contains(['=', COMMENT_MARKER]) {
            return Err(invalid("key must not contain '=' or ';'"));
        }
        if self.value.contains(COMMENT_MARKER) {
            return Err(invalid("value must not contain ';'"));
        }
        if self.value.trim() != self.value {
            return Err(invalid("value must not start or end with whitespace"));
        }
        if [&self.key, &self.value, &self.comment]
            .iter()
            .any(|text| text.contains(['\n', '\r']))
        {
            return Err(invalid("line breaks are not allowed"));
        }
        Ok(())
    }
}

/// A named, ordered group of properties
///
/// The root section (entries before any header) has an empty name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    properties: Vec<Property>,
}

impl Section {
    /// Create an empty section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in stored order
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.key == key)
    }

    /// Shortcut for the value of `key`
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(|property| property.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Set a key, overwriting value and comment in place when it exists and
    /// appending it otherwise.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        comment: impl Into<String>,
    ) {
        self.set_property(Property {
            key: key.into(),
            value: value.into(),
            comment: comment.into(),
        });
    }

    /// Same as [`Section::set`] with an owned property.
    pub fn set_property(&mut self, property: Property) {
        match self.position(&property.key) {
            Some(pos) => {
                let existing = &mut self.properties[pos];
                existing.value = property.value;
                existing.comment = property.comment;
            }
            None => self.properties.push(property),
        }
    }

    /// Remove a key, returning it if it was present
    pub fn delete(&mut self, key: &str) -> Option<Property> {
        self.position(key).map(|pos| self.properties.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.properties.iter().position(|property| property.key == key)
    }
}

/// One parsed rules layer
#[derive(Clone, Debug, Default)]
pub struct Document {
    sections: Vec<Section>,
    /// Section name -> position in `sections`
    index: HashMap<String, usize>,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.sections == other.sections
    }
}

impl Eq for Document {}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse structured text into a document
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with the offending line number when:
    /// - a section header is not terminated by `]`
    /// - a section header is empty (`[]`)
    /// - a key line has no `=` delimiter
    /// - a key is empty
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut document = Document::new();
        let mut current = String::new();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) || trimmed.starts_with('#')
            {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let (header, _) = split_comment(header);
                let name = header
                    .trim_end()
                    .strip_suffix(']')
                    .ok_or_else(|| Error::Parse {
                        line: line_number,
                        message: format!("unterminated section header: {}", trimmed),
                    })?
                    .trim();
                if name.is_empty() {
                    return Err(Error::Parse {
                        line: line_number,
                        message: "empty section name".to_string(),
                    });
                }
                document.ensure_section(name);
                current = name.to_string();
                continue;
            }

            let (body, comment) = split_comment(trimmed);
            let (key, value) = body.split_once('=').ok_or_else(|| Error::Parse {
                line: line_number,
                message: format!("missing '=' delimiter: {}", trimmed),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::Parse {
                    line: line_number,
                    message: "empty key".to_string(),
                });
            }

            document
                .ensure_section(&current)
                .set(key, value.trim(), comment.unwrap_or_default().trim());
        }

        Ok(document)
    }

    /// Serialize back to text
    ///
    /// Sections are separated by a blank line; the root section, when it has
    /// entries, comes first without a header.
    pub fn serialize(&self) -> String {
        let mut output = String::new();
        let root = self.section("").filter(|section| !section.is_empty());
        let named = self.sections.iter().filter(|section| !section.name.is_empty());

        for (index, section) in root.into_iter().chain(named).enumerate() {
            if index > 0 {
                output.push('\n');
            }
            if !section.name.is_empty() {
                output.push('[');
                output.push_str(&section.name);
                output.push_str("]\n");
            }
            for property in &section.properties {
                write_property(&mut output, property);
            }
        }

        output
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.index.get(name).map(|&pos| &self.sections[pos])
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.index.get(name).map(|&pos| &mut self.sections[pos])
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Find a section by name, appending an empty one if it doesn't exist
    pub fn ensure_section(&mut self, name: &str) -> &mut Section {
        let pos = match self.index.get(name) {
            Some(&pos) => pos,
            None => {
                self.sections.push(Section::new(name));
                let pos = self.sections.len() - 1;
                self.index.insert(name.to_string(), pos);
                pos
            }
        };
        &mut self.sections[pos]
    }

    /// Remove a section, returning it if it was present
    pub fn delete_section(&mut self, name: &str) -> Option<Section> {
        let pos = self.index.remove(name)?;
        let removed = self.sections.remove(pos);
        for later in self.index.values_mut().filter(|later| **later > pos) {
            *later -= 1;
        }
        Some(removed)
    }

    /// Sections in stored order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Split a line at the first comment marker
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once(COMMENT_MARKER) {
        Some((body, comment)) => (body, Some(comment)),
        None => (line, None),
    }
}

fn write_property(output: &mut String, property: &Property) {
    output.push_str(&property.key);
    output.push('=');
    output.push_str(&property.value);
    if !property.comment.is_empty() {
        output.push(' ');
        output.push(COMMENT_MARKER);
        output.push_str(&property.comment);
    }
    output.push('\n');
}
