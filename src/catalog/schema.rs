//! Schema definitions for FernDB
//!
//! This module defines table schemas and attribute metadata.

use super::types::DataType;
use serde::{Deserialize, Serialize};

/// One attribute (column) of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name (original case preserved for display)
    pub name: String,
    /// Declared domain
    pub data_type: DataType,
    /// Is this the primary key?
    pub primary_key: bool,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, data_type: DataType, primary_key: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key,
        }
    }

    /// Check that a name is a valid identifier: a leading letter followed by
    /// up to 19 alphanumeric characters.
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {}
            _ => return false,
        }
        name.len() <= 20 && chars.all(|c| c.is_ascii_alphanumeric())
    }
}

/// Table schema - the ordered attribute list defining a table's shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    /// Create a schema from a list of attributes
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    /// All attributes in order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Get an attribute by position
    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the schema has no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Position of the named attribute (names compare case-insensitively)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Position of the primary-key attribute, if the schema has one
    pub fn key_index(&self) -> Option<usize> {
        self.attributes.iter().position(|a| a.primary_key)
    }

    /// Replace all attribute names positionally. The caller has already
    /// checked that `new_names` has the right length.
    pub fn rename_all(&mut self, new_names: &[String]) {
        for (attr, name) in self.attributes.iter_mut().zip(new_names) {
            attr.name = name.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            Attribute::new("id", DataType::Integer, true),
            Attribute::new("Name", DataType::Text, false),
            Attribute::new("score", DataType::Float, false),
        ])
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let schema = sample_schema();
        assert_eq!(schema.index_of("ID"), Some(0));
        assert_eq!(schema.index_of("name"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
    }

    #[test]
    fn test_key_index() {
        let schema = sample_schema();
        assert_eq!(schema.key_index(), Some(0));

        let unkeyed = Schema::new(vec![Attribute::new("x", DataType::Integer, false)]);
        assert_eq!(unkeyed.key_index(), None);
    }

    #[test]
    fn test_rename_preserves_domains_and_key() {
        let mut schema = sample_schema();
        schema.rename_all(&["a".to_string(), "b".to_string(), "c".to_string()]);

        assert_eq!(schema.attribute(0).unwrap().name, "a");
        assert!(schema.attribute(0).unwrap().primary_key);
        assert_eq!(schema.attribute(2).unwrap().data_type, DataType::Float);
    }

    #[test]
    fn test_identifier_validation() {
        assert!(Attribute::is_valid_name("a"));
        assert!(Attribute::is_valid_name("studentName2"));
        assert!(Attribute::is_valid_name("a2345678901234567890")); // 20 chars
        assert!(!Attribute::is_valid_name(""));
        assert!(!Attribute::is_valid_name("2abc"));
        assert!(!Attribute::is_valid_name("has space"));
        assert!(!Attribute::is_valid_name("a23456789012345678901")); // 21 chars
    }
}
