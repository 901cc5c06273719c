//! A named collection of tables

use crate::output::Output;
use crate::storage::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One database: a mapping from table name to table. The map is ordered so
/// listings come out the same on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    name: String,
    tables: BTreeMap<String, Table>,
}

impl Database {
    /// Create a new empty database
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a table; refuses when the name is already taken
    pub fn add_table(&mut self, table: Table, out: &mut Output) -> bool {
        let table_name = table.name().to_string();
        if self.tables.contains_key(&table_name) {
            out.line(format!(
                "Error: Table '{}' already exists in database '{}'.",
                table_name, self.name
            ));
            false
        } else {
            out.line(format!(
                "Table '{}' added to database '{}'.",
                table_name, self.name
            ));
            self.tables.insert(table_name, table);
            true
        }
    }

    /// Look up a table; a miss is reported as a diagnostic
    pub fn table(&self, name: &str, out: &mut Output) -> Option<&Table> {
        let found = self.tables.get(name);
        if found.is_none() {
            self.report_missing(name, out);
        }
        found
    }

    /// Mutable table lookup; a miss is reported as a diagnostic
    pub fn table_mut(&mut self, name: &str, out: &mut Output) -> Option<&mut Table> {
        if !self.tables.contains_key(name) {
            self.report_missing(name, out);
            return None;
        }
        self.tables.get_mut(name)
    }

    /// Drop a table (schema included)
    pub fn delete_table(&mut self, name: &str, out: &mut Output) -> bool {
        if self.tables.remove(name).is_some() {
            out.line(format!(
                "Table '{}' deleted from database '{}'.",
                name, self.name
            ));
            true
        } else {
            self.report_missing(name, out);
            false
        }
    }

    /// Table names in deterministic (sorted) order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    /// Number of tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    fn report_missing(&self, name: &str, out: &mut Output) {
        out.line(format!(
            "Error: Table '{}' does not exist in database '{}'.",
            name, self.name
        ));
    }
}
