//! Catalog for FernDB
//!
//! The catalog is the root of all process state: the databases, the
//! current-database selection, and the snapshot that persists both between
//! runs. It is passed explicitly into every command - there are no ambient
//! globals.

use super::database::Database;
use crate::error::{Error, Result};
use crate::output::Output;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// The process-wide catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    databases: BTreeMap<String, Database>,
    current: Option<String>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a database; does not switch the current selection
    pub fn create_database(&mut self, name: &str, out: &mut Output) {
        if self.databases.contains_key(name) {
            out.line(format!("Error: Database '{}' already exists.", name));
        } else {
            self.databases
                .insert(name.to_string(), Database::new(name));
            out.line(format!("Database '{}' created successfully.", name));
        }
    }

    /// Select the current database
    pub fn use_database(&mut self, name: &str, out: &mut Output) -> bool {
        if self.databases.contains_key(name) {
            self.current = Some(name.to_string());
            out.line(format!("Now using database: '{}'.", name));
            true
        } else {
            out.line(format!("Error: Database '{}' does not exist.", name));
            false
        }
    }

    /// The current database, if one is selected
    pub fn current(&self) -> Option<&Database> {
        self.current
            .as_ref()
            .and_then(|name| self.databases.get(name))
    }

    /// Mutable access to the current database
    pub fn current_mut(&mut self) -> Option<&mut Database> {
        let name = self.current.clone()?;
        self.databases.get_mut(&name)
    }

    /// Name of the current database, if one is selected
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Database names in deterministic (sorted) order
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(|s| s.as_str()).collect()
    }

    /// Number of databases
    pub fn database_count(&self) -> usize {
        self.databases.len()
    }

    // ========== Persistence ==========

    /// Write the whole catalog to the snapshot file. The write goes to a
    /// temporary file first and is renamed into place, so a crash mid-write
    /// leaves the previous snapshot intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self).map_err(|e| Error::Snapshot(e.to_string()))?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "catalog snapshot written");
        Ok(())
    }

    /// Load a catalog from the snapshot file
    pub fn load(path: &Path) -> Result<Catalog> {
        let bytes = std::fs::read(path)?;
        let catalog = bincode::deserialize(&bytes).map_err(|e| Error::Snapshot(e.to_string()))?;
        debug!(path = %path.display(), "catalog snapshot loaded");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_does_not_switch_current() {
        let mut catalog = Catalog::new();
        let mut out = Output::new();

        catalog.create_database("d", &mut out);
        assert!(catalog.current().is_none());

        assert!(catalog.use_database("d", &mut out));
        assert_eq!(catalog.current().unwrap().name(), "d");
    }

    #[test]
    fn test_duplicate_database_refused() {
        let mut catalog = Catalog::new();
        let mut out = Output::new();
        catalog.create_database("d", &mut out);

        let mut out = Output::new();
        catalog.create_database("d", &mut out);
        assert_eq!(out.lines(), &["Error: Database 'd' already exists."]);
        assert_eq!(catalog.database_count(), 1);
    }

    #[test]
    fn test_use_unknown_database() {
        let mut catalog = Catalog::new();
        let mut out = Output::new();

        assert!(!catalog.use_database("ghost", &mut out));
        assert!(catalog.current().is_none());
        assert!(out.contains("does not exist"));
    }

    #[test]
    fn test_names_are_sorted() {
        let mut catalog = Catalog::new();
        let mut out = Output::new();
        for name in ["zoo", "abc", "mid"] {
            catalog.create_database(name, &mut out);
        }

        assert_eq!(catalog.database_names(), vec!["abc", "mid", "zoo"]);
    }
}
