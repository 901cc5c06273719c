//! Table storage for FernDB
//!
//! A table owns its schema, its tuples in insertion order, and - when the
//! schema has a primary key - the BST index that drives ordered retrieval.
//! Constraint checks (arity, domain conformance, entity integrity, key
//! uniqueness) happen here; every rejection emits one diagnostic line.

use super::tuple::Tuple;
use super::value::{DomainError, Value};
use crate::catalog::Schema;
use crate::index::{BstIndex, IndexKey};
use crate::output::Output;
use crate::sql::condition::Condition;
use serde::{Deserialize, Serialize};

/// A table: schema, tuples, and the optional primary-key index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    schema: Schema,
    tuples: Vec<Tuple>,
    index: Option<BstIndex>,
}

impl Table {
    /// Create a new empty table; the index exists exactly when the schema
    /// has a primary key.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        let index = schema.key_index().map(|_| BstIndex::new());
        Self {
            name: name.into(),
            schema,
            tuples: Vec::new(),
            index,
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Tuples in insertion order
    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    /// Number of tuples
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Check if the table has no tuples
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// The primary-key index, if the schema has a key
    pub fn index(&self) -> Option<&BstIndex> {
        self.index.as_ref()
    }

    /// Insert a record given as raw literals. Validates end-to-end (arity,
    /// entity integrity, domain conformance), probes the index for duplicate
    /// keys, then appends and indexes the tuple.
    pub fn insert(&mut self, values: &[String], out: &mut Output) -> bool {
        if values.len() != self.schema.len() {
            out.line("Error: Number of values does not match table schema.");
            return false;
        }

        let mut typed = Vec::with_capacity(values.len());
        for (raw, attr) in values.iter().zip(self.schema.attributes()) {
            if attr.primary_key && raw.trim().is_empty() {
                out.line(format!(
                    "Error: Primary key attribute '{}' cannot be null or empty.",
                    attr.name
                ));
                return false;
            }
            match Value::parse(raw, attr.data_type) {
                Ok(value) => typed.push(value),
                Err(e) => {
                    out.line(domain_diagnostic("Value", &attr.name, e));
                    return false;
                }
            }
        }
        let tuple = Tuple::new(typed);

        if let (Some(key_pos), Some(index)) = (self.schema.key_index(), self.index.as_mut()) {
            let key = match tuple.get(key_pos) {
                Some(value) => IndexKey::new(value.clone()),
                None => return false,
            };
            if index.search(&key).is_some() {
                out.line(format!("Error: Duplicate primary key value: {}", key));
                return false;
            }
            let row = self.tuples.len();
            if !index.insert(key.clone(), row) {
                out.line(format!("Error: Duplicate key insertion attempted: {}", key));
                return false;
            }
        }

        self.tuples.push(tuple);
        out.line(format!("Record inserted into table '{}'.", self.name));
        true
    }

    /// Retrieve tuples matching the condition (all tuples when absent or
    /// blank). With a primary key the order is the in-order traversal of the
    /// index; otherwise insertion order.
    pub fn select(&self, condition: Option<&str>, out: &mut Output) -> Vec<&Tuple> {
        let ordered = self.ordered_tuples();
        let parsed = match self.parse_condition(condition, out) {
            Ok(parsed) => parsed,
            Err(()) => return Vec::new(),
        };
        match parsed {
            None => ordered,
            Some(cond) => ordered
                .into_iter()
                .filter(|t| cond.evaluate(t, &self.schema, out))
                .collect(),
        }
    }

    /// Check whether one tuple satisfies a condition against this table's
    /// schema. A condition that fails to parse is reported and matches
    /// nothing.
    pub fn matches_condition(&self, tuple: &Tuple, condition: &str, out: &mut Output) -> bool {
        match Condition::parse(condition, &self.schema) {
            Ok(cond) => cond.evaluate(tuple, &self.schema, out),
            Err(e) => {
                out.line(format!("Error parsing condition: {}", e));
                false
            }
        }
    }

    /// Update every tuple matching the condition (all when absent), copying
    /// filled positions of `patch` into the tuple. Each position is checked
    /// for domain conformance, entity integrity and key uniqueness; a failed
    /// position is skipped with a diagnostic while the rest of the patch
    /// still applies. Returns the number of matched tuples.
    pub fn update(&mut self, condition: Option<&str>, patch: &[Option<String>], out: &mut Output) -> usize {
        let matches = match self.matching_rows(condition, out) {
            Ok(rows) => rows,
            Err(()) => Vec::new(),
        };

        for &row in &matches {
            for (pos, raw) in patch.iter().enumerate() {
                let Some(raw) = raw else { continue };
                let Some(attr) = self.schema.attribute(pos) else { continue };

                let value = match Value::parse(raw, attr.data_type) {
                    Ok(value) => value,
                    Err(e) => {
                        out.line(domain_diagnostic("New value", &attr.name, e));
                        continue;
                    }
                };

                if attr.primary_key {
                    if value.is_blank() {
                        out.line(format!(
                            "Error: Primary key '{}' cannot be null or empty.",
                            attr.name
                        ));
                        continue;
                    }
                    let new_key = IndexKey::new(value.clone());
                    if let Some(index) = self.index.as_mut() {
                        match index.search(&new_key) {
                            Some(existing) if existing != row => {
                                out.line(format!(
                                    "Error: Duplicate primary key value: {}",
                                    new_key
                                ));
                                continue;
                            }
                            Some(_) => {} // unchanged key
                            None => {
                                // Re-key: the old entry must not linger.
                                if let Some(old) = self.tuples[row].get(pos) {
                                    index.delete(&IndexKey::new(old.clone()));
                                }
                                index.insert(new_key, row);
                            }
                        }
                    }
                }

                self.tuples[row].set(pos, value);
            }
        }

        out.line(format!(
            "{} record(s) updated in table '{}'.",
            matches.len(),
            self.name
        ));
        matches.len()
    }

    /// Delete tuples matching the condition. With no condition the table is
    /// emptied and the index replaced with a fresh one; otherwise matching
    /// tuples are removed and the index regenerated from the survivors.
    /// Returns the number of tuples removed.
    pub fn delete(&mut self, condition: Option<&str>, out: &mut Output) -> usize {
        if is_blank(condition) {
            let removed = self.tuples.len();
            self.tuples.clear();
            self.index = self.schema.key_index().map(|_| BstIndex::new());
            out.line(format!("All records deleted from table '{}'.", self.name));
            return removed;
        }

        let matches = match self.matching_rows(condition, out) {
            Ok(rows) => rows,
            Err(()) => Vec::new(),
        };
        let mut row = 0usize;
        self.tuples.retain(|_| {
            let keep = !matches.contains(&row);
            row += 1;
            keep
        });
        self.rebuild_index();

        out.line(format!(
            "{} record(s) deleted from table '{}'.",
            matches.len(),
            self.name
        ));
        matches.len()
    }

    /// Replace all attribute names positionally; domains and the key flag
    /// are untouched.
    pub fn rename_attributes(&mut self, new_names: &[String], out: &mut Output) -> bool {
        if new_names.len() != self.schema.len() {
            out.line("Error: Number of new names does not match the number of attributes.");
            return false;
        }
        self.schema.rename_all(new_names);
        out.line(format!(
            "Attributes in table '{}' renamed successfully.",
            self.name
        ));
        true
    }

    /// Tuples in retrieval order: index order when keyed, insertion order
    /// otherwise.
    fn ordered_tuples(&self) -> Vec<&Tuple> {
        match self.index.as_ref() {
            Some(index) => index
                .in_order()
                .into_iter()
                .filter_map(|row| self.tuples.get(row))
                .collect(),
            None => self.tuples.iter().collect(),
        }
    }

    /// Parse an optional condition. `Err(())` means the condition was given
    /// but malformed; the diagnostic has already been emitted.
    fn parse_condition(
        &self,
        condition: Option<&str>,
        out: &mut Output,
    ) -> Result<Option<Condition>, ()> {
        match condition {
            None => Ok(None),
            Some(c) if c.trim().is_empty() => Ok(None),
            Some(c) => match Condition::parse(c, &self.schema) {
                Ok(parsed) => Ok(Some(parsed)),
                Err(e) => {
                    out.line(format!("Error parsing condition: {}", e));
                    Err(())
                }
            },
        }
    }

    /// Row positions (insertion order) of tuples matching the condition
    fn matching_rows(&self, condition: Option<&str>, out: &mut Output) -> Result<Vec<usize>, ()> {
        let parsed = self.parse_condition(condition, out)?;
        Ok(self
            .tuples
            .iter()
            .enumerate()
            .filter(|(_, t)| match &parsed {
                None => true,
                Some(cond) => cond.evaluate(t, &self.schema, out),
            })
            .map(|(row, _)| row)
            .collect())
    }

    /// Regenerate the index from the current tuple sequence
    fn rebuild_index(&mut self) {
        if let Some(key_pos) = self.schema.key_index() {
            let mut index = BstIndex::new();
            for (row, tuple) in self.tuples.iter().enumerate() {
                if let Some(value) = tuple.get(key_pos) {
                    index.insert(IndexKey::new(value.clone()), row);
                }
            }
            self.index = Some(index);
        }
    }
}

fn is_blank(condition: Option<&str>) -> bool {
    condition.map_or(true, |c| c.trim().is_empty())
}

fn domain_diagnostic(kind: &str, attribute: &str, error: DomainError) -> String {
    match error {
        DomainError::NotAnInteger => format!(
            "Error: {} for attribute '{}' is not a valid integer.",
            kind, attribute
        ),
        DomainError::NotAFloat => format!(
            "Error: {} for attribute '{}' is not a valid float.",
            kind, attribute
        ),
        DomainError::TextTooLong => format!(
            "Error: {} for attribute '{}' exceeds 100 characters.",
            kind, attribute
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Attribute, DataType};

    fn keyed_table() -> Table {
        Table::new(
            "users",
            Schema::new(vec![
                Attribute::new("id", DataType::Integer, true),
                Attribute::new("name", DataType::Text, false),
            ]),
        )
    }

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn insert_ok(table: &mut Table, values: &[&str]) {
        let mut out = Output::new();
        assert!(table.insert(&raw(values), &mut out), "{:?}", out.lines());
    }

    fn ids(tuples: &[&Tuple]) -> Vec<i32> {
        tuples
            .iter()
            .map(|t| match t.get(0) {
                Some(Value::Int(i)) => *i,
                other => panic!("unexpected value {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_keyed_select_is_in_key_order() {
        let mut table = keyed_table();
        insert_ok(&mut table, &["3", "c"]);
        insert_ok(&mut table, &["1", "a"]);
        insert_ok(&mut table, &["2", "b"]);

        let mut out = Output::new();
        assert_eq!(ids(&table.select(None, &mut out)), vec![1, 2, 3]);
    }

    #[test]
    fn test_unkeyed_select_is_in_insertion_order() {
        let mut table = Table::new(
            "plain",
            Schema::new(vec![Attribute::new("n", DataType::Integer, false)]),
        );
        insert_ok(&mut table, &["3"]);
        insert_ok(&mut table, &["1"]);
        insert_ok(&mut table, &["2"]);

        let mut out = Output::new();
        assert_eq!(ids(&table.select(None, &mut out)), vec![3, 1, 2]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut table = keyed_table();
        insert_ok(&mut table, &["1", "a"]);

        let mut out = Output::new();
        assert!(!table.insert(&raw(&["1", "b"]), &mut out));
        assert!(out.contains("Duplicate primary key value: 1"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insert_validation_order() {
        let mut table = keyed_table();

        let mut out = Output::new();
        assert!(!table.insert(&raw(&["1"]), &mut out));
        assert!(out.contains("does not match table schema"));

        let mut out = Output::new();
        assert!(!table.insert(&raw(&["  ", "a"]), &mut out));
        assert!(out.contains("cannot be null or empty"));

        let mut out = Output::new();
        assert!(!table.insert(&raw(&["x", "a"]), &mut out));
        assert!(out.contains("not a valid integer"));

        let long = "x".repeat(101);
        let mut out = Output::new();
        assert!(!table.insert(&raw(&["1", &long]), &mut out));
        assert!(out.contains("exceeds 100 characters"));

        assert!(table.is_empty());
    }

    #[test]
    fn test_select_with_condition() {
        let mut table = keyed_table();
        insert_ok(&mut table, &["3", "c"]);
        insert_ok(&mut table, &["1", "a"]);
        insert_ok(&mut table, &["2", "b"]);

        let mut out = Output::new();
        let rows = table.select(Some("id >= 2 and name != \"c\""), &mut out);
        assert_eq!(ids(&rows), vec![2]);
    }

    #[test]
    fn test_index_bijection_after_mutations() {
        let mut table = keyed_table();
        for i in [5, 1, 4, 2, 3] {
            insert_ok(&mut table, &[&i.to_string(), "x"]);
        }
        let mut out = Output::new();
        table.delete(Some("id = 4 or id = 1"), &mut out);

        let index = table.index().unwrap();
        assert_eq!(index.len(), table.len());
        let mut indexed: Vec<String> = index
            .entries()
            .iter()
            .map(|(k, _)| k.to_string())
            .collect();
        let mut stored: Vec<String> = table
            .tuples()
            .iter()
            .map(|t| t.get(0).unwrap().to_string())
            .collect();
        indexed.sort();
        stored.sort();
        assert_eq!(indexed, stored);
    }

    #[test]
    fn test_update_skips_bad_position_but_counts_match() {
        let mut table = keyed_table();
        insert_ok(&mut table, &["1", "a"]);

        let mut out = Output::new();
        let patch = vec![Some("oops".to_string()), Some("b".to_string())];
        let updated = table.update(Some("id = 1"), &patch, &mut out);

        assert_eq!(updated, 1);
        assert!(out.contains("not a valid integer"));
        // id kept, name still applied
        let mut out = Output::new();
        let rows = table.select(None, &mut out);
        assert_eq!(rows[0].get(0), Some(&Value::Int(1)));
        assert_eq!(rows[0].get(1), Some(&Value::Text("b".to_string())));
    }

    #[test]
    fn test_update_rekeys_index() {
        let mut table = keyed_table();
        insert_ok(&mut table, &["1", "a"]);
        insert_ok(&mut table, &["2", "b"]);

        let mut out = Output::new();
        let patch = vec![Some("9".to_string()), None];
        table.update(Some("id = 1"), &patch, &mut out);

        let mut out = Output::new();
        assert_eq!(ids(&table.select(None, &mut out)), vec![2, 9]);
        let index = table.index().unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.search(&IndexKey::new(Value::Int(1))).is_none());
    }

    #[test]
    fn test_update_rejects_duplicate_key() {
        let mut table = keyed_table();
        insert_ok(&mut table, &["1", "a"]);
        insert_ok(&mut table, &["2", "b"]);

        let mut out = Output::new();
        let patch = vec![Some("2".to_string()), None];
        let updated = table.update(Some("id = 1"), &patch, &mut out);

        assert_eq!(updated, 1);
        assert!(out.contains("Duplicate primary key value: 2"));
        let mut out = Output::new();
        assert_eq!(ids(&table.select(None, &mut out)), vec![1, 2]);
    }

    #[test]
    fn test_delete_all_resets_index() {
        let mut table = keyed_table();
        insert_ok(&mut table, &["1", "a"]);
        insert_ok(&mut table, &["2", "b"]);

        let mut out = Output::new();
        assert_eq!(table.delete(None, &mut out), 2);
        assert!(table.is_empty());
        assert!(table.index().unwrap().is_empty());
    }

    #[test]
    fn test_conditional_delete_returns_count() {
        let mut table = keyed_table();
        for i in 1..=4 {
            insert_ok(&mut table, &[&i.to_string(), "x"]);
        }

        let mut out = Output::new();
        assert_eq!(table.delete(Some("id > 2"), &mut out), 2);
        let mut out = Output::new();
        assert_eq!(ids(&table.select(None, &mut out)), vec![1, 2]);
    }

    #[test]
    fn test_rename_is_positional_and_idempotent() {
        let mut table = keyed_table();
        insert_ok(&mut table, &["1", "a"]);

        let mut out = Output::new();
        assert!(!table.rename_attributes(&raw(&["only"]), &mut out));

        let names = raw(&["key", "label"]);
        let mut out = Output::new();
        assert!(table.rename_attributes(&names, &mut out));
        assert!(table.rename_attributes(&names, &mut out));

        assert_eq!(table.schema().attribute(0).unwrap().name, "key");
        assert!(table.schema().attribute(0).unwrap().primary_key);
        let mut out = Output::new();
        assert_eq!(ids(&table.select(Some("key = 1"), &mut out)), vec![1]);
    }

    #[test]
    fn test_matches_condition_wrapper() {
        let mut table = keyed_table();
        insert_ok(&mut table, &["1", "a"]);
        let tuple = table.tuples()[0].clone();

        let mut out = Output::new();
        assert!(table.matches_condition(&tuple, "name = \"a\"", &mut out));
        assert!(!table.matches_condition(&tuple, "name = \"b\"", &mut out));

        assert!(!table.matches_condition(&tuple, "bogus = 1", &mut out));
        assert!(out.contains("Error parsing condition"));
    }

    #[test]
    fn test_malformed_condition_matches_nothing() {
        let mut table = keyed_table();
        insert_ok(&mut table, &["1", "a"]);

        let mut out = Output::new();
        let rows = table.select(Some("id @@ 1"), &mut out);
        assert!(rows.is_empty());
        assert!(out.contains("Error parsing condition"));
    }
}
