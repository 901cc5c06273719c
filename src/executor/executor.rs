//! Command executor for FernDB
//!
//! Maps each parsed command to operations on the catalog and its tables.
//! Multi-table SELECTs build the cross product of the listed tables and
//! evaluate the WHERE condition against a combined schema whose attribute
//! names are qualified as `table.attr`. On EXIT the whole catalog is
//! snapshotted to disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::{Attribute, Catalog, Database, Schema};
use crate::output::Output;
use crate::sql::ast::{Assignment, Command, DescribeTarget, SelectQuery, ShowTarget};
use crate::sql::condition::Condition;
use crate::sql::parser;
use crate::storage::{Table, Tuple, Value};

/// Default snapshot file, looked up in the working directory
pub const STATE_FILE: &str = "dbms_state.ser";

/// What the caller should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep accepting commands
    Continue,
    /// Terminate the process with this exit code
    Exit(i32),
}

/// The evaluated form of a SELECT, before printing or materialization.
/// `attrs[i]` is the source attribute column `i` resolved to, or `None` when
/// the name matched nothing (SELECT prints NULL there; LET refuses).
struct SelectResult {
    columns: Vec<String>,
    attrs: Vec<Option<Attribute>>,
    rows: Vec<Tuple>,
}

/// Command executor: owns the catalog and the snapshot location
pub struct Executor {
    catalog: Catalog,
    state_path: PathBuf,
}

impl Executor {
    /// Create an executor with the default snapshot path
    pub fn new(catalog: Catalog) -> Self {
        Self::with_state_path(catalog, STATE_FILE)
    }

    /// Create an executor snapshotting to the given path
    pub fn with_state_path(catalog: Catalog, state_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            state_path: state_path.into(),
        }
    }

    /// The catalog (primarily for tests and the shell)
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Where EXIT writes the snapshot
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Parse and run one command, reporting a parse failure as a diagnostic
    pub fn run(&mut self, text: &str, out: &mut Output) -> Flow {
        match parser::parse(text) {
            Ok(command) => {
                debug!(command = ?command, "executing");
                self.execute(command, out)
            }
            Err(e) => {
                out.line(format!("Error executing command: {}", e));
                Flow::Continue
            }
        }
    }

    /// Run one parsed command
    pub fn execute(&mut self, command: Command, out: &mut Output) -> Flow {
        match command {
            Command::CreateDatabase { name } => {
                self.catalog.create_database(&name, out);
            }
            Command::Use { name } => {
                self.catalog.use_database(&name, out);
            }
            Command::CreateTable { name, attributes } => {
                self.execute_create_table(&name, attributes, out);
            }
            Command::Describe(target) => self.execute_describe(target, out),
            Command::Select(query) => self.execute_select(&query, out),
            Command::Let { table, key, query } => self.execute_let(&table, &key, &query, out),
            Command::Rename { table, names } => self.execute_rename(&table, &names, out),
            Command::Insert { table, values } => self.execute_insert(&table, &values, out),
            Command::Update {
                table,
                assignments,
                condition,
            } => self.execute_update(&table, &assignments, condition.as_deref(), out),
            Command::Delete { table, condition } => {
                self.execute_delete(&table, condition.as_deref(), out)
            }
            Command::Show(target) => self.execute_show(target, out),
            Command::Input { file, output } => {
                return self.execute_input(&file, output.as_deref(), out)
            }
            Command::Exit => return self.execute_exit(out),
        }
        Flow::Continue
    }

    // ========== DDL ==========

    fn execute_create_table(&mut self, name: &str, attributes: Vec<Attribute>, out: &mut Output) {
        let Some(db) = self.catalog.current_mut() else {
            out.line("Error: No database selected. Use the USE command first.");
            return;
        };
        db.add_table(Table::new(name, Schema::new(attributes)), out);
    }

    fn execute_describe(&self, target: DescribeTarget, out: &mut Output) {
        let Some(db) = self.current_db(out) else {
            return;
        };
        match target {
            DescribeTarget::All => {
                for name in db.table_names() {
                    if let Some(table) = db.table(name, out) {
                        print_table_schema(table, out);
                    }
                }
            }
            DescribeTarget::Table(name) => {
                if let Some(table) = db.table(&name, out) {
                    print_table_schema(table, out);
                }
            }
        }
    }

    fn execute_rename(&mut self, table: &str, names: &[String], out: &mut Output) {
        let Some(db) = self.current_db_mut(out) else {
            return;
        };
        if let Some(table) = db.table_mut(table, out) {
            table.rename_attributes(names, out);
        }
    }

    // ========== DML ==========

    fn execute_insert(&mut self, table: &str, values: &[String], out: &mut Output) {
        let Some(db) = self.current_db_mut(out) else {
            return;
        };
        if let Some(table) = db.table_mut(table, out) {
            table.insert(values, out);
        }
    }

    fn execute_update(
        &mut self,
        table_name: &str,
        assignments: &[Assignment],
        condition: Option<&str>,
        out: &mut Output,
    ) {
        let Some(db) = self.current_db_mut(out) else {
            return;
        };
        let Some(table) = db.table_mut(table_name, out) else {
            return;
        };

        let mut patch: Vec<Option<String>> = vec![None; table.schema().len()];
        for assignment in assignments {
            match table.schema().index_of(&assignment.attribute) {
                Some(position) => patch[position] = Some(assignment.value.clone()),
                None => out.line(format!(
                    "Error: Attribute '{}' does not exist in table '{}'.",
                    assignment.attribute, table_name
                )),
            }
        }

        table.update(condition, &patch, out);
    }

    fn execute_delete(&mut self, table: &str, condition: Option<&str>, out: &mut Output) {
        let Some(db) = self.current_db_mut(out) else {
            return;
        };
        match condition {
            // No WHERE clause: drop the table itself, schema and all.
            None => {
                if db.table(table, out).is_some() {
                    db.delete_table(table, out);
                    out.line(format!(
                        "Table '{}' and all its records were deleted.",
                        table
                    ));
                }
            }
            Some(condition) => {
                if let Some(table) = db.table_mut(table, out) {
                    table.delete(Some(condition), out);
                }
            }
        }
    }

    // ========== SELECT / LET ==========

    fn execute_select(&self, query: &SelectQuery, out: &mut Output) {
        let Some(result) = self.run_select(query, out) else {
            return;
        };
        if result.rows.is_empty() {
            out.line("Nothing found.");
            return;
        }

        out.line(result.columns.join("\t"));
        for (number, row) in result.rows.iter().enumerate() {
            out.line(format!("{}.\t{}", number + 1, render_row(row)));
        }
    }

    fn execute_let(&mut self, table_name: &str, key: &str, query: &SelectQuery, out: &mut Output) {
        if self.current_db(out).is_none() {
            return;
        }
        out.line(format!(
            "Executing LET command: storing result into table '{}' with key '{}'.",
            table_name, key
        ));

        let Some(result) = self.run_select(query, out) else {
            return;
        };

        // The new table keeps exactly the projected columns, with table
        // qualifiers stripped; the key attribute must be one of them.
        let key_name = strip_qualifier(key);
        let mut attributes = Vec::with_capacity(result.columns.len());
        let mut key_found = false;
        for (column, attr) in result.columns.iter().zip(&result.attrs) {
            let Some(attr) = attr else {
                out.line(format!(
                    "Error: Column '{}' not found in SELECT result.",
                    column
                ));
                return;
            };
            let clean_name = strip_qualifier(&attr.name);
            let is_key = !key_found && clean_name.eq_ignore_ascii_case(key_name);
            if is_key {
                key_found = true;
            }
            attributes.push(Attribute::new(clean_name, attr.data_type, is_key));
        }
        if !key_found {
            out.line(format!(
                "Error: Key attribute '{}' not found in SELECT result.",
                key
            ));
            return;
        }

        // Materialize through the standard insert path so the new table's
        // index is populated and constraints enforced.
        let mut table = Table::new(table_name, Schema::new(attributes));
        for row in &result.rows {
            let raw: Vec<String> = row.values().iter().map(|v| v.to_string()).collect();
            table.insert(&raw, out);
        }

        let record_count = table.len();
        let Some(db) = self.catalog.current_mut() else {
            return;
        };
        db.add_table(table, out);
        out.line(format!(
            "LET: Table '{}' created with {} record(s).",
            table_name, record_count
        ));
    }

    /// Evaluate a SELECT body into resolved columns and projected rows.
    /// Returns None when a referenced database or table is missing (the
    /// diagnostic has already been emitted).
    fn run_select(&self, query: &SelectQuery, out: &mut Output) -> Option<SelectResult> {
        let db = self.current_db(out)?;
        if query.tables.len() > 1 {
            self.run_join_select(db, query, out)
        } else {
            self.run_single_select(db, query, out)
        }
    }

    fn run_single_select(
        &self,
        db: &Database,
        query: &SelectQuery,
        out: &mut Output,
    ) -> Option<SelectResult> {
        let table_name = query.tables.first().map(String::as_str).unwrap_or("");
        let table = db.table(table_name, out)?;
        let schema = table.schema();

        let records = table.select(query.condition.as_deref(), out);

        let positions: Vec<Option<usize>> = query
            .columns
            .iter()
            .map(|column| schema.index_of(column))
            .collect();
        let attrs = positions
            .iter()
            .map(|p| p.and_then(|i| schema.attribute(i)).cloned())
            .collect();
        let rows = records
            .iter()
            .map(|tuple| project(tuple, &positions))
            .collect();

        Some(SelectResult {
            columns: query.columns.clone(),
            attrs,
            rows,
        })
    }

    fn run_join_select(
        &self,
        db: &Database,
        query: &SelectQuery,
        out: &mut Output,
    ) -> Option<SelectResult> {
        let mut tables = Vec::with_capacity(query.tables.len());
        for name in &query.tables {
            tables.push((name.as_str(), db.table(name, out)?));
        }

        // Combined schema with attribute names qualified by table name.
        let mut combined_attrs = Vec::new();
        for (name, table) in &tables {
            for attr in table.schema().attributes() {
                combined_attrs.push(Attribute::new(
                    format!("{}.{}", name, attr.name),
                    attr.data_type,
                    attr.primary_key,
                ));
            }
        }
        let combined = Schema::new(combined_attrs);

        let joined = cross_product(&tables);
        let matching: Vec<&Tuple> = match query.condition.as_deref() {
            None => joined.iter().collect(),
            Some(condition) => match Condition::parse(condition, &combined) {
                Ok(parsed) => joined
                    .iter()
                    .filter(|t| parsed.evaluate(t, &combined, out))
                    .collect(),
                Err(e) => {
                    out.line(format!(
                        "Error evaluating condition on joined record: {}",
                        e
                    ));
                    Vec::new()
                }
            },
        };

        let positions: Vec<Option<usize>> = query
            .columns
            .iter()
            .map(|column| index_in_combined(&combined, column))
            .collect();
        let attrs = positions
            .iter()
            .map(|p| p.and_then(|i| combined.attribute(i)).cloned())
            .collect();
        let rows = matching
            .iter()
            .map(|tuple| project(tuple, &positions))
            .collect();

        Some(SelectResult {
            columns: query.columns.clone(),
            attrs,
            rows,
        })
    }

    // ========== SHOW ==========

    fn execute_show(&self, target: ShowTarget, out: &mut Output) {
        match target {
            ShowTarget::Databases => {
                let names = self.catalog.database_names();
                if names.is_empty() {
                    out.line("No databases available.");
                } else {
                    out.line("Databases:");
                    for name in names {
                        out.line(format!(" - {}", name));
                    }
                }
            }
            ShowTarget::Tables => {
                let Some(db) = self.current_db(out) else {
                    return;
                };
                let names = db.table_names();
                if names.is_empty() {
                    out.line("No tables in the current database.");
                } else {
                    out.line(format!("Tables in database '{}':", db.name()));
                    for name in names {
                        out.line(format!(" - {}", name));
                    }
                }
            }
            ShowTarget::Records(name) => {
                let Some(db) = self.current_db(out) else {
                    return;
                };
                let Some(table) = db.table(&name, out) else {
                    return;
                };
                let records = table.select(None, out);
                if records.is_empty() {
                    out.line(format!("Table '{}' is empty.", name));
                    return;
                }

                out.line(format!("Records of table '{}':", name));
                out.line("  ------------------------------------");
                let header: Vec<&str> = table
                    .schema()
                    .attributes()
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect();
                out.line(format!("\t{}", header.join("\t")));
                out.line("  ------------------------------------");
                for (number, record) in records.iter().enumerate() {
                    out.line(format!("{}.\t{}", number + 1, render_row(record)));
                }
                out.line("  ------------------------------------");
            }
        }
    }

    // ========== INPUT / EXIT ==========

    fn execute_input(&mut self, file: &str, output: Option<&str>, out: &mut Output) -> Flow {
        let commands = match read_command_lines(file) {
            Ok(commands) => commands,
            Err(e) => {
                out.line(format!("Error: Could not read input file '{}': {}", file, e));
                return Flow::Continue;
            }
        };

        let mut log = Vec::with_capacity(commands.len());
        let mut flow = Flow::Continue;
        for text in commands {
            match parser::parse(&text) {
                Ok(command) => {
                    let command_flow = self.execute(command, out);
                    log.push(format!("Executed: {}", text));
                    if command_flow != Flow::Continue {
                        flow = command_flow;
                        break;
                    }
                }
                Err(e) => {
                    log.push(format!("Error executing command: {} - {}", text, e));
                }
            }
        }

        if let Some(output_file) = output {
            let mut body = log.join("\n");
            body.push('\n');
            match std::fs::write(output_file, body) {
                Ok(()) => out.line(format!("Output written to {}", output_file)),
                Err(e) => out.line(format!(
                    "Error: Could not write output file '{}': {}",
                    output_file, e
                )),
            }
        }
        flow
    }

    fn execute_exit(&mut self, out: &mut Output) -> Flow {
        match self.catalog.save(&self.state_path) {
            Ok(()) => {
                out.line("Exiting DBMS. State has been saved.");
                Flow::Exit(0)
            }
            Err(e) => {
                out.line(format!("Error saving state: {}", e));
                out.line("Exiting DBMS.");
                Flow::Exit(1)
            }
        }
    }

    // ========== Helpers ==========

    fn current_db(&self, out: &mut Output) -> Option<&Database> {
        let db = self.catalog.current();
        if db.is_none() {
            out.line("Error: No database selected.");
        }
        db
    }

    fn current_db_mut(&mut self, out: &mut Output) -> Option<&mut Database> {
        if self.catalog.current().is_none() {
            out.line("Error: No database selected.");
            return None;
        }
        self.catalog.current_mut()
    }
}

/// Cross product of the tables' tuple sequences, in listed order
fn cross_product(tables: &[(&str, &Table)]) -> Vec<Tuple> {
    let mut rows = vec![Tuple::empty()];
    for (_, table) in tables {
        let mut next = Vec::with_capacity(rows.len() * table.len());
        for prefix in &rows {
            for tuple in table.tuples() {
                next.push(prefix.concat(tuple));
            }
        }
        rows = next;
    }
    rows
}

/// Resolve a projected column against a combined schema: exact qualified
/// match first, then unqualified suffix match.
fn index_in_combined(schema: &Schema, column: &str) -> Option<usize> {
    if let Some(position) = schema.index_of(column) {
        return Some(position);
    }
    schema.attributes().iter().position(|attr| {
        attr.name
            .split_once('.')
            .is_some_and(|(_, suffix)| suffix.eq_ignore_ascii_case(column))
    })
}

/// Project a tuple down to the resolved positions; unresolved columns
/// become NULL.
fn project(tuple: &Tuple, positions: &[Option<usize>]) -> Tuple {
    positions
        .iter()
        .map(|position| {
            position
                .and_then(|i| tuple.get(i).cloned())
                .unwrap_or(Value::Null)
        })
        .collect()
}

fn render_row(tuple: &Tuple) -> String {
    let cells: Vec<String> = tuple.values().iter().map(|v| v.to_string()).collect();
    cells.join("\t")
}

fn print_table_schema(table: &Table, out: &mut Output) {
    out.line(format!("Table: {}", table.name()));
    for attr in table.schema().attributes() {
        let marker = if attr.primary_key { " (PRIMARY KEY)" } else { "" };
        out.line(format!(" - {} : {}{}", attr.name, attr.data_type, marker));
    }
}

/// Strip a leading `table.` qualifier from an attribute name
fn strip_qualifier(name: &str) -> &str {
    match name.split_once('.') {
        Some((_, suffix)) => suffix,
        None => name,
    }
}

/// Read one command per non-empty line from a file
fn read_command_lines(file: &str) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(file)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor() -> Executor {
        Executor::with_state_path(Catalog::new(), "test_state_unused.ser")
    }

    fn run_all(executor: &mut Executor, commands: &[&str]) -> Vec<String> {
        let mut out = Output::new();
        for command in commands {
            executor.run(command, &mut out);
        }
        out.take()
    }

    fn seeded() -> Executor {
        let mut exec = executor();
        run_all(
            &mut exec,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (id INTEGER PRIMARY KEY, n TEXT)",
                "INSERT t VALUES (3, \"c\")",
                "INSERT t VALUES (1, \"a\")",
                "INSERT t VALUES (2, \"b\")",
            ],
        );
        exec
    }

    #[test]
    fn test_select_orders_by_key() {
        let mut exec = seeded();
        let lines = run_all(&mut exec, &["SELECT id, n FROM t"]);

        assert_eq!(
            lines,
            vec![
                "id\tn".to_string(),
                "1.\t1\ta".to_string(),
                "2.\t2\tb".to_string(),
                "3.\t3\tc".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicate_key_insert_leaves_table_intact() {
        let mut exec = seeded();
        let lines = run_all(&mut exec, &["INSERT t VALUES (1, \"x\")"]);
        assert!(lines.iter().any(|l| l.contains("Duplicate primary key")));

        let lines = run_all(&mut exec, &["SELECT id FROM t"]);
        assert_eq!(lines[1..], ["1.\t1", "2.\t2", "3.\t3"]);
    }

    #[test]
    fn test_compound_condition() {
        let mut exec = seeded();
        let lines = run_all(&mut exec, &["SELECT id FROM t WHERE id >= 2 AND n != \"c\""]);
        assert_eq!(lines, vec!["id".to_string(), "1.\t2".to_string()]);
    }

    #[test]
    fn test_select_empty_prints_nothing_found() {
        let mut exec = seeded();
        let lines = run_all(&mut exec, &["SELECT id FROM t WHERE id > 99"]);
        assert_eq!(lines, vec!["Nothing found.".to_string()]);
    }

    #[test]
    fn test_cross_product_join() {
        let mut exec = executor();
        run_all(
            &mut exec,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE a (x INTEGER PRIMARY KEY)",
                "CREATE TABLE b (y INTEGER)",
                "INSERT a VALUES (1)",
                "INSERT a VALUES (2)",
                "INSERT b VALUES (10)",
                "INSERT b VALUES (20)",
            ],
        );

        let lines = run_all(&mut exec, &["SELECT a.x, b.y FROM a, b WHERE a.x < b.y"]);
        assert_eq!(
            lines,
            vec![
                "a.x\tb.y".to_string(),
                "1.\t1\t10".to_string(),
                "2.\t1\t20".to_string(),
                "3.\t2\t10".to_string(),
                "4.\t2\t20".to_string(),
            ]
        );
    }

    #[test]
    fn test_join_projection_falls_back_to_suffix() {
        let mut exec = executor();
        run_all(
            &mut exec,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE a (x INTEGER PRIMARY KEY)",
                "CREATE TABLE b (y INTEGER)",
                "INSERT a VALUES (1)",
                "INSERT b VALUES (10)",
            ],
        );

        let lines = run_all(&mut exec, &["SELECT x, y FROM a, b"]);
        assert_eq!(lines[1], "1.\t1\t10");
    }

    #[test]
    fn test_delete_without_where_drops_table() {
        let mut exec = seeded();
        let lines = run_all(&mut exec, &["DELETE t", "DESCRIBE t"]);

        assert!(lines
            .iter()
            .any(|l| l == "Table 't' and all its records were deleted."));
        assert!(lines
            .iter()
            .any(|l| l == "Error: Table 't' does not exist in database 'd'."));
    }

    #[test]
    fn test_delete_with_where_keeps_table() {
        let mut exec = seeded();
        run_all(&mut exec, &["DELETE t WHERE id = 2"]);
        let lines = run_all(&mut exec, &["SELECT id FROM t"]);
        assert_eq!(lines[1..], ["1.\t1", "2.\t3"]);
    }

    #[test]
    fn test_update_through_executor() {
        let mut exec = seeded();
        let lines = run_all(&mut exec, &["UPDATE t SET n=\"z\" WHERE id >= 2"]);
        assert!(lines.iter().any(|l| l == "2 record(s) updated in table 't'."));

        let lines = run_all(&mut exec, &["SELECT n FROM t WHERE id = 3"]);
        assert_eq!(lines[1], "1.\tz");
    }

    #[test]
    fn test_let_materializes_with_key() {
        let mut exec = seeded();
        let lines = run_all(&mut exec, &["LET t2 KEY id <SELECT id, n FROM t WHERE id > 1>"]);
        assert!(lines
            .iter()
            .any(|l| l == "LET: Table 't2' created with 2 record(s)."));

        let lines = run_all(&mut exec, &["SELECT id FROM t2"]);
        assert_eq!(lines[1..], ["1.\t2", "2.\t3"]);

        // the key is enforced in the new table
        let lines = run_all(&mut exec, &["INSERT t2 VALUES (2, \"dup\")"]);
        assert!(lines.iter().any(|l| l.contains("Duplicate primary key")));
    }

    #[test]
    fn test_let_requires_key_in_projection() {
        let mut exec = seeded();
        let lines = run_all(&mut exec, &["LET t2 KEY id <SELECT n FROM t>"]);
        assert!(lines
            .iter()
            .any(|l| l == "Error: Key attribute 'id' not found in SELECT result."));

        let lines = run_all(&mut exec, &["SHOW TABLES"]);
        assert!(!lines.iter().any(|l| l.contains("t2")));
    }

    #[test]
    fn test_describe_and_show() {
        let mut exec = seeded();
        let lines = run_all(&mut exec, &["DESCRIBE t"]);
        assert_eq!(
            lines,
            vec![
                "Table: t".to_string(),
                " - id : INTEGER (PRIMARY KEY)".to_string(),
                " - n : TEXT".to_string(),
            ]
        );

        let lines = run_all(&mut exec, &["SHOW DATABASES", "SHOW TABLES"]);
        assert!(lines.contains(&"Databases:".to_string()));
        assert!(lines.contains(&" - d".to_string()));
        assert!(lines.contains(&"Tables in database 'd':".to_string()));
        assert!(lines.contains(&" - t".to_string()));
    }

    #[test]
    fn test_show_records_uses_key_order() {
        let mut exec = seeded();
        let lines = run_all(&mut exec, &["SHOW RECORDS t"]);
        let rows: Vec<&str> = lines
            .iter()
            .filter(|l| l.contains(".\t"))
            .map(String::as_str)
            .collect();
        assert_eq!(rows, ["1.\t1\ta", "2.\t2\tb", "3.\t3\tc"]);
    }

    #[test]
    fn test_commands_require_database_selection() {
        let mut exec = executor();
        let lines = run_all(&mut exec, &["CREATE TABLE t (id INTEGER)"]);
        assert_eq!(
            lines,
            vec!["Error: No database selected. Use the USE command first.".to_string()]
        );

        let lines = run_all(&mut exec, &["SELECT id FROM t"]);
        assert_eq!(lines, vec!["Error: No database selected.".to_string()]);
    }

    #[test]
    fn test_unknown_command_reported() {
        let mut exec = executor();
        let lines = run_all(&mut exec, &["FROBNICATE now"]);
        assert_eq!(
            lines,
            vec!["Error executing command: Command not supported: FROBNICATE now".to_string()]
        );
    }

    #[test]
    fn test_rename_composes() {
        let mut exec = seeded();
        run_all(&mut exec, &["RENAME t (key, label)"]);
        run_all(&mut exec, &["RENAME t (ident, name)"]);

        let lines = run_all(&mut exec, &["SELECT ident FROM t WHERE ident = 1"]);
        assert_eq!(lines[1..], ["1.\t1"]);
    }
}
