//! Command AST for FernDB
//!
//! This module defines the parsed form of every top-level command.

use crate::catalog::Attribute;

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// CREATE DATABASE name
    CreateDatabase { name: String },
    /// USE name
    Use { name: String },
    /// CREATE TABLE name ( attr dom [PRIMARY KEY], ... )
    CreateTable {
        name: String,
        attributes: Vec<Attribute>,
    },
    /// DESCRIBE name | DESCRIBE ALL
    Describe(DescribeTarget),
    /// SELECT cols FROM tables [WHERE cond]
    Select(SelectQuery),
    /// LET table KEY attr <SELECT ...>
    Let {
        table: String,
        key: String,
        query: SelectQuery,
    },
    /// RENAME table ( n1, n2, ... )
    Rename { table: String, names: Vec<String> },
    /// INSERT table VALUES ( v1, v2, ... )
    Insert { table: String, values: Vec<String> },
    /// UPDATE table SET a=v [, a=v ...] [WHERE cond]
    Update {
        table: String,
        assignments: Vec<Assignment>,
        condition: Option<String>,
    },
    /// DELETE table [WHERE cond]
    Delete {
        table: String,
        condition: Option<String>,
    },
    /// SHOW DATABASES | SHOW TABLES | SHOW RECORDS table
    Show(ShowTarget),
    /// INPUT file [OUTPUT file]
    Input {
        file: String,
        output: Option<String>,
    },
    /// EXIT
    Exit,
}

/// Target of a DESCRIBE command
#[derive(Debug, Clone, PartialEq)]
pub enum DescribeTarget {
    All,
    Table(String),
}

/// Target of a SHOW command
#[derive(Debug, Clone, PartialEq)]
pub enum ShowTarget {
    Databases,
    Tables,
    Records(String),
}

/// The body of a SELECT (also the inner query of LET)
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Projected column names as written
    pub columns: Vec<String>,
    /// Source tables in listed order
    pub tables: Vec<String>,
    /// Raw WHERE condition, parsed later against the relevant schema
    pub condition: Option<String>,
}

/// One `attr = value` pair of an UPDATE's SET clause
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub attribute: String,
    pub value: String,
}
