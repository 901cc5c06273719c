//! Data types for FernDB
//!
//! This module defines the attribute domains supported by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared domain of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 32-bit signed integer
    Integer,
    /// Double-precision floating point
    Float,
    /// Character string, at most 100 characters when stored
    Text,
}

impl DataType {
    /// Try to parse a domain keyword (case-insensitive)
    pub fn from_keyword(s: &str) -> Option<DataType> {
        match s.to_uppercase().as_str() {
            "INTEGER" => Some(DataType::Integer),
            "FLOAT" => Some(DataType::Float),
            "TEXT" => Some(DataType::Text),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Text => write!(f, "TEXT"),
        }
    }
}
