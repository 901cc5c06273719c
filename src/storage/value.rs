//! Typed values for FernDB
//!
//! This module defines how data values are represented in memory. Literals
//! are parsed into the owning attribute's declared domain at insert/update
//! time, so the stored representation is always typed.

use crate::catalog::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters a stored text value may hold
pub const MAX_TEXT_LEN: usize = 100;

/// A value in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Integer value (32-bit signed)
    Int(i32),
    /// Float value (64-bit)
    Float(f64),
    /// Text value
    Text(String),
}

/// Why a raw literal failed to enter a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// Not parseable as a 32-bit signed integer
    NotAnInteger,
    /// Not parseable as a double
    NotAFloat,
    /// Text longer than [`MAX_TEXT_LEN`] characters
    TextTooLong,
}

impl Value {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Parse a raw literal into the given domain
    pub fn parse(raw: &str, data_type: DataType) -> Result<Value, DomainError> {
        match data_type {
            DataType::Integer => raw
                .trim()
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|_| DomainError::NotAnInteger),
            DataType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| DomainError::NotAFloat),
            DataType::Text => {
                if raw.chars().count() > MAX_TEXT_LEN {
                    Err(DomainError::TextTooLong)
                } else {
                    Ok(Value::Text(raw.to_string()))
                }
            }
        }
    }

    /// Try to read this value as a 32-bit integer
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to read this value as a double
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    /// Try to render this value as text (NULL has no text form)
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// True when the displayed form is empty after trimming whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_parsing() {
        assert_eq!(Value::parse("42", DataType::Integer), Ok(Value::Int(42)));
        assert_eq!(Value::parse("-7", DataType::Integer), Ok(Value::Int(-7)));
        assert_eq!(
            Value::parse("4.5", DataType::Integer),
            Err(DomainError::NotAnInteger)
        );
        assert_eq!(
            Value::parse("2147483648", DataType::Integer),
            Err(DomainError::NotAnInteger)
        );

        assert_eq!(Value::parse("2.5", DataType::Float), Ok(Value::Float(2.5)));
        assert_eq!(Value::parse("3", DataType::Float), Ok(Value::Float(3.0)));
        assert_eq!(
            Value::parse("abc", DataType::Float),
            Err(DomainError::NotAFloat)
        );

        assert_eq!(
            Value::parse("hello", DataType::Text),
            Ok(Value::Text("hello".to_string()))
        );
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        assert_eq!(
            Value::parse(&long, DataType::Text),
            Err(DomainError::TextTooLong)
        );
    }

    #[test]
    fn test_coercions() {
        assert_eq!(Value::Text("12".to_string()).as_int(), Some(12));
        assert_eq!(Value::Float(1.5).as_int(), None);
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::Int(3).as_text(), Some("3".to_string()));
        assert_eq!(Value::Null.as_text(), None);
    }

    #[test]
    fn test_blank_detection() {
        assert!(Value::Null.is_blank());
        assert!(Value::Text("   ".to_string()).is_blank());
        assert!(!Value::Text("a".to_string()).is_blank());
        assert!(!Value::Int(0).is_blank());
    }
}
