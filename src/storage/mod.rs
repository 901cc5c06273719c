//! Storage module
//!
//! This module contains the in-memory storage components:
//! - Typed values
//! - Tuples
//! - Tables (schema, tuples, constraint checks, index maintenance)

pub mod table;
pub mod tuple;
pub mod value;

pub use table::Table;
pub use tuple::Tuple;
pub use value::{DomainError, Value, MAX_TEXT_LEN};
