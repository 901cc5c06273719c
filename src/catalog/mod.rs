//! Catalog module
//!
//! This module contains the databases, schema definitions, attribute
//! domains, and snapshot persistence.

pub mod catalog;
pub mod database;
pub mod schema;
pub mod types;

pub use catalog::Catalog;
pub use database::Database;
pub use schema::{Attribute, Schema};
pub use types::DataType;
