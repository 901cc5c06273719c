//! Index module
//!
//! This module contains the ordered primary-key index.

pub mod bst;

pub use bst::{BstIndex, IndexKey};
