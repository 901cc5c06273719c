//! Command execution module

pub mod executor;

pub use executor::{Executor, Flow, STATE_FILE};
