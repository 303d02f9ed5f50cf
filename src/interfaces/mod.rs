//! Adapters between the CLI's files and the domain types.

pub mod csv;
pub mod json;
