//! Application layer orchestrating the post-processing paths.
//!
//! `PostprocessEngine` is the entry point: it runs the mileage path and the
//! fee path for every sale record, each behind its own duplicate check.

pub mod engine;
pub mod fee_handler;
pub mod mileage_handler;
