//! Shared types, adapter traits, and core utilities for the Strata settings engine.
//!
//! This crate holds everything that both the engine and the storage adapters
//! need to agree on: the error taxonomy, setting levels, the value type
//! registry and the persistent store contract. Keeping it separate lets
//! adapter crates build without pulling in the engine.

#![forbid(unsafe_code)]

pub mod error;
pub mod level;
pub mod prelude;
pub mod store_adapter;
pub mod types;
pub mod value;

// vim: ts=4
