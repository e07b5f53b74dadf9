//! Hierarchical settings resolution engine.
//!
//! Settings are declared once in a catalog and may be overridden at three
//! levels: system, facility and user. Reads walk the allowed levels from the
//! most specific one down and fall back to the catalog default; writes are
//! validated against the catalog before they reach the store.
//!
//! # Modules
//!
//! - **settings**: catalog, level hierarchy, resolution, mutation, schema views, HTTP handlers
//! - **default_catalog**: the built-in set of setting definitions
//! - **config**: runtime configuration read from the environment

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod default_catalog;
pub mod prelude;
pub mod settings;

pub use config::SettingsConfig;
pub use settings::service::SettingsService;

// vim: ts=4
