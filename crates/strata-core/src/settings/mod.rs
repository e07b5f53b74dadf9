//! Settings subsystem with level hierarchy, validation, and caching
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): definitions, builder, registry, resolved views
//! - **Rules** (`rules.rs`): validation rule expressions
//! - **Catalog** (`catalog.rs`): YAML catalog loading
//! - **Levels** (`levels.rs`): precedence order and entity id resolution
//! - **Cache** (`cache.rs`): time-windowed memoization of aggregate reads
//! - **Service** (`service.rs`): resolution engine
//! - **Mutation** (`mutation.rs`): validated write path
//! - **Schema** (`schema.rs`): grouped and inheritance-chain views
//! - **Handler** (`handler.rs`): HTTP API endpoints
//!
//! # Precedence
//!
//! A USER override beats a FACILITY override, which beats a SYSTEM override,
//! which beats the catalog default.

pub mod cache;
pub mod catalog;
pub mod handler;
pub mod levels;
pub mod mutation;
pub mod rules;
pub mod schema;
pub mod service;
pub mod types;

pub use types::{
	FrozenSettingsRegistry, ResolvedSetting, SettingDefinition, SettingDefinitionBuilder,
	SettingOption, SettingSource, SettingsRegistry,
};

// vim: ts=4
