//! Runtime configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::default_catalog;
use crate::prelude::*;
use crate::settings::catalog;
use crate::settings::{FrozenSettingsRegistry, SettingsRegistry};

#[derive(Debug, Clone)]
pub struct SettingsConfig {
	/// Lifetime of a cached aggregate read. Zero disables caching.
	pub cache_duration: Duration,
	/// Number of principals kept in the aggregate cache
	pub cache_capacity: usize,
	/// YAML catalog; the built-in catalog is used when unset
	pub catalog_path: Option<PathBuf>,
	pub db_path: PathBuf,
	pub listen: Box<str>,
}

impl Default for SettingsConfig {
	fn default() -> Self {
		Self {
			cache_duration: Duration::from_secs(3600),
			cache_capacity: 1024,
			catalog_path: None,
			db_path: PathBuf::from("./data/settings.db"),
			listen: "127.0.0.1:8080".into(),
		}
	}
}

fn parse_var<T: std::str::FromStr>(name: &str) -> ClResult<Option<T>> {
	match env::var(name) {
		Ok(raw) => raw
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| Error::ConfigError(format!("{} is not a valid number: '{}'", name, raw))),
		Err(_) => Ok(None),
	}
}

impl SettingsConfig {
	/// Defaults overridden by `SETTINGS_*` environment variables
	pub fn from_env() -> ClResult<Self> {
		let mut config = Self::default();
		if let Some(secs) = parse_var::<u64>("SETTINGS_CACHE_DURATION")? {
			config.cache_duration = Duration::from_secs(secs);
		}
		if let Some(capacity) = parse_var::<usize>("SETTINGS_CACHE_CAPACITY")? {
			config.cache_capacity = capacity;
		}
		if let Ok(path) = env::var("SETTINGS_CATALOG") {
			config.catalog_path = Some(PathBuf::from(path));
		}
		if let Ok(path) = env::var("SETTINGS_DB") {
			config.db_path = PathBuf::from(path);
		}
		if let Ok(listen) = env::var("SETTINGS_LISTEN") {
			config.listen = listen.into();
		}
		Ok(config)
	}

	/// Build the catalog from the configured source and freeze it
	pub async fn load_registry(&self) -> ClResult<FrozenSettingsRegistry> {
		let mut registry = SettingsRegistry::new();
		match &self.catalog_path {
			Some(path) => {
				catalog::load_yaml_file(&mut registry, path).await?;
			}
			None => default_catalog::register_settings(&mut registry)?,
		}
		Ok(registry.freeze())
	}
}


// vim: ts=4
