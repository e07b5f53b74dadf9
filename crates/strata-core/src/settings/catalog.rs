//! Declarative catalog source (YAML)
//!
//! ```yaml
//! - key: language
//!   name: Language
//!   type: string
//!   default: en
//!   levels: [system, facility, user]
//!   validation: in:en,es
//!   group_path: [System, Localization]
//!   options:
//!     - { id: en, value: English }
//!   resettable: true
//! ```

use serde::Deserialize;
use std::path::Path;

use super::types::{SettingDefinition, SettingOption, SettingsRegistry};
use crate::prelude::*;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogEntry {
	key: String,
	name: Option<String>,
	description: Option<String>,
	#[serde(rename = "type", default = "default_type")]
	typ: String,
	#[serde(default)]
	default: serde_json::Value,
	levels: Option<Vec<SettingLevel>>,
	validation: Option<String>,
	#[serde(default)]
	group_path: Vec<String>,
	#[serde(default)]
	options: Vec<SettingOption>,
	#[serde(default)]
	resettable: bool,
}

fn default_type() -> String {
	"string".into()
}

impl CatalogEntry {
	fn into_definition(self) -> ClResult<SettingDefinition> {
		let typ: SettingType = self.typ.parse().map_err(|err| {
			Error::ConfigError(format!("Setting '{}': {}", self.key, err))
		})?;

		let mut builder = SettingDefinition::builder(self.key)
			.typ(typ)
			.default(SettingValue::from(self.default))
			.group_path(self.group_path)
			.options(self.options)
			.resettable(self.resettable);
		if let Some(levels) = self.levels {
			builder = builder.levels(levels);
		}
		if let Some(name) = self.name {
			builder = builder.name(name);
		}
		if let Some(description) = self.description {
			builder = builder.description(description);
		}
		if let Some(validation) = self.validation {
			builder = builder.validation(validation);
		}
		builder.build()
	}
}

/// Parse a YAML catalog document and register every entry
pub fn register_yaml(registry: &mut SettingsRegistry, source: &str) -> ClResult<usize> {
	let entries: Vec<CatalogEntry> = serde_yaml::from_str(source)
		.map_err(|err| Error::ConfigError(format!("Invalid settings catalog: {}", err)))?;

	let count = entries.len();
	for entry in entries {
		registry.register(entry.into_definition()?)?;
	}
	Ok(count)
}

/// Read a YAML catalog file and register every entry
pub async fn load_yaml_file(registry: &mut SettingsRegistry, path: &Path) -> ClResult<usize> {
	let source = tokio::fs::read_to_string(path).await.inspect_err(|err| {
		error!("Cannot read settings catalog {}: {}", path.display(), err);
	})?;
	let count = register_yaml(registry, &source)?;
	info!("Loaded {} setting definitions from {}", count, path.display());
	Ok(count)
}


// vim: ts=4
