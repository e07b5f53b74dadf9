//! Settings types and definitions
//!
//! Core types for the settings catalog and the views the resolution engine produces.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use super::rules::RuleSet;
use crate::prelude::*;

/// Type alias for setting validator function
pub type SettingValidator = Box<dyn Fn(&SettingValue) -> ClResult<()> + Send + Sync>;

/// Enumerated choice shown for a setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingOption {
	pub id: String,
	pub value: String,
}

/// Lower-case, non-alphanumeric runs collapsed to a single `-`
pub fn slug(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		if c.is_alphanumeric() {
			out.extend(c.to_lowercase());
		} else if !out.is_empty() && !out.ends_with('-') {
			out.push('-');
		}
	}
	while out.ends_with('-') {
		out.pop();
	}
	out
}

/// Setting definition - static metadata for each recognized key
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingDefinition {
	/// Unique key (e.g., "number-of-decimals")
	pub key: String,

	/// Display name
	pub name: String,

	pub description: String,

	#[serde(rename = "type")]
	pub typ: SettingType,

	/// Default value, already coerced to `typ`
	#[serde(rename = "defaultValue")]
	pub default: SettingValue,

	/// Levels an override may be stored at, in declared order
	pub levels: Vec<SettingLevel>,

	/// Rule expression as declared
	#[serde(skip_serializing_if = "Option::is_none")]
	pub validation: Option<String>,

	#[serde(skip)]
	pub rules: RuleSet,

	/// Category labels, outermost first
	pub group_path: Vec<String>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<SettingOption>,

	/// Whether stored overrides are purged by a reset
	#[serde(rename = "isResettable")]
	pub resettable: bool,

	#[serde(skip)]
	pub validator: Option<SettingValidator>,
}

impl Debug for SettingDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingDefinition")
			.field("key", &self.key)
			.field("name", &self.name)
			.field("type", &self.typ)
			.field("default", &self.default)
			.field("levels", &self.levels)
			.field("validation", &self.validation)
			.field("group_path", &self.group_path)
			.field("options", &self.options.len())
			.field("resettable", &self.resettable)
			.field("validator", &self.validator.is_some())
			.finish_non_exhaustive()
	}
}

impl SettingDefinition {
	/// Create a builder for constructing a SettingDefinition
	pub fn builder(key: impl Into<String>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(key)
	}

	pub fn allows_level(&self, level: SettingLevel) -> bool {
		self.levels.contains(&level)
	}

	pub fn slug(&self) -> String {
		slug(&self.name)
	}

	/// Runs the rule expression, then the custom validator if present
	pub fn validate(&self, value: &SettingValue) -> ClResult<()> {
		self.rules
			.check(value)
			.map_err(|msg| Error::ValidationError(format!("{}: {}", self.key, msg)))?;
		if let Some(validator) = &self.validator {
			validator(value)?;
		}
		Ok(())
	}
}

/// Builder for SettingDefinition with fluent API
pub struct SettingDefinitionBuilder {
	key: String,
	name: Option<String>,
	description: Option<String>,
	typ: SettingType,
	default: SettingValue,
	levels: Vec<SettingLevel>,
	validation: Option<String>,
	group_path: Vec<String>,
	options: Vec<SettingOption>,
	resettable: bool,
	validator: Option<SettingValidator>,
}

impl SettingDefinitionBuilder {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			name: None,
			description: None,
			typ: SettingType::String,
			default: SettingValue::Null,
			levels: vec![SettingLevel::System],
			validation: None,
			group_path: Vec::new(),
			options: Vec::new(),
			resettable: false,
			validator: None,
		}
	}

	/// Display name (defaults to the key)
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Set the description (defaults to the name)
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn typ(mut self, typ: SettingType) -> Self {
		self.typ = typ;
		self
	}

	/// Set the default value (null if never set)
	pub fn default(mut self, value: impl Into<SettingValue>) -> Self {
		self.default = value.into();
		self
	}

	/// Levels an override may be stored at (defaults to system only)
	pub fn levels(mut self, levels: impl IntoIterator<Item = SettingLevel>) -> Self {
		self.levels = levels.into_iter().collect();
		self
	}

	/// Rule expression, e.g. `nullable|integer|min:0`
	pub fn validation(mut self, expr: impl Into<String>) -> Self {
		self.validation = Some(expr.into());
		self
	}

	pub fn group_path(mut self, path: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.group_path = path.into_iter().map(Into::into).collect();
		self
	}

	pub fn option(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
		self.options.push(SettingOption { id: id.into(), value: value.into() });
		self
	}

	pub fn options(mut self, options: impl IntoIterator<Item = SettingOption>) -> Self {
		self.options.extend(options);
		self
	}

	pub fn resettable(mut self, resettable: bool) -> Self {
		self.resettable = resettable;
		self
	}

	/// Set a validation function, run after the rule expression
	pub fn validator<F>(mut self, f: F) -> Self
	where
		F: Fn(&SettingValue) -> ClResult<()> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(f));
		self
	}

	/// Build the SettingDefinition
	pub fn build(self) -> ClResult<SettingDefinition> {
		if self.key.trim().is_empty() {
			return Err(Error::ConfigError("Setting key must not be empty".into()));
		}
		if self.levels.is_empty() {
			return Err(Error::ConfigError(format!(
				"Setting '{}' must allow at least one level",
				self.key
			)));
		}
		for (i, level) in self.levels.iter().enumerate() {
			if self.levels[..i].contains(level) {
				return Err(Error::ConfigError(format!(
					"Setting '{}' lists level '{}' twice",
					self.key, level
				)));
			}
		}

		let rules = match &self.validation {
			Some(expr) => RuleSet::parse(expr).map_err(|err| {
				Error::ConfigError(format!("Setting '{}' has an invalid rule: {}", self.key, err))
			})?,
			None => RuleSet::default(),
		};

		let default = self.typ.coerce(self.default).map_err(|err| {
			Error::ConfigError(format!("Setting '{}' has an invalid default: {}", self.key, err))
		})?;

		let name = self.name.unwrap_or_else(|| self.key.clone());
		Ok(SettingDefinition {
			description: self.description.unwrap_or_else(|| name.clone()),
			name,
			key: self.key,
			typ: self.typ,
			default,
			levels: self.levels,
			validation: self.validation,
			rules,
			group_path: self.group_path,
			options: self.options,
			resettable: self.resettable,
			validator: self.validator,
		})
	}
}

/// Mutable registry used during startup
pub struct SettingsRegistry {
	definitions: Vec<Arc<SettingDefinition>>,
	index: HashMap<String, usize>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self { definitions: Vec::new(), index: HashMap::new() }
	}

	/// Register a new setting definition
	pub fn register(&mut self, def: SettingDefinition) -> ClResult<()> {
		if self.index.contains_key(&def.key) {
			return Err(Error::ConfigError(format!("Setting '{}' is already registered", def.key)));
		}

		debug!("Registering setting: {}", def.key);
		self.index.insert(def.key.clone(), self.definitions.len());
		self.definitions.push(Arc::new(def));
		Ok(())
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenSettingsRegistry {
		info!("Freezing settings registry with {} definitions", self.definitions.len());
		FrozenSettingsRegistry { definitions: self.definitions, index: self.index }
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

impl Default for SettingsRegistry {
	fn default() -> Self {
		Self::new()
	}
}

/// Immutable catalog shared by the engine
#[derive(Debug)]
pub struct FrozenSettingsRegistry {
	definitions: Vec<Arc<SettingDefinition>>,
	index: HashMap<String, usize>,
}

impl FrozenSettingsRegistry {
	pub fn get(&self, key: &str) -> Option<&Arc<SettingDefinition>> {
		self.index.get(key).and_then(|&i| self.definitions.get(i))
	}

	/// All definitions in registration order
	pub fn list(&self) -> impl Iterator<Item = &Arc<SettingDefinition>> {
		self.definitions.iter()
	}

	/// Definitions that allow overrides at `level`
	pub fn list_for_level(
		&self,
		level: SettingLevel,
	) -> impl Iterator<Item = &Arc<SettingDefinition>> {
		self.definitions.iter().filter(move |def| def.allows_level(level))
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingSource {
	Stored,
	Default,
}

/// Serializes a missing level as the "default" sentinel
pub(crate) fn serialize_level_or_default<S>(
	level: &Option<SettingLevel>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match level {
		Some(level) => level.serialize(serializer),
		None => serializer.serialize_str("default"),
	}
}

/// Effective value of one key plus its provenance
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSetting {
	pub key: String,
	pub value: SettingValue,
	pub slug: String,
	#[serde(serialize_with = "serialize_level_or_default")]
	pub effective_level: Option<SettingLevel>,
	#[serde(rename = "modelId")]
	pub entity_id: Option<EntityId>,
	pub source: SettingSource,
	pub is_default: bool,
	#[serde(rename = "config")]
	pub definition: Arc<SettingDefinition>,
}

impl ResolvedSetting {
	pub fn stored(
		definition: &Arc<SettingDefinition>,
		value: SettingValue,
		level: SettingLevel,
		entity_id: Option<EntityId>,
	) -> Self {
		Self {
			key: definition.key.clone(),
			value,
			slug: definition.slug(),
			effective_level: Some(level),
			entity_id,
			source: SettingSource::Stored,
			is_default: false,
			definition: Arc::clone(definition),
		}
	}

	pub fn default_for(definition: &Arc<SettingDefinition>) -> Self {
		Self {
			key: definition.key.clone(),
			value: definition.default.clone(),
			slug: definition.slug(),
			effective_level: None,
			entity_id: None,
			source: SettingSource::Default,
			is_default: true,
			definition: Arc::clone(definition),
		}
	}
}


// vim: ts=4
