//! Settings service: resolution across levels, with an aggregate cache per principal

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use strata_types::store_adapter::StoreAdapter;

use super::cache::{LruSettingsCache, ResolvedSettings, SettingsCache};
use super::levels::{self, LevelInfo, resolution_order};
use super::types::{FrozenSettingsRegistry, ResolvedSetting, SettingDefinition};
use crate::config::SettingsConfig;
use crate::prelude::*;

/// Settings service - main interface for resolving and managing settings
#[derive(Debug)]
pub struct SettingsService {
	pub(crate) registry: Arc<FrozenSettingsRegistry>,
	pub(crate) store: Arc<dyn StoreAdapter>,
	pub(crate) cache: Arc<dyn SettingsCache>,
	pub(crate) cache_ttl: Duration,
	/// Bumped on every invalidation; an aggregate resolved across a bump is not cached
	generation: Mutex<u64>,
}

impl SettingsService {
	pub fn new(
		registry: Arc<FrozenSettingsRegistry>,
		store: Arc<dyn StoreAdapter>,
		config: &SettingsConfig,
	) -> Self {
		let cache = Arc::new(LruSettingsCache::new(config.cache_capacity));
		Self::with_cache(registry, store, cache, config.cache_duration)
	}

	/// Use a caller-provided cache. A zero `cache_ttl` disables aggregate caching.
	pub fn with_cache(
		registry: Arc<FrozenSettingsRegistry>,
		store: Arc<dyn StoreAdapter>,
		cache: Arc<dyn SettingsCache>,
		cache_ttl: Duration,
	) -> Self {
		Self { registry, store, cache, cache_ttl, generation: Mutex::new(0) }
	}

	pub fn registry(&self) -> &FrozenSettingsRegistry {
		&self.registry
	}

	/// Drop every cached aggregate
	pub(crate) fn invalidate(&self) {
		let mut generation = self.generation.lock();
		*generation = generation.wrapping_add(1);
		self.cache.clear();
	}

	pub(crate) fn definition(&self, key: &str) -> ClResult<&Arc<SettingDefinition>> {
		self.registry.get(key).ok_or_else(|| Error::UnknownSetting(key.to_string()))
	}

	/// Walk the allowed levels from USER down to SYSTEM, first stored override wins
	async fn resolve(
		&self,
		def: &Arc<SettingDefinition>,
		ctx: ScopeContext,
	) -> ClResult<ResolvedSetting> {
		for level in resolution_order(&def.levels) {
			let entity_id = ctx.entity_id_for(level);
			if level != SettingLevel::System && entity_id.is_none() {
				continue;
			}
			if let Some(stored) = self.store.read_setting(&def.key, level, entity_id).await? {
				let value = def.typ.cast(&stored.value).inspect_err(|err| {
					warn!("Stored value of '{}' at {} level does not cast: {}", def.key, level, err);
				})?;
				return Ok(ResolvedSetting::stored(def, value, level, entity_id));
			}
		}
		Ok(ResolvedSetting::default_for(def))
	}

	/// Effective value of `key`, or `None` if the key is not in the catalog
	pub async fn get_value(&self, key: &str, ctx: ScopeContext) -> ClResult<Option<SettingValue>> {
		Ok(self.get_value_with_metadata(key, ctx).await?.map(|resolved| resolved.value))
	}

	/// Effective value of `key` with its provenance
	pub async fn get_value_with_metadata(
		&self,
		key: &str,
		ctx: ScopeContext,
	) -> ClResult<Option<ResolvedSetting>> {
		let Some(def) = self.registry.get(key) else {
			debug!("Unknown setting requested: {}", key);
			return Ok(None);
		};
		Ok(Some(self.resolve(def, ctx).await?))
	}

	/// Level that supplies the active value, `None` when the default applies
	pub async fn get_effective_level(
		&self,
		key: &str,
		ctx: ScopeContext,
	) -> ClResult<Option<SettingLevel>> {
		Ok(self.get_value_with_metadata(key, ctx).await?.and_then(|r| r.effective_level))
	}

	/// Every catalog key resolved for `ctx`, memoized per principal
	pub async fn get_all_resolved(&self, ctx: ScopeContext) -> ClResult<ResolvedSettings> {
		let cache_key = ctx.cache_key();
		if !self.cache_ttl.is_zero() {
			if let Some(resolved) = self.cache.get(&cache_key) {
				debug!("Settings cache hit: {}", cache_key);
				return Ok(resolved);
			}
		}

		let generation = *self.generation.lock();
		let mut resolved = Vec::with_capacity(self.registry.len());
		for def in self.registry.list() {
			resolved.push(self.resolve(def, ctx).await?);
		}
		let resolved = Arc::new(resolved);

		if !self.cache_ttl.is_zero() {
			let current = self.generation.lock();
			if *current == generation {
				self.cache.set(&cache_key, Arc::clone(&resolved), self.cache_ttl);
			} else {
				debug!("Settings changed while resolving {}, result not cached", cache_key);
			}
		}
		Ok(resolved)
	}

	/// Single-level snapshot: only settings allowed at `level`, looked up at that level alone
	pub async fn get_for_level(
		&self,
		level: SettingLevel,
		model_id: Option<EntityId>,
	) -> ClResult<Vec<ResolvedSetting>> {
		let entity_id = levels::entity_id_for_write(level, model_id)?;

		let mut settings = Vec::new();
		for def in self.registry.list_for_level(level) {
			let resolved = match self.store.read_setting(&def.key, level, entity_id).await? {
				Some(stored) => {
					ResolvedSetting::stored(def, def.typ.cast(&stored.value)?, level, entity_id)
				}
				None => ResolvedSetting::default_for(def),
			};
			settings.push(resolved);
		}
		Ok(settings)
	}

	/// Catalog introspection
	pub fn get_available_settings(&self) -> Vec<Arc<SettingDefinition>> {
		self.registry.list().cloned().collect()
	}

	pub fn get_levels(&self) -> Vec<LevelInfo> {
		levels::levels()
	}

	/// Resolved value of `key`, or `fallback` when the key is unknown or resolves to null
	pub async fn get_or(
		&self,
		key: &str,
		ctx: ScopeContext,
		fallback: impl Into<SettingValue>,
	) -> ClResult<SettingValue> {
		match self.get_value(key, ctx).await? {
			Some(value) if !value.is_null() => Ok(value),
			_ => Ok(fallback.into()),
		}
	}

	async fn get_required(&self, key: &str, ctx: ScopeContext) -> ClResult<SettingValue> {
		self.get_value(key, ctx).await?.ok_or_else(|| Error::UnknownSetting(key.to_string()))
	}

	pub async fn get_string(&self, key: &str, ctx: ScopeContext) -> ClResult<String> {
		match self.get_required(key, ctx).await? {
			SettingValue::String(s) => Ok(s),
			other => Err(Error::type_cast(SettingType::String, format!("got {}", other.type_name()))),
		}
	}

	pub async fn get_int(&self, key: &str, ctx: ScopeContext) -> ClResult<i64> {
		match self.get_required(key, ctx).await? {
			SettingValue::Int(i) => Ok(i),
			other => {
				Err(Error::type_cast(SettingType::Integer, format!("got {}", other.type_name())))
			}
		}
	}

	pub async fn get_float(&self, key: &str, ctx: ScopeContext) -> ClResult<f64> {
		match self.get_required(key, ctx).await? {
			SettingValue::Float(f) => Ok(f),
			#[allow(clippy::cast_precision_loss)]
			SettingValue::Int(i) => Ok(i as f64),
			other => Err(Error::type_cast(SettingType::Float, format!("got {}", other.type_name()))),
		}
	}

	pub async fn get_bool(&self, key: &str, ctx: ScopeContext) -> ClResult<bool> {
		match self.get_required(key, ctx).await? {
			SettingValue::Bool(b) => Ok(b),
			other => {
				Err(Error::type_cast(SettingType::Boolean, format!("got {}", other.type_name())))
			}
		}
	}

	/// Any resolved value as JSON, null included
	pub async fn get_json(&self, key: &str, ctx: ScopeContext) -> ClResult<serde_json::Value> {
		Ok(self.get_required(key, ctx).await?.to_json())
	}
}

// vim: ts=4
