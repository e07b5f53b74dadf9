//! Validated write path

use serde::Deserialize;

use strata_types::store_adapter::{StoredSetting, UpsertSetting};

use super::levels::entity_id_for_write;
use super::service::SettingsService;
use crate::prelude::*;

/// One item of a batch write
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingWrite {
	pub key: String,
	#[serde(default)]
	pub value: SettingValue,
	pub level: SettingLevel,
	#[serde(default)]
	pub model_id: Option<EntityId>,
}

impl SettingsService {
	/// Store an override of `key` at `level`.
	///
	/// Every check runs before the store is touched; the aggregate cache is
	/// cleared once the row is written.
	pub async fn set_value(
		&self,
		key: &str,
		value: SettingValue,
		level: SettingLevel,
		model_id: Option<EntityId>,
		skip_validation: bool,
	) -> ClResult<StoredSetting> {
		let def = self.definition(key)?;

		if !def.allows_level(level) {
			warn!("Setting '{}' rejected at {} level", key, level);
			return Err(Error::LevelNotAllowed { key: key.to_string(), level });
		}

		if !skip_validation {
			def.validate(&value)?;
		}

		let entity_id = entity_id_for_write(level, model_id)?;
		let raw = def.typ.serialize(&value)?;

		let stored = self
			.store
			.upsert_setting(&UpsertSetting {
				key,
				level,
				entity_id,
				value: &raw,
				typ: def.typ,
				resettable: def.resettable,
			})
			.await?;

		self.invalidate();
		info!("Setting '{}' stored at {} level (entity: {:?})", key, level, entity_id);
		Ok(stored)
	}

	/// Apply writes in order. Not transactional: writes before a failing item stay committed.
	pub async fn set_values(&self, writes: Vec<SettingWrite>) -> ClResult<Vec<StoredSetting>> {
		let mut stored = Vec::with_capacity(writes.len());
		for write in writes {
			let committed = stored.len();
			let setting = self
				.set_value(&write.key, write.value, write.level, write.model_id, false)
				.await
				.inspect_err(|err| {
					warn!(
						"Batch write stopped at '{}' after {} committed: {}",
						write.key, committed, err
					);
				})?;
			stored.push(setting);
		}
		Ok(stored)
	}

	/// Delete one override. The cache is only cleared when a row was removed.
	pub async fn remove_value(
		&self,
		key: &str,
		level: SettingLevel,
		model_id: Option<EntityId>,
	) -> ClResult<bool> {
		let entity_id = entity_id_for_write(level, model_id)?;
		let deleted = self.store.delete_setting(key, level, entity_id).await?;
		if deleted {
			self.invalidate();
			info!("Setting '{}' removed at {} level (entity: {:?})", key, level, entity_id);
		} else {
			debug!("No override of '{}' at {} level to remove", key, level);
		}
		Ok(deleted)
	}

	/// Purge every resettable override across all keys, levels and entities
	pub async fn reset_all(&self) -> ClResult<u64> {
		let deleted = self.store.delete_resettable().await?;
		self.invalidate();
		info!("Reset settings: {} resettable overrides removed", deleted);
		Ok(deleted)
	}
}

// vim: ts=4
