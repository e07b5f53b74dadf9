//! Adapter that persists setting overrides.
//!
//! Every stored override is addressed by the tuple `(key, level, entity_id)`;
//! implementations must keep that tuple unique. `entity_id` is `None` only for
//! [`SettingLevel::System`] rows.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use crate::prelude::*;

/// A persisted override
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSetting {
	pub key: Box<str>,
	pub level: SettingLevel,
	#[serde(rename = "modelId")]
	pub entity_id: Option<EntityId>,
	/// Type-erased value, see [`SettingType::cast`]
	pub value: Box<str>,
	#[serde(rename = "type")]
	pub typ: SettingType,
	#[serde(rename = "isResettable")]
	pub resettable: bool,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

/// Data for creating or overwriting an override
#[derive(Debug, Clone)]
pub struct UpsertSetting<'a> {
	pub key: &'a str,
	pub level: SettingLevel,
	pub entity_id: Option<EntityId>,
	pub value: &'a str,
	pub typ: SettingType,
	pub resettable: bool,
}

#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	/// Reads the override stored for a key at one level and entity
	async fn read_setting(
		&self,
		key: &str,
		level: SettingLevel,
		entity_id: Option<EntityId>,
	) -> ClResult<Option<StoredSetting>>;

	/// Creates the override if absent, else overwrites its value, type and resettable flag.
	/// `created_at` of an existing row is preserved.
	async fn upsert_setting(&self, setting: &UpsertSetting<'_>) -> ClResult<StoredSetting>;

	/// Deletes one override, returns whether a row was removed
	async fn delete_setting(
		&self,
		key: &str,
		level: SettingLevel,
		entity_id: Option<EntityId>,
	) -> ClResult<bool>;

	/// Deletes every override flagged resettable, returns the number of rows removed
	async fn delete_resettable(&self) -> ClResult<u64>;

	async fn setting_exists(
		&self,
		key: &str,
		level: SettingLevel,
		entity_id: Option<EntityId>,
	) -> ClResult<bool> {
		Ok(self.read_setting(key, level, entity_id).await?.is_some())
	}
}

// vim: ts=4
