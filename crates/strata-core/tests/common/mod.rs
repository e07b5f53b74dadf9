//! Shared fixtures for the settings integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

use strata_core::settings::cache::LruSettingsCache;
use strata_core::settings::{SettingDefinition, SettingsRegistry};
use strata_core::SettingsService;
use strata_core::prelude::*;
use strata_types::store_adapter::{StoreAdapter, StoredSetting, UpsertSetting};

type RowKey = (String, SettingLevel, Option<EntityId>);

/// In-memory store that counts every call
#[derive(Debug, Default)]
pub struct MockStore {
	rows: Mutex<HashMap<RowKey, StoredSetting>>,
	pub reads: AtomicUsize,
	pub upserts: AtomicUsize,
	pub deletes: AtomicUsize,
}

impl MockStore {
	pub fn reads(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	pub fn upserts(&self) -> usize {
		self.upserts.load(Ordering::SeqCst)
	}

	pub fn deletes(&self) -> usize {
		self.deletes.load(Ordering::SeqCst)
	}

	pub fn len(&self) -> usize {
		self.rows.lock().len()
	}

	/// Insert a raw row, bypassing the service
	pub fn insert_raw(
		&self,
		key: &str,
		level: SettingLevel,
		entity_id: Option<u64>,
		value: &str,
		typ: SettingType,
		resettable: bool,
	) {
		let entity_id = entity_id.map(EntityId);
		self.rows.lock().insert(
			(key.to_string(), level, entity_id),
			StoredSetting {
				key: key.into(),
				level,
				entity_id,
				value: value.into(),
				typ,
				resettable,
				created_at: Timestamp(1),
				updated_at: Timestamp(1),
			},
		);
	}
}

#[async_trait]
impl StoreAdapter for MockStore {
	async fn read_setting(
		&self,
		key: &str,
		level: SettingLevel,
		entity_id: Option<EntityId>,
	) -> ClResult<Option<StoredSetting>> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		Ok(self.rows.lock().get(&(key.to_string(), level, entity_id)).cloned())
	}

	async fn upsert_setting(&self, setting: &UpsertSetting<'_>) -> ClResult<StoredSetting> {
		self.upserts.fetch_add(1, Ordering::SeqCst);
		let mut rows = self.rows.lock();
		let now = Timestamp::now();
		let row_key = (setting.key.to_string(), setting.level, setting.entity_id);
		let created_at = rows.get(&row_key).map_or(now, |row| row.created_at);
		let stored = StoredSetting {
			key: setting.key.into(),
			level: setting.level,
			entity_id: setting.entity_id,
			value: setting.value.into(),
			typ: setting.typ,
			resettable: setting.resettable,
			created_at,
			updated_at: now,
		};
		rows.insert(row_key, stored.clone());
		Ok(stored)
	}

	async fn delete_setting(
		&self,
		key: &str,
		level: SettingLevel,
		entity_id: Option<EntityId>,
	) -> ClResult<bool> {
		self.deletes.fetch_add(1, Ordering::SeqCst);
		Ok(self.rows.lock().remove(&(key.to_string(), level, entity_id)).is_some())
	}

	async fn delete_resettable(&self) -> ClResult<u64> {
		self.deletes.fetch_add(1, Ordering::SeqCst);
		let mut rows = self.rows.lock();
		let before = rows.len();
		rows.retain(|_, row| !row.resettable);
		Ok(u64::try_from(before - rows.len()).unwrap_or_default())
	}
}

/// Store whose next read, once armed, parks until `release` is notified
#[derive(Debug, Default)]
pub struct GatedStore {
	pub inner: MockStore,
	armed: AtomicBool,
	pub paused: Notify,
	pub release: Notify,
}

impl GatedStore {
	pub fn arm(&self) {
		self.armed.store(true, Ordering::SeqCst);
	}
}

#[async_trait]
impl StoreAdapter for GatedStore {
	async fn read_setting(
		&self,
		key: &str,
		level: SettingLevel,
		entity_id: Option<EntityId>,
	) -> ClResult<Option<StoredSetting>> {
		let row = self.inner.read_setting(key, level, entity_id).await?;
		if self.armed.swap(false, Ordering::SeqCst) {
			self.paused.notify_one();
			self.release.notified().await;
		}
		Ok(row)
	}

	async fn upsert_setting(&self, setting: &UpsertSetting<'_>) -> ClResult<StoredSetting> {
		self.inner.upsert_setting(setting).await
	}

	async fn delete_setting(
		&self,
		key: &str,
		level: SettingLevel,
		entity_id: Option<EntityId>,
	) -> ClResult<bool> {
		self.inner.delete_setting(key, level, entity_id).await
	}

	async fn delete_resettable(&self) -> ClResult<u64> {
		self.inner.delete_resettable().await
	}
}

pub fn test_registry() -> SettingsRegistry {
	let mut registry = SettingsRegistry::new();
	registry
		.register(
			SettingDefinition::builder("language")
				.name("Language")
				.default("en")
				.levels(SettingLevel::ALL)
				.validation("in:en,es,fr,de,pt")
				.group_path(["User", "System"])
				.resettable(true)
				.build()
				.unwrap(),
		)
		.unwrap();
	registry
		.register(
			SettingDefinition::builder("number-of-decimals")
				.name("Number of decimals")
				.typ(SettingType::Integer)
				.default(SettingValue::Int(2))
				.levels(SettingLevel::ALL)
				.validation("integer|min:0")
				.group_path(["User", "Number format"])
				.build()
				.unwrap(),
		)
		.unwrap();
	registry
		.register(
			SettingDefinition::builder("logo")
				.name("Logo")
				.default("")
				.validation("required|string|max:255")
				.group_path(["Company", "Company settings"])
				.build()
				.unwrap(),
		)
		.unwrap();
	registry
		.register(
			SettingDefinition::builder("enabled-google-maps")
				.name("Enabled google maps")
				.typ(SettingType::Boolean)
				.default(true)
				.levels([SettingLevel::System, SettingLevel::User])
				.validation("nullable|boolean")
				.build()
				.unwrap(),
		)
		.unwrap();
	registry
		.register(
			SettingDefinition::builder("invoice-tax-percentage")
				.name("Invoice - Tax percentage")
				.typ(SettingType::Float)
				.default(10.0)
				.levels([SettingLevel::System, SettingLevel::Facility])
				.validation("nullable|numeric|min:0")
				.group_path(["Module options", "Inventory"])
				.build()
				.unwrap(),
		)
		.unwrap();
	registry
		.register(
			SettingDefinition::builder("holidays")
				.name("Holidays")
				.typ(SettingType::Json)
				.default(serde_json::json!([]))
				.levels([SettingLevel::System, SettingLevel::Facility])
				.validation("nullable|array")
				.group_path(["Module options", "Labor tracker"])
				.resettable(true)
				.build()
				.unwrap(),
		)
		.unwrap();
	registry
}

pub struct Fixture {
	pub store: Arc<MockStore>,
	pub service: Arc<SettingsService>,
}

pub fn fixture_with_ttl(ttl: Duration) -> Fixture {
	let store = Arc::new(MockStore::default());
	let service = SettingsService::with_cache(
		Arc::new(test_registry().freeze()),
		store.clone(),
		Arc::new(LruSettingsCache::new(16)),
		ttl,
	);
	Fixture { store, service: Arc::new(service) }
}

pub fn fixture() -> Fixture {
	fixture_with_ttl(Duration::from_secs(3600))
}

pub fn ctx(facility: Option<u64>, user: Option<u64>) -> ScopeContext {
	ScopeContext::new(facility.map(EntityId), user.map(EntityId))
}

pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

// vim: ts=4
