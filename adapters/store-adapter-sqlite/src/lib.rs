//! SQLite store adapter for setting overrides.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod schema;
mod setting;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use strata_types::prelude::*;
use strata_types::store_adapter::{StoreAdapter, StoredSetting, UpsertSetting};

pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	/// Open (or create) the database file at `path` and bring its schema up to date
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		let path = path.as_ref();
		if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(dir).await?;
		}

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path)
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;
		info!("Settings store opened at {}", path.display());

		Ok(Self { db })
	}
}

#[async_trait]
impl StoreAdapter for StoreAdapterSqlite {
	async fn read_setting(
		&self,
		key: &str,
		level: SettingLevel,
		entity_id: Option<EntityId>,
	) -> ClResult<Option<StoredSetting>> {
		setting::read(&self.db, key, level, entity_id).await
	}

	async fn upsert_setting(&self, setting: &UpsertSetting<'_>) -> ClResult<StoredSetting> {
		setting::upsert(&self.db, setting).await
	}

	async fn delete_setting(
		&self,
		key: &str,
		level: SettingLevel,
		entity_id: Option<EntityId>,
	) -> ClResult<bool> {
		setting::delete(&self.db, key, level, entity_id).await
	}

	async fn delete_resettable(&self) -> ClResult<u64> {
		setting::delete_resettable(&self.db).await
	}
}

// vim: ts=4
