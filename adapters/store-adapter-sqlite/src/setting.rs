//! Setting override rows
//!
//! Values are stored in their type-erased string form alongside the type tag.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use strata_types::prelude::*;
use strata_types::store_adapter::{StoredSetting, UpsertSetting};

use crate::inspect;

fn db_err(err: sqlx::Error) -> Error {
	inspect(&err);
	Error::DbError
}

fn bind_entity(entity_id: Option<EntityId>) -> ClResult<Option<i64>> {
	entity_id
		.map(|id| {
			i64::try_from(id.0).map_err(|_| {
				warn!("DB: entity id {} out of range", id);
				Error::DbError
			})
		})
		.transpose()
}

fn row_to_setting(row: &SqliteRow) -> ClResult<StoredSetting> {
	let level: &str = row.try_get("level").map_err(db_err)?;
	let typ: &str = row.try_get("type").map_err(db_err)?;
	let entity_id: Option<i64> = row.try_get("entity_id").map_err(db_err)?;
	let value: Option<String> = row.try_get("value").map_err(db_err)?;

	Ok(StoredSetting {
		key: row.try_get::<String, _>("key").map_err(db_err)?.into(),
		level: level.parse().map_err(|_| {
			warn!("DB: unknown level '{}'", level);
			Error::DbError
		})?,
		entity_id: entity_id
			.map(|id| u64::try_from(id).map(EntityId).map_err(|_| Error::DbError))
			.transpose()?,
		value: value.unwrap_or_default().into(),
		typ: typ.parse().map_err(|_| {
			warn!("DB: unknown setting type '{}'", typ);
			Error::DbError
		})?,
		resettable: row.try_get("is_resettable").map_err(db_err)?,
		created_at: Timestamp(row.try_get("created_at").map_err(db_err)?),
		updated_at: Timestamp(row.try_get("updated_at").map_err(db_err)?),
	})
}

/// Read the override of `key` at one level and entity
pub(crate) async fn read(
	db: &SqlitePool,
	key: &str,
	level: SettingLevel,
	entity_id: Option<EntityId>,
) -> ClResult<Option<StoredSetting>> {
	let row = sqlx::query(
		"SELECT key, level, entity_id, value, type, is_resettable, created_at, updated_at
		FROM settings WHERE key = ? AND level = ? AND entity_id IS ?",
	)
	.bind(key)
	.bind(level.as_str())
	.bind(bind_entity(entity_id)?)
	.fetch_optional(db)
	.await
	.map_err(db_err)?;

	row.as_ref().map(row_to_setting).transpose()
}

/// Update or create an override in one statement.
///
/// The conflict target is left implicit so it matches the expression-based
/// scope index; `created_at` of an existing row is kept.
pub(crate) async fn upsert(db: &SqlitePool, setting: &UpsertSetting<'_>) -> ClResult<StoredSetting> {
	let now = Timestamp::now();

	let row = sqlx::query(
		"INSERT INTO settings (key, level, entity_id, value, type, is_resettable, created_at, updated_at)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?)
		ON CONFLICT DO UPDATE SET
		value = excluded.value,
		type = excluded.type,
		is_resettable = excluded.is_resettable,
		updated_at = excluded.updated_at
		RETURNING created_at, updated_at",
	)
	.bind(setting.key)
	.bind(setting.level.as_str())
	.bind(bind_entity(setting.entity_id)?)
	.bind(setting.value)
	.bind(setting.typ.as_str())
	.bind(setting.resettable)
	.bind(now.0)
	.bind(now.0)
	.fetch_one(db)
	.await
	.map_err(db_err)?;

	Ok(StoredSetting {
		key: setting.key.into(),
		level: setting.level,
		entity_id: setting.entity_id,
		value: setting.value.into(),
		typ: setting.typ,
		resettable: setting.resettable,
		created_at: Timestamp(row.try_get("created_at").map_err(db_err)?),
		updated_at: Timestamp(row.try_get("updated_at").map_err(db_err)?),
	})
}

/// Delete one override
pub(crate) async fn delete(
	db: &SqlitePool,
	key: &str,
	level: SettingLevel,
	entity_id: Option<EntityId>,
) -> ClResult<bool> {
	let res = sqlx::query("DELETE FROM settings WHERE key = ? AND level = ? AND entity_id IS ?")
		.bind(key)
		.bind(level.as_str())
		.bind(bind_entity(entity_id)?)
		.execute(db)
		.await
		.map_err(db_err)?;

	Ok(res.rows_affected() > 0)
}

/// Delete every resettable override
pub(crate) async fn delete_resettable(db: &SqlitePool) -> ClResult<u64> {
	let res = sqlx::query("DELETE FROM settings WHERE is_resettable = 1")
		.execute(db)
		.await
		.map_err(db_err)?;

	Ok(res.rows_affected())
}

// vim: ts=4
