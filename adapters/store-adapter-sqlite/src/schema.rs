//! Database schema initialization

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Settings
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings (
		id integer NOT NULL,
		key text NOT NULL,
		level text NOT NULL,
		entity_id integer,
		value text,
		type text NOT NULL DEFAULT 'string',
		is_resettable boolean NOT NULL DEFAULT 0,
		created_at integer DEFAULT (unixepoch()),
		updated_at integer DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// NULL entity ids are distinct in a plain unique index
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_settings_scope
		ON settings(key, level, ifnull(entity_id, -1))",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_settings_resettable ON settings(is_resettable)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
