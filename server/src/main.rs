mod app;

use std::sync::Arc;

use strata_core::SettingsConfig;
use strata_core::prelude::*;
use strata_store_adapter_sqlite::StoreAdapterSqlite;

#[tokio::main]
async fn main() -> ClResult<()> {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let config = SettingsConfig::from_env().inspect_err(|err| error!("{}", err))?;
	let store = Arc::new(StoreAdapterSqlite::new(&config.db_path).await?);

	let mut app = app::AppBuilder::new(config);
	app.store_adapter(store);
	app.run().await.inspect_err(|err| error!("FATAL: {}", err))
}

// vim: ts=4
