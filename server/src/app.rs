//! App state and builder

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use strata_core::prelude::*;
use strata_core::settings::handler;
use strata_core::{SettingsConfig, SettingsService};
use strata_types::store_adapter::StoreAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppBuilder {
	config: SettingsConfig,
	store_adapter: Option<Arc<dyn StoreAdapter>>,
}

impl AppBuilder {
	pub fn new(config: SettingsConfig) -> Self {
		AppBuilder { config, store_adapter: None }
	}

	// Adapters
	pub fn store_adapter(&mut self, store_adapter: Arc<dyn StoreAdapter>) -> &mut Self {
		self.store_adapter = Some(store_adapter);
		self
	}

	/// Load the catalog and assemble the HTTP router
	pub async fn build(self) -> ClResult<(SettingsConfig, Router)> {
		let store = self
			.store_adapter
			.ok_or_else(|| Error::ConfigError("No store adapter".into()))?;

		let registry = self.config.load_registry().await?;
		info!("Catalog ready: {} settings", registry.len());

		let service = Arc::new(SettingsService::new(Arc::new(registry), store, &self.config));
		let router = handler::router(service).layer(TraceLayer::new_for_http());
		Ok((self.config, router))
	}

	pub async fn run(self) -> ClResult<()> {
		info!("Strata settings server V{}", VERSION);

		let (config, router) = self.build().await?;
		if config.cache_duration.is_zero() {
			info!("Aggregate cache disabled");
		} else {
			info!("Aggregate cache: {}s, {} principals", config.cache_duration.as_secs(), config.cache_capacity);
		}

		let listener = tokio::net::TcpListener::bind(&*config.listen).await?;
		info!("Listening on HTTP {}", config.listen);
		axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

		info!("Shut down");
		Ok(())
	}
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		warn!("Cannot listen for shutdown signal: {}", err);
		std::future::pending::<()>().await;
	}
}

// vim: ts=4
