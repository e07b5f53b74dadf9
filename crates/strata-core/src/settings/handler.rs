//! Settings HTTP handlers

use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use strata_types::store_adapter::StoredSetting;

use super::levels::LevelInfo;
use super::mutation::SettingWrite;
use super::schema::{HierarchyEntry, LevelSchema};
use super::service::SettingsService;
use super::types::{ResolvedSetting, SettingDefinition};
use crate::prelude::*;

type Service = Arc<SettingsService>;

/// Response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
	pub data: T,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data }
	}
}

type ApiResult<T> = ClResult<(StatusCode, Json<ApiResponse<T>>)>;

fn ok<T>(data: T) -> ApiResult<T> {
	Ok((StatusCode::OK, Json(ApiResponse::new(data))))
}

/// `?facility=&user=`
#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
	pub facility: Option<EntityId>,
	pub user: Option<EntityId>,
}

impl From<ScopeQuery> for ScopeContext {
	fn from(query: ScopeQuery) -> Self {
		ScopeContext::new(query.facility, query.user)
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelQuery {
	pub model_id: Option<EntityId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveQuery {
	pub level: SettingLevel,
	pub model_id: Option<EntityId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingRequest {
	#[serde(default)]
	pub value: SettingValue,
	pub level: SettingLevel,
	#[serde(default)]
	pub model_id: Option<EntityId>,
	#[serde(default)]
	pub skip_validation: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse<T> {
	pub deleted: T,
}

/// GET /api/settings - Every setting resolved for the given scope
pub async fn list_settings(
	State(service): State<Service>,
	Query(scope): Query<ScopeQuery>,
) -> ApiResult<Arc<Vec<ResolvedSetting>>> {
	ok(service.get_all_resolved(scope.into()).await?)
}

/// GET /api/settings/{key} - Effective value with provenance
pub async fn get_setting(
	State(service): State<Service>,
	Path(key): Path<String>,
	Query(scope): Query<ScopeQuery>,
) -> ApiResult<ResolvedSetting> {
	let resolved = service
		.get_value_with_metadata(&key, scope.into())
		.await?
		.ok_or(Error::UnknownSetting(key))?;
	ok(resolved)
}

/// GET /api/settings/{key}/hierarchy
pub async fn get_setting_hierarchy(
	State(service): State<Service>,
	Path(key): Path<String>,
	Query(scope): Query<ScopeQuery>,
) -> ApiResult<Vec<HierarchyEntry>> {
	if service.registry().get(&key).is_none() {
		return Err(Error::UnknownSetting(key));
	}
	ok(service.setting_hierarchy(&key, scope.into()).await?)
}

/// PUT /api/settings/{key}
pub async fn update_setting(
	State(service): State<Service>,
	Path(key): Path<String>,
	Json(req): Json<UpdateSettingRequest>,
) -> ApiResult<StoredSetting> {
	let stored = service
		.set_value(&key, req.value, req.level, req.model_id, req.skip_validation)
		.await?;
	ok(stored)
}

/// DELETE /api/settings/{key}?level=&modelId=
pub async fn delete_setting(
	State(service): State<Service>,
	Path(key): Path<String>,
	Query(query): Query<RemoveQuery>,
) -> ApiResult<DeletedResponse<bool>> {
	let deleted = service.remove_value(&key, query.level, query.model_id).await?;
	ok(DeletedResponse { deleted })
}

/// POST /api/settings/batch - Sequential writes, earlier items stay committed on failure
pub async fn update_settings(
	State(service): State<Service>,
	Json(writes): Json<Vec<SettingWrite>>,
) -> ApiResult<Vec<StoredSetting>> {
	ok(service.set_values(writes).await?)
}

/// POST /api/settings/reset
pub async fn reset_settings(State(service): State<Service>) -> ApiResult<DeletedResponse<u64>> {
	let deleted = service.reset_all().await?;
	ok(DeletedResponse { deleted })
}

/// GET /api/levels
pub async fn list_levels(State(service): State<Service>) -> ApiResult<Vec<LevelInfo>> {
	ok(service.get_levels())
}

/// GET /api/levels/{level}?modelId=
pub async fn get_level_settings(
	State(service): State<Service>,
	Path(level): Path<SettingLevel>,
	Query(query): Query<ModelQuery>,
) -> ApiResult<Vec<ResolvedSetting>> {
	ok(service.get_for_level(level, query.model_id).await?)
}

/// GET /api/levels/{level}/schema?modelId=
pub async fn get_level_schema(
	State(service): State<Service>,
	Path(level): Path<SettingLevel>,
	Query(query): Query<ModelQuery>,
) -> ApiResult<LevelSchema> {
	ok(service.schema_for_level(level, query.model_id).await?)
}

/// GET /api/levels/{level}/export?modelId=
pub async fn export_level_settings(
	State(service): State<Service>,
	Path(level): Path<SettingLevel>,
	Query(query): Query<ModelQuery>,
) -> ApiResult<BTreeMap<String, SettingValue>> {
	ok(service.export_level(level, query.model_id).await?)
}

/// GET /api/catalog
pub async fn list_catalog(
	State(service): State<Service>,
) -> ApiResult<Vec<Arc<SettingDefinition>>> {
	ok(service.get_available_settings())
}

pub fn router(service: Service) -> Router {
	Router::new()
		.route("/api/settings", get(list_settings))
		.route("/api/settings/batch", post(update_settings))
		.route("/api/settings/reset", post(reset_settings))
		.route(
			"/api/settings/{key}",
			get(get_setting).put(update_setting).delete(delete_setting),
		)
		.route("/api/settings/{key}/hierarchy", get(get_setting_hierarchy))
		.route("/api/levels", get(list_levels))
		.route("/api/levels/{level}", get(get_level_settings))
		.route("/api/levels/{level}/schema", get(get_level_schema))
		.route("/api/levels/{level}/export", get(export_level_settings))
		.route("/api/catalog", get(list_catalog))
		.with_state(service)
}

// vim: ts=4
