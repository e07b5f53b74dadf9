//! Level hierarchy: precedence order and entity id resolution

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// The facility and user on whose behalf settings are resolved.
///
/// This is the resolving principal: aggregate reads are cached per context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeContext {
	pub facility_id: Option<EntityId>,
	pub user_id: Option<EntityId>,
}

impl ScopeContext {
	pub fn new(facility_id: Option<EntityId>, user_id: Option<EntityId>) -> Self {
		Self { facility_id, user_id }
	}

	/// Context with neither facility nor user; only system overrides can match
	pub fn system() -> Self {
		Self::default()
	}

	pub fn cache_key(&self) -> String {
		fn part(id: Option<EntityId>) -> String {
			id.map_or_else(|| "-".to_string(), |id| id.to_string())
		}
		format!("settings:{}:{}", part(self.facility_id), part(self.user_id))
	}

	pub fn entity_id_for(&self, level: SettingLevel) -> Option<EntityId> {
		entity_id_for_context(level, self.facility_id, self.user_id)
	}
}

/// Introspection record for one level
#[derive(Debug, Clone, Serialize)]
pub struct LevelInfo {
	pub value: SettingLevel,
	pub name: &'static str,
	pub slug: &'static str,
	pub description: &'static str,
	pub priority: u8,
}

/// Subset of `levels` sorted ascending by priority number (SYSTEM first)
pub fn priority_order(levels: &[SettingLevel]) -> Vec<SettingLevel> {
	SettingLevel::ALL.into_iter().filter(|level| levels.contains(level)).collect()
}

/// Subset of `levels` in the order overrides are consulted: USER, FACILITY, SYSTEM
pub fn resolution_order(levels: &[SettingLevel]) -> Vec<SettingLevel> {
	let mut order = priority_order(levels);
	order.reverse();
	order
}

/// Entity id a read at `level` should match. `None` for a non-system level
/// means the context cannot match any override there.
pub fn entity_id_for_context(
	level: SettingLevel,
	facility_id: Option<EntityId>,
	user_id: Option<EntityId>,
) -> Option<EntityId> {
	match level {
		SettingLevel::System => None,
		SettingLevel::Facility => facility_id,
		SettingLevel::User => user_id,
	}
}

/// Entity id a write at `level` targets. Writes below system level need an explicit target.
pub fn entity_id_for_write(
	level: SettingLevel,
	model_id: Option<EntityId>,
) -> ClResult<Option<EntityId>> {
	match (level, model_id) {
		(SettingLevel::System, _) => Ok(None),
		(_, Some(id)) => Ok(Some(id)),
		(level, None) => Err(Error::MissingEntityId(level)),
	}
}

pub fn levels() -> Vec<LevelInfo> {
	SettingLevel::ALL
		.into_iter()
		.map(|level| LevelInfo {
			value: level,
			name: level.name(),
			slug: level.as_str(),
			description: level.description(),
			priority: level.priority(),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_priority_order_filters_and_sorts() {
		let levels = [SettingLevel::User, SettingLevel::System];
		assert_eq!(priority_order(&levels), vec![SettingLevel::System, SettingLevel::User]);
		assert_eq!(resolution_order(&levels), vec![SettingLevel::User, SettingLevel::System]);
		assert!(priority_order(&[]).is_empty());
	}

	#[test]
	fn test_entity_id_for_context() {
		let ctx = ScopeContext::new(Some(EntityId(7)), Some(EntityId(3)));
		assert_eq!(ctx.entity_id_for(SettingLevel::System), None);
		assert_eq!(ctx.entity_id_for(SettingLevel::Facility), Some(EntityId(7)));
		assert_eq!(ctx.entity_id_for(SettingLevel::User), Some(EntityId(3)));
		assert_eq!(ScopeContext::system().entity_id_for(SettingLevel::User), None);
	}

	#[test]
	fn test_entity_id_for_write() {
		assert_eq!(entity_id_for_write(SettingLevel::System, Some(EntityId(5))).unwrap(), None);
		assert_eq!(
			entity_id_for_write(SettingLevel::Facility, Some(EntityId(5))).unwrap(),
			Some(EntityId(5))
		);
		assert!(matches!(
			entity_id_for_write(SettingLevel::User, None),
			Err(Error::MissingEntityId(SettingLevel::User))
		));
	}

	#[test]
	fn test_cache_key_per_principal() {
		assert_eq!(ScopeContext::system().cache_key(), "settings:-:-");
		assert_eq!(
			ScopeContext::new(Some(EntityId(7)), Some(EntityId(3))).cache_key(),
			"settings:7:3"
		);
	}

	#[test]
	fn test_levels_introspection() {
		let levels = levels();
		assert_eq!(levels.len(), 3);
		assert_eq!(levels[1].name, "Facility");
		assert_eq!(levels[1].priority, 2);
	}
}

// vim: ts=4
