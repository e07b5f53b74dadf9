//! Presentation views: grouped schema trees and per-key inheritance chains

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::levels::resolution_order;
use super::service::SettingsService;
use super::types::{ResolvedSetting, serialize_level_or_default};
use crate::prelude::*;

/// Group label used for definitions without a group path
pub const DEFAULT_GROUP: &str = "General";

/// One group in a schema tree
#[derive(Debug, Clone, Serialize)]
pub struct SchemaNode {
	pub name: String,
	pub groups: Vec<SchemaNode>,
	pub settings: Vec<ResolvedSetting>,
}

/// Schema of one level with the level's display metadata
#[derive(Debug, Clone, Serialize)]
pub struct LevelSchema {
	pub level: SettingLevel,
	pub name: &'static str,
	pub slug: &'static str,
	pub description: &'static str,
	pub priority: u8,
	pub groups: Vec<SchemaNode>,
}

/// One step of a key's inheritance chain
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyEntry {
	#[serde(serialize_with = "serialize_level_or_default")]
	pub level: Option<SettingLevel>,
	pub model_id: Option<EntityId>,
	pub value: SettingValue,
	pub exists: bool,
	pub is_effective: bool,
}

struct ArenaNode {
	name: String,
	children: Vec<usize>,
	settings: Vec<ResolvedSetting>,
}

/// Fold flat entries into a group tree.
///
/// Each path prefix becomes one node, shared by every entry whose path starts
/// with it. Siblings keep first-seen order.
pub fn build_schema(entries: impl IntoIterator<Item = ResolvedSetting>) -> Vec<SchemaNode> {
	let mut arena: Vec<ArenaNode> = Vec::new();
	let mut roots: Vec<usize> = Vec::new();
	let mut by_path: HashMap<String, usize> = HashMap::new();
	let default_path = [DEFAULT_GROUP.to_string()];

	for entry in entries {
		let path = if entry.definition.group_path.is_empty() {
			&default_path[..]
		} else {
			&entry.definition.group_path[..]
		};

		let mut path_key = String::new();
		let mut parent: Option<usize> = None;
		for segment in path {
			path_key.push_str(segment);
			path_key.push('|');

			let idx = if let Some(&idx) = by_path.get(&path_key) {
				idx
			} else {
				let idx = arena.len();
				arena.push(ArenaNode {
					name: segment.clone(),
					children: Vec::new(),
					settings: Vec::new(),
				});
				by_path.insert(path_key.clone(), idx);
				match parent {
					Some(p) => arena[p].children.push(idx),
					None => roots.push(idx),
				}
				idx
			};
			parent = Some(idx);
		}

		if let Some(leaf) = parent {
			arena[leaf].settings.push(entry);
		}
	}

	let mut slots: Vec<Option<ArenaNode>> = arena.into_iter().map(Some).collect();
	roots.into_iter().filter_map(|idx| take_node(&mut slots, idx)).collect()
}

fn take_node(slots: &mut [Option<ArenaNode>], idx: usize) -> Option<SchemaNode> {
	let node = slots.get_mut(idx)?.take()?;
	let groups = node.children.into_iter().filter_map(|child| take_node(slots, child)).collect();
	Some(SchemaNode { name: node.name, groups, settings: node.settings })
}

impl SettingsService {
	/// Per-level snapshot folded into a group tree
	pub async fn schema_for_level(
		&self,
		level: SettingLevel,
		model_id: Option<EntityId>,
	) -> ClResult<LevelSchema> {
		let settings = self.get_for_level(level, model_id).await?;
		Ok(LevelSchema {
			level,
			name: level.name(),
			slug: level.as_str(),
			description: level.description(),
			priority: level.priority(),
			groups: build_schema(settings),
		})
	}

	/// Schemas of every level the context can address
	pub async fn settings_schema(&self, ctx: ScopeContext) -> ClResult<Vec<LevelSchema>> {
		let mut schemas = Vec::new();
		for level in SettingLevel::ALL {
			let model_id = ctx.entity_id_for(level);
			if level != SettingLevel::System && model_id.is_none() {
				continue;
			}
			schemas.push(self.schema_for_level(level, model_id).await?);
		}
		Ok(schemas)
	}

	/// Inheritance chain of `key` for `ctx`, in the order overrides are consulted.
	///
	/// The first level holding an override is effective. When none does, a trailing
	/// default entry is effective instead. Unknown keys yield an empty chain.
	pub async fn setting_hierarchy(
		&self,
		key: &str,
		ctx: ScopeContext,
	) -> ClResult<Vec<HierarchyEntry>> {
		let Some(def) = self.registry.get(key) else {
			return Ok(Vec::new());
		};

		let mut chain = Vec::new();
		let mut effective_found = false;
		for level in resolution_order(&def.levels) {
			let model_id = ctx.entity_id_for(level);
			let stored = if level == SettingLevel::System || model_id.is_some() {
				self.store.read_setting(key, level, model_id).await?
			} else {
				None
			};

			let exists = stored.is_some();
			let value = match stored {
				Some(stored) => def.typ.cast(&stored.value)?,
				None => SettingValue::Null,
			};
			let is_effective = exists && !effective_found;
			effective_found |= is_effective;
			chain.push(HierarchyEntry { level: Some(level), model_id, value, exists, is_effective });
		}

		if !effective_found {
			chain.push(HierarchyEntry {
				level: None,
				model_id: None,
				value: def.default.clone(),
				exists: true,
				is_effective: true,
			});
		}
		Ok(chain)
	}

	/// Per-level snapshot as a `key -> value` map
	pub async fn export_level(
		&self,
		level: SettingLevel,
		model_id: Option<EntityId>,
	) -> ClResult<BTreeMap<String, SettingValue>> {
		Ok(self
			.get_for_level(level, model_id)
			.await?
			.into_iter()
			.map(|resolved| (resolved.key, resolved.value))
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::types::SettingDefinition;
	use std::sync::Arc;

	fn entry(key: &str, path: &[&str]) -> ResolvedSetting {
		let def = SettingDefinition::builder(key).group_path(path.iter().copied()).build().unwrap();
		ResolvedSetting::default_for(&Arc::new(def))
	}

	#[test]
	fn test_fold_shares_prefixes_in_first_seen_order() {
		let tree = build_schema(vec![
			entry("company-name", &["Company", "Details"]),
			entry("logo", &["Company", "Branding"]),
			entry("address-1", &["Company", "Details"]),
			entry("language", &["System"]),
		]);

		let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
		assert_eq!(names, vec!["Company", "System"]);

		let company = &tree[0];
		assert!(company.settings.is_empty());
		let groups: Vec<&str> = company.groups.iter().map(|n| n.name.as_str()).collect();
		assert_eq!(groups, vec!["Details", "Branding"]);

		let details: Vec<&str> = company.groups[0].settings.iter().map(|s| s.key.as_str()).collect();
		assert_eq!(details, vec!["company-name", "address-1"]);
		assert_eq!(tree[1].settings[0].key, "language");
	}

	#[test]
	fn test_fold_files_ungrouped_under_general() {
		let tree = build_schema(vec![entry("a", &[]), entry("b", &["Other"]), entry("c", &[])]);
		assert_eq!(tree[0].name, DEFAULT_GROUP);
		assert_eq!(tree[0].settings.len(), 2);
		assert_eq!(tree[1].name, "Other");
	}

	#[test]
	fn test_fold_attaches_leaf_and_children_to_same_node() {
		let tree = build_schema(vec![entry("a", &["X", "Y"]), entry("b", &["X"])]);
		assert_eq!(tree.len(), 1);
		assert_eq!(tree[0].settings[0].key, "b");
		assert_eq!(tree[0].groups[0].name, "Y");
		assert_eq!(tree[0].groups[0].settings[0].key, "a");
	}

	#[test]
	fn test_same_label_under_different_parents_stays_separate() {
		let tree = build_schema(vec![entry("a", &["X", "Common"]), entry("b", &["Y", "Common"])]);
		assert_eq!(tree.len(), 2);
		assert_eq!(tree[0].groups[0].settings.len(), 1);
		assert_eq!(tree[1].groups[0].settings.len(), 1);
	}

	#[test]
	fn test_empty_input() {
		assert!(build_schema(Vec::new()).is_empty());
	}
}

// vim: ts=4
