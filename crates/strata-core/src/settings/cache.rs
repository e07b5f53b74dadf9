//! Cache for aggregate settings reads, keyed by principal

use lru::LruCache;
use std::fmt::Debug;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::types::ResolvedSetting;

/// Resolved settings of one principal, in catalog order
pub type ResolvedSettings = Arc<Vec<ResolvedSetting>>;

pub trait SettingsCache: Debug + Send + Sync {
	fn get(&self, key: &str) -> Option<ResolvedSettings>;

	fn set(&self, key: &str, value: ResolvedSettings, ttl: Duration);

	fn forget(&self, key: &str);

	/// Invalidate all cached entries
	fn clear(&self);
}

#[derive(Debug)]
struct Entry {
	value: ResolvedSettings,
	expires_at: Instant,
}

/// In-process LRU cache with per-entry expiry
#[derive(Debug)]
pub struct LruSettingsCache {
	cache: parking_lot::RwLock<LruCache<String, Entry>>,
}

const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(1023);

impl LruSettingsCache {
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
		Self { cache: parking_lot::RwLock::new(LruCache::new(capacity)) }
	}

	pub fn len(&self) -> usize {
		self.cache.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.read().is_empty()
	}
}

impl SettingsCache for LruSettingsCache {
	fn get(&self, key: &str) -> Option<ResolvedSettings> {
		let mut cache = self.cache.write();
		match cache.get(key) {
			Some(entry) if entry.expires_at > Instant::now() => Some(Arc::clone(&entry.value)),
			Some(_) => {
				cache.pop(key);
				None
			}
			None => None,
		}
	}

	fn set(&self, key: &str, value: ResolvedSettings, ttl: Duration) {
		let Some(expires_at) = Instant::now().checked_add(ttl) else {
			return;
		};
		self.cache.write().put(key.to_string(), Entry { value, expires_at });
	}

	fn forget(&self, key: &str) {
		self.cache.write().pop(key);
	}

	fn clear(&self) {
		self.cache.write().clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry() -> ResolvedSettings {
		Arc::new(Vec::new())
	}

	#[test]
	fn test_get_returns_same_arc() {
		let cache = LruSettingsCache::new(4);
		let value = entry();
		cache.set("settings:-:-", Arc::clone(&value), Duration::from_secs(60));
		let hit = cache.get("settings:-:-").unwrap();
		assert!(Arc::ptr_eq(&hit, &value));
		assert!(cache.get("settings:1:-").is_none());
	}

	#[test]
	fn test_expired_entries_are_dropped() {
		let cache = LruSettingsCache::new(4);
		cache.set("k", entry(), Duration::ZERO);
		assert!(cache.get("k").is_none());
		assert!(cache.is_empty());
	}

	#[test]
	fn test_forget_and_clear() {
		let cache = LruSettingsCache::new(4);
		cache.set("a", entry(), Duration::from_secs(60));
		cache.set("b", entry(), Duration::from_secs(60));
		cache.forget("a");
		assert!(cache.get("a").is_none());
		assert_eq!(cache.len(), 1);
		cache.clear();
		assert!(cache.get("b").is_none());
	}

	#[test]
	fn test_capacity_evicts_least_recently_used() {
		let cache = LruSettingsCache::new(2);
		cache.set("a", entry(), Duration::from_secs(60));
		cache.set("b", entry(), Duration::from_secs(60));
		let _ = cache.get("a");
		cache.set("c", entry(), Duration::from_secs(60));
		assert!(cache.get("a").is_some());
		assert!(cache.get("b").is_none());
	}

	#[test]
	fn test_zero_capacity_falls_back_to_default() {
		let cache = LruSettingsCache::new(0);
		cache.set("a", entry(), Duration::from_secs(60));
		assert_eq!(cache.len(), 1);
	}
}

// vim: ts=4
