//! Thread-safe in-memory [`TokenCache`] implementation for single-process deployments and tests.

// self
use crate::{
	_prelude::*,
	cache::{CacheEntry, CacheError, CacheFuture, TokenCache},
};

type CacheMap = Arc<RwLock<HashMap<String, CacheEntry>>>;

/// Process-local cache that evicts entries lazily once their TTL elapses.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(CacheMap);
impl MemoryCache {
	/// Number of entries currently held, including ones whose TTL elapsed but were not yet read.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when the cache holds no entries.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn read_now(map: CacheMap, key: &str, now: OffsetDateTime) -> Option<Value> {
		{
			let guard = map.read();

			match guard.get(key) {
				Some(entry) if entry.is_live_at(now) => return Some(entry.value.clone()),
				Some(_) => {},
				None => return None,
			}
		}

		let mut guard = map.write();

		// Another writer may have replaced the entry between the two locks.
		if guard.get(key).is_some_and(|entry| !entry.is_live_at(now)) {
			guard.remove(key);
		}

		guard.get(key).map(|entry| entry.value.clone())
	}

	fn write_now(map: CacheMap, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
		map.write().insert(key.to_owned(), entry);

		Ok(())
	}
}
impl TokenCache for MemoryCache {
	fn read<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<Value>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::read_now(map, key, OffsetDateTime::now_utc())) })
	}

	fn write<'a>(&'a self, key: &'a str, value: Value, ttl: Duration) -> CacheFuture<'a, ()> {
		let map = self.0.clone();
		let entry = CacheEntry::new(value, ttl, OffsetDateTime::now_utc());

		Box::pin(async move { Self::write_now(map, key, entry?) })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn expired_entries_are_evicted_on_read() {
		let cache = MemoryCache::default();
		let written = macros::datetime!(2022-10-21 12:10 UTC);
		let entry = CacheEntry::new(Value::from("stale"), Duration::seconds(60), written)
			.expect("A one minute TTL should fit.");

		MemoryCache::write_now(cache.0.clone(), "key", entry)
			.expect("Writing into the memory cache should succeed.");

		assert_eq!(
			MemoryCache::read_now(cache.0.clone(), "key", written + Duration::seconds(30)),
			Some(Value::from("stale"))
		);
		assert_eq!(
			MemoryCache::read_now(cache.0.clone(), "key", written + Duration::seconds(60)),
			None
		);
		assert!(cache.is_empty());
	}

	#[tokio::test]
	async fn overflowing_ttl_leaves_cache_untouched() {
		let cache = MemoryCache::default();
		let err = cache
			.write("key", Value::from("forever"), Duration::MAX)
			.await
			.expect_err("An unbounded TTL should be rejected.");

		assert!(matches!(err, CacheError::InvalidTtl { .. }));
		assert!(cache.is_empty());
	}
}
