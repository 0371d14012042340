//! Cache contracts and built-in cache implementations for OAuth access tokens.

pub mod file;
pub mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

// self
use crate::_prelude::*;

/// Boxed future returned by [`TokenCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Key/value capability used by the token issuer to persist access tokens between calls.
///
/// Values are opaque JSON documents. Implementations honor the TTL passed to
/// [`write`](TokenCache::write): once it elapses, [`read`](TokenCache::read) returns `None`.
/// Concurrent writers race and the last write wins.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if present and not yet evicted.
	fn read<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<Value>>;

	/// Stores `value` under `key`, replacing any previous entry, for at most `ttl`.
	fn write<'a>(&'a self, key: &'a str, value: Value, ttl: Duration) -> CacheFuture<'a, ()>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// The requested TTL pushes the eviction instant out of range.
	#[error("TTL of {seconds} seconds is out of range.")]
	InvalidTtl {
		/// Requested TTL in whole seconds.
		seconds: i64,
	},
}

/// Stored value plus its absolute eviction instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CacheEntry {
	pub(crate) value: Value,
	#[serde(with = "time::serde::timestamp")]
	pub(crate) expires_at: OffsetDateTime,
}
impl CacheEntry {
	pub(crate) fn new(
		value: Value,
		ttl: Duration,
		now: OffsetDateTime,
	) -> Result<Self, CacheError> {
		let expires_at = now
			.checked_add(ttl)
			.ok_or(CacheError::InvalidTtl { seconds: ttl.whole_seconds() })?;

		Ok(Self { value, expires_at })
	}

	pub(crate) fn is_live_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}
}
