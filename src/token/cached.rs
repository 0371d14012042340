//! Cached token entries and token endpoint responses.

// self
use crate::{_prelude::*, secret::Secret};

/// Token value persisted in the cache under [`CACHE_KEY`](crate::token::CACHE_KEY).
///
/// The access token is optional because older or foreign writers may leave it empty; such an
/// entry is never served.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
	/// Bearer token, if any.
	#[serde(default)]
	pub access_token: Option<Secret>,
	/// Absolute expiry.
	#[serde(with = "time::serde::timestamp")]
	pub expires_at: OffsetDateTime,
	/// Refresh token (never issued for client credentials, kept for shape compatibility).
	#[serde(default)]
	pub refresh_token: Option<Secret>,
	/// Token type reported by the endpoint, usually `Bearer`.
	#[serde(default)]
	pub token_type: Option<String>,
}
impl CachedToken {
	/// Returns the non-empty access token, if present.
	pub fn token(&self) -> Option<&str> {
		self.access_token.as_ref().filter(|secret| !secret.is_empty()).map(Secret::expose)
	}

	/// Returns `true` once `instant` reaches the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns the access token when it is non-empty and not expired at `instant`.
	pub fn usable_at(&self, instant: OffsetDateTime) -> Option<&str> {
		if self.is_expired_at(instant) { None } else { self.token() }
	}
}

/// Raw token endpoint payload.
///
/// NetSuite reports `expires_in` as a quoted number, so both shapes are accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default, deserialize_with = "seconds::deserialize")]
	expires_in: Option<i64>,
	#[serde(default)]
	expires_at: Option<i64>,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	token_type: Option<String>,
}
impl TokenResponse {
	/// Converts the payload into a cache entry.
	///
	/// Expiry preference: `expires_at`, then `now + expires_in`, then `now + fallback`. A lifetime
	/// that overflows the timestamp range is an [`Error::TokenLifetime`].
	pub(crate) fn into_cached(
		self,
		now: OffsetDateTime,
		fallback: Duration,
	) -> Result<CachedToken> {
		let absolute = self.expires_at.and_then(|at| OffsetDateTime::from_unix_timestamp(at).ok());
		let expires_at = match absolute {
			Some(at) => at,
			None => {
				let lifetime = self.expires_in.map(Duration::seconds).unwrap_or(fallback);

				now.checked_add(lifetime)
					.ok_or(Error::TokenLifetime { seconds: lifetime.whole_seconds() })?
			},
		};

		Ok(CachedToken {
			access_token: self.access_token.map(Secret::new),
			expires_at,
			refresh_token: self.refresh_token.map(Secret::new),
			token_type: self.token_type,
		})
	}
}

mod seconds {
	// crates.io
	use serde::{Deserialize, Deserializer, de::Error as _};

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Number(i64),
		Text(String),
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
	where
		D: Deserializer<'de>,
	{
		match Option::<Raw>::deserialize(deserializer)? {
			None => Ok(None),
			Some(Raw::Number(secs)) => Ok(Some(secs)),
			Some(Raw::Text(text)) => text.trim().parse().map(Some).map_err(D::Error::custom),
		}
	}
}
