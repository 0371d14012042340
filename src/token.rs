//! Bearer token issuance with cache reuse and signed client-credentials grants.
//!
//! [`TokenIssuer::issue`] first consults the configured [`TokenCache`](crate::cache::TokenCache)
//! (unless told to skip it), then falls back to the NetSuite token endpoint using an RS512 JWT
//! assertion. Fresh tokens are written back to the cache unconditionally. The issuer never
//! retries on its own; callers that observe a rejected token ask again with `skip_cache`.

pub mod assertion;
pub mod cached;

pub use cached::CachedToken;

// crates.io
use oauth2::http::{
	Request,
	header::{ACCEPT, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	cache::CacheError,
	config::OAuthConfig,
	error::ConfigError,
	http::HttpTransport,
	obs::{self, TokenSource},
	token::cached::TokenResponse,
};

/// Cache key under which the current token is stored.
pub const CACHE_KEY: &str = "net_suite_oauth_access_token";

const GRANT_TYPE: &str = "client_credentials";
const BODY_PREVIEW_LIMIT: usize = 512;

/// Produces bearer tokens for one transport.
pub struct TokenIssuer<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	timeout: Duration,
}
impl<T> TokenIssuer<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates an issuer whose token endpoint calls are bounded by `timeout`.
	pub fn new(transport: impl Into<Arc<T>>, timeout: Duration) -> Self {
		Self { transport: transport.into(), timeout }
	}

	/// Returns a usable bearer token for `config`.
	///
	/// With `skip_cache == false` a cached token that is non-empty and not yet expired is returned
	/// without any network call or cache write. Otherwise a new token is fetched and written to
	/// the cache (when one is configured).
	pub async fn issue(&self, config: &OAuthConfig, skip_cache: bool) -> Result<String> {
		let now = OffsetDateTime::now_utc();

		if !skip_cache {
			if let Some(token) = self.cached_token(config, now).await? {
				obs::record_token_source(TokenSource::Cache);

				return Ok(token);
			}
		}

		let token = self.fetch_token(config, now).await?;

		if token.token().is_none() {
			tracing::warn!(
				client_id = %config.client_id,
				"Token endpoint returned a token without an access token value."
			);
		}
		if let Some(cache) = config.cache.as_deref() {
			let value = serde_json::to_value(&token)
				.map_err(|e| CacheError::Serialization { message: e.to_string() })?;

			cache.write(CACHE_KEY, value, config.token_expiration).await?;
		}

		obs::record_token_source(TokenSource::Endpoint);

		Ok(token.access_token.map(|secret| secret.expose().to_owned()).unwrap_or_default())
	}

	async fn cached_token(
		&self,
		config: &OAuthConfig,
		now: OffsetDateTime,
	) -> Result<Option<String>> {
		let Some(cache) = config.cache.as_deref() else {
			return Ok(None);
		};
		let Some(value) = cache.read(CACHE_KEY).await? else {
			return Ok(None);
		};
		let cached = match serde_json::from_value::<CachedToken>(value) {
			Ok(cached) => cached,
			Err(e) => {
				tracing::warn!(key = CACHE_KEY, error = %e, "Ignoring undecodable cached token.");

				return Ok(None);
			},
		};

		if cached.token().is_none() {
			tracing::warn!(key = CACHE_KEY, "Cached OAuth access token has no token.");

			return Ok(None);
		}

		Ok(cached.usable_at(now).map(str::to_owned))
	}

	async fn fetch_token(&self, config: &OAuthConfig, now: OffsetDateTime) -> Result<CachedToken> {
		let assertion = assertion::sign(config, now)?;
		let form = form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", GRANT_TYPE)
			.append_pair("client_assertion_type", assertion::CLIENT_ASSERTION_TYPE)
			.append_pair("client_assertion", &assertion)
			.finish();
		let request = Request::post(config.token_endpoint.as_str())
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.header(ACCEPT, "application/json")
			.body(form.into_bytes())
			.map_err(ConfigError::from)?;
		let response = self.transport.execute(request, self.timeout).await?;
		let status = response.status().as_u16();

		if !response.status().is_success() {
			return Err(Error::AuthEndpoint { status, body: body_preview(response.body()) });
		}

		let mut deserializer = serde_json::Deserializer::from_slice(response.body());
		let parsed: TokenResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::TokenResponse { status, source })?;

		parsed.into_cached(now, config.token_expiration)
	}
}
impl<T> Clone for TokenIssuer<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { transport: self.transport.clone(), timeout: self.timeout }
	}
}
impl<T> Debug for TokenIssuer<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenIssuer").field("timeout", &self.timeout).finish()
	}
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	match text.char_indices().nth(BODY_PREVIEW_LIMIT) {
		Some((idx, _)) => format!("{}...", &text[..idx]),
		None => text.into_owned(),
	}
}
