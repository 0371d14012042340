//! OAuth client-credentials settings used by the token issuer.

// self
use crate::{_prelude::*, cache::TokenCache, error::ConfigError, secret::Secret};

/// Token endpoint path appended to the OAuth API host.
pub const TOKEN_PATH: &str = "services/rest/auth/oauth2/v1/token";

/// Immutable OAuth settings.
///
/// Built through [`OAuthConfig::builder`]; every field except `token_expiration` is required.
#[derive(Clone)]
pub struct OAuthConfig {
	/// Host serving the OAuth token endpoint.
	pub api_host: Url,
	/// Fully resolved token endpoint, also used as the assertion audience.
	pub token_endpoint: Url,
	/// Client ID of the integration record; used as the assertion issuer.
	pub client_id: String,
	/// Certificate ID from the client-credentials mapping; used as the JWT `kid`.
	pub certificate_id: String,
	/// Cache that persists issued tokens; `None` when caching was explicitly disabled.
	pub cache: Option<Arc<dyn TokenCache>>,
	/// Lifetime requested for each assertion and used as the cache TTL.
	pub token_expiration: Duration,
	certificate_private_key: Secret,
}
impl OAuthConfig {
	/// Default assertion lifetime.
	pub const DEFAULT_TOKEN_EXPIRATION: Duration = Duration::seconds(3600);
	/// Longest assertion lifetime NetSuite accepts.
	pub const MAX_TOKEN_EXPIRATION: Duration = Duration::seconds(3600);

	/// Returns a builder with every field unset.
	pub fn builder() -> OAuthConfigBuilder {
		OAuthConfigBuilder::default()
	}

	/// PEM-encoded RSA private key used to sign client assertions.
	pub fn certificate_private_key(&self) -> &Secret {
		&self.certificate_private_key
	}
}
impl Debug for OAuthConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthConfig")
			.field("api_host", &self.api_host.as_str())
			.field("client_id", &self.client_id)
			.field("certificate_id", &self.certificate_id)
			.field("certificate_private_key", &self.certificate_private_key)
			.field("cache_enabled", &self.cache.is_some())
			.field("token_expiration", &self.token_expiration)
			.finish()
	}
}

/// Builder for [`OAuthConfig`] values.
#[derive(Default)]
pub struct OAuthConfigBuilder {
	api_host: Option<String>,
	client_id: Option<String>,
	certificate_id: Option<String>,
	certificate_private_key: Option<String>,
	cache: Option<Option<Arc<dyn TokenCache>>>,
	token_expiration: Option<Duration>,
}
impl OAuthConfigBuilder {
	/// Sets the OAuth API host, e.g. `https://<account>.suitetalk.api.netsuite.com`.
	pub fn api_host(mut self, host: impl Into<String>) -> Self {
		self.api_host = Some(host.into());

		self
	}

	/// Sets the integration client ID.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the certificate ID.
	pub fn certificate_id(mut self, certificate_id: impl Into<String>) -> Self {
		self.certificate_id = Some(certificate_id.into());

		self
	}

	/// Sets the PEM-encoded RSA private key.
	pub fn certificate_private_key(mut self, pem: impl Into<String>) -> Self {
		self.certificate_private_key = Some(pem.into());

		self
	}

	/// Sets the token cache.
	pub fn cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
		self.cache = Some(Some(cache));

		self
	}

	/// Explicitly disables token caching; every request then fetches a fresh token.
	pub fn without_cache(mut self) -> Self {
		self.cache = Some(None);

		self
	}

	/// Overrides the assertion lifetime (defaults to one hour, must be within 1..=3600 seconds).
	pub fn token_expiration(mut self, expiration: Duration) -> Self {
		self.token_expiration = Some(expiration);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<OAuthConfig, ConfigError> {
		let raw_host = self.api_host.ok_or(ConfigError::MissingField { field: "api_host" })?;
		let client_id = self.client_id.ok_or(ConfigError::MissingField { field: "client_id" })?;
		let certificate_id =
			self.certificate_id.ok_or(ConfigError::MissingField { field: "certificate_id" })?;
		let certificate_private_key = self
			.certificate_private_key
			.ok_or(ConfigError::MissingField { field: "certificate_private_key" })?;
		let cache = self.cache.ok_or(ConfigError::MissingField { field: "cache" })?;
		let api_host = Url::parse(&raw_host)
			.map_err(|source| ConfigError::InvalidUrl { field: "api_host", source })?;
		let token_endpoint = token_endpoint(&api_host)?;
		let token_expiration =
			self.token_expiration.unwrap_or(OAuthConfig::DEFAULT_TOKEN_EXPIRATION);

		if token_expiration < Duration::SECOND
			|| token_expiration > OAuthConfig::MAX_TOKEN_EXPIRATION
		{
			return Err(ConfigError::InvalidTokenExpiration {
				seconds: token_expiration.whole_seconds(),
			});
		}

		Ok(OAuthConfig {
			api_host,
			token_endpoint,
			client_id,
			certificate_id,
			cache,
			token_expiration,
			certificate_private_key: Secret::new(certificate_private_key),
		})
	}
}

/// Appends [`TOKEN_PATH`] to the host with exactly one separating slash, keeping any base path.
fn token_endpoint(api_host: &Url) -> Result<Url, ConfigError> {
	let joined = format!("{}/{TOKEN_PATH}", api_host.as_str().trim_end_matches('/'));

	Url::parse(&joined).map_err(|source| ConfigError::InvalidUrl { field: "api_host", source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::cache::MemoryCache;

	fn complete() -> OAuthConfigBuilder {
		OAuthConfig::builder()
			.api_host("http://oauth.example.com")
			.client_id("a_client_id")
			.certificate_id("aaaaaaaaaaaa")
			.certificate_private_key("bbbbbbbbbbbb")
			.cache(Arc::new(MemoryCache::default()))
	}

	#[test]
	fn defaults_token_expiration_to_one_hour() {
		let config = complete().build().expect("Complete OAuth config should build.");

		assert_eq!(config.token_expiration, Duration::seconds(3600));
		assert!(config.cache.is_some());
	}

	#[test]
	fn keeps_provided_token_expiration() {
		let config = complete()
			.token_expiration(Duration::seconds(12))
			.build()
			.expect("Complete OAuth config should build.");

		assert_eq!(config.token_expiration, Duration::seconds(12));
	}

	#[test]
	fn rejects_token_expiration_outside_netsuite_bounds() {
		for (expiration, seconds) in [
			(Duration::ZERO, 0),
			(Duration::milliseconds(500), 0),
			(Duration::seconds(-30), -30),
			(Duration::seconds(3601), 3601),
			(Duration::MAX, i64::MAX),
		] {
			let err = complete()
				.token_expiration(expiration)
				.build()
				.expect_err("Out-of-range expiration should be rejected.");

			assert!(
				matches!(err, ConfigError::InvalidTokenExpiration { seconds: s } if s == seconds),
				"Expected {seconds} s to be rejected, got {err:?}."
			);
		}

		let config = complete()
			.token_expiration(Duration::seconds(3600))
			.build()
			.expect("The upper bound itself should be accepted.");

		assert_eq!(config.token_expiration, OAuthConfig::MAX_TOKEN_EXPIRATION);
	}

	#[test]
	fn token_endpoint_joins_like_a_path() {
		let config = complete().build().expect("Complete OAuth config should build.");

		assert_eq!(
			config.token_endpoint.as_str(),
			"http://oauth.example.com/services/rest/auth/oauth2/v1/token"
		);

		let nested = complete()
			.api_host("https://acct.example.com/base/")
			.build()
			.expect("Host with a base path should build.");

		assert_eq!(
			nested.token_endpoint.as_str(),
			"https://acct.example.com/base/services/rest/auth/oauth2/v1/token"
		);
	}

	#[test]
	fn missing_fields_are_named() {
		let cases: [(&str, OAuthConfigBuilder); 5] = [
			("api_host", OAuthConfigBuilder { api_host: None, ..complete() }),
			("client_id", OAuthConfigBuilder { client_id: None, ..complete() }),
			("certificate_id", OAuthConfigBuilder { certificate_id: None, ..complete() }),
			(
				"certificate_private_key",
				OAuthConfigBuilder { certificate_private_key: None, ..complete() },
			),
			("cache", OAuthConfigBuilder { cache: None, ..complete() }),
		];

		for (expected, builder) in cases {
			let err = builder.build().expect_err("Incomplete OAuth config should be rejected.");

			assert!(
				matches!(err, ConfigError::MissingField { field } if field == expected),
				"Expected missing `{expected}`, got {err:?}."
			);
			assert!(err.to_string().contains(expected));
		}
	}

	#[test]
	fn without_cache_satisfies_the_cache_requirement() {
		let config = OAuthConfigBuilder { cache: None, ..complete() }
			.without_cache()
			.build()
			.expect("Explicitly cacheless config should build.");

		assert!(config.cache.is_none());
	}

	#[test]
	fn debug_redacts_private_key() {
		let config = complete().build().expect("Complete OAuth config should build.");
		let rendered = format!("{config:?}");

		assert!(!rendered.contains("bbbbbbbbbbbb"));
		assert!(rendered.contains("<redacted>"));
	}

	#[test]
	fn rejects_unparseable_host() {
		let err = complete()
			.api_host("not a url")
			.build()
			.expect_err("Unparseable host should be rejected.");

		assert!(matches!(err, ConfigError::InvalidUrl { field: "api_host", .. }));
	}
}
