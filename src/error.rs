//! Client-level error types shared across configuration, token issuance, caches, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// HTTP statuses returned by the target API are never mapped into this type; they come back as
/// [`Response`](crate::client::Response) values so callers can inspect them directly.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Client assertion could not be produced.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Token cache failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
	/// Transport failure (DNS, TCP, TLS, timeout, malformed body).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}: {body}.")]
	AuthEndpoint {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Response body preview, useful for diagnosing rejected assertions.
		body: String,
	},
	/// Token endpoint answered successfully but the payload could not be decoded.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponse {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint reported a lifetime that cannot be turned into an expiry timestamp.
	#[error("Token lifetime of {seconds} seconds is out of range.")]
	TokenLifetime {
		/// Offending lifetime in seconds.
		seconds: i64,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required configuration field was never supplied.
	#[error("Missing required configuration field `{field}`.")]
	MissingField {
		/// Name of the omitted field.
		field: &'static str,
	},
	/// A configured host or path cannot be parsed as a URL.
	#[error("Configuration field `{field}` is not a valid URL.")]
	InvalidUrl {
		/// Name of the offending field.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The assertion lifetime is outside what NetSuite accepts.
	#[error("Token expiration must be between 1 and 3600 seconds, got {seconds}.")]
	InvalidTokenExpiration {
		/// Rejected lifetime in whole seconds.
		seconds: i64,
	},
	/// A request path cannot be joined onto the restlet host.
	#[error("Request path `{path}` cannot be resolved against the restlet host.")]
	InvalidPath {
		/// Caller-supplied path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A caller-supplied header name or value is invalid.
	#[error("Request header is invalid: {reason}.")]
	InvalidHeader {
		/// Human-readable reason.
		reason: String,
	},
	/// Request body could not be serialized as JSON.
	#[error("Request body could not be serialized as JSON.")]
	RequestBody(#[from] serde_json::Error),
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while producing the signed client assertion.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// The certificate private key is not a valid PEM-encoded RSA key.
	#[error("Certificate private key is not a valid RSA PEM key.")]
	InvalidKey(#[source] jsonwebtoken::errors::Error),
	/// JWT encoding or signing failed.
	#[error("Client assertion could not be signed.")]
	Encode(#[source] jsonwebtoken::errors::Error),
	/// `iat + token_expiration` does not fit in a Unix timestamp.
	#[error("Assertion lifetime of {seconds} seconds overflows the expiry claim.")]
	Lifetime {
		/// Configured lifetime in whole seconds.
		seconds: i64,
	},
}

/// Transport-level failures (network, timeout, IO, undecodable bodies).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Target URL of the failed request.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request exceeded its timeout budget.
	#[error("Request to {url} timed out.")]
	Timeout {
		/// Target URL of the timed-out request.
		url: String,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
	/// Response advertised JSON but the body could not be parsed.
	#[error("Response from {url} is not valid JSON.")]
	MalformedBody {
		/// Target URL of the request.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		url: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { url: url.into(), source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_field_error_names_the_field() {
		let err: Error = ConfigError::MissingField { field: "client_id" }.into();

		assert!(matches!(err, Error::Config(ConfigError::MissingField { field: "client_id" })));
		assert!(err.to_string().contains("client_id"));
	}

	#[test]
	fn cache_error_converts_into_client_error_with_source() {
		let cache_error =
			crate::cache::CacheError::Backend { message: "cache unreachable".into() };
		let err: Error = cache_error.clone().into();

		assert!(matches!(err, Error::Cache(_)));
		assert!(err.to_string().contains("cache unreachable"));

		let source = StdError::source(&err)
			.expect("Client error should expose the original cache error as its source.");

		assert_eq!(source.to_string(), cache_error.to_string());
	}
}
