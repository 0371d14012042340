//! Immutable configuration values for the OAuth issuer, restlet dispatch, and the client.
//!
//! Every value is constructed once through a builder. Builders fail fast with
//! [`ConfigError::MissingField`] naming the first omitted required field.

pub mod oauth;
pub mod restlet;

pub use oauth::*;
pub use restlet::*;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	obs::{LogLevel, RequestLogger},
};

/// Top-level client configuration.
#[derive(Clone)]
pub struct ClientConfig {
	/// OAuth issuer settings.
	pub oauth: OAuthConfig,
	/// Restlet host and path.
	pub restlet: RestletConfig,
	/// Logger receiving request/response lines when `log_requests` is set.
	pub logger: Option<Arc<dyn RequestLogger>>,
	/// Logs request and response headers and bodies through `logger`.
	pub log_requests: bool,
	/// Level used for request/response logging.
	pub log_level: LogLevel,
	/// Wraps each HTTP attempt in a `tracing` span.
	pub trace_requests: bool,
	/// Timeout applied to every individual HTTP attempt, token fetches included.
	pub request_timeout: Duration,
}
impl ClientConfig {
	/// Default per-attempt timeout.
	pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::seconds(120);

	/// Returns a builder with every field unset.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Returns the logger when request logging is active.
	pub fn request_logger(&self) -> Option<&dyn RequestLogger> {
		if self.log_requests { self.logger.as_deref() } else { None }
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("oauth", &self.oauth)
			.field("restlet", &self.restlet)
			.field("logger_set", &self.logger.is_some())
			.field("log_requests", &self.log_requests)
			.field("log_level", &self.log_level)
			.field("trace_requests", &self.trace_requests)
			.field("request_timeout", &self.request_timeout)
			.finish()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Default)]
pub struct ClientConfigBuilder {
	oauth: Option<OAuthConfig>,
	restlet: Option<RestletConfig>,
	logger: Option<Arc<dyn RequestLogger>>,
	log_requests: bool,
	log_level: LogLevel,
	trace_requests: bool,
	request_timeout: Option<Duration>,
}
impl ClientConfigBuilder {
	/// Sets the OAuth settings.
	pub fn oauth(mut self, oauth: OAuthConfig) -> Self {
		self.oauth = Some(oauth);

		self
	}

	/// Sets the restlet settings.
	pub fn restlet(mut self, restlet: RestletConfig) -> Self {
		self.restlet = Some(restlet);

		self
	}

	/// Injects the request logger.
	pub fn logger(mut self, logger: Arc<dyn RequestLogger>) -> Self {
		self.logger = Some(logger);

		self
	}

	/// Toggles request/response logging (defaults to `false`).
	pub fn log_requests(mut self, enabled: bool) -> Self {
		self.log_requests = enabled;

		self
	}

	/// Overrides the request logging level (defaults to [`LogLevel::Info`]).
	pub fn log_level(mut self, level: LogLevel) -> Self {
		self.log_level = level;

		self
	}

	/// Toggles per-attempt tracing spans (defaults to `false`).
	pub fn trace_requests(mut self, enabled: bool) -> Self {
		self.trace_requests = enabled;

		self
	}

	/// Overrides the per-attempt timeout (defaults to 120 seconds).
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let oauth = self.oauth.ok_or(ConfigError::MissingField { field: "oauth" })?;
		let restlet = self.restlet.ok_or(ConfigError::MissingField { field: "restlet" })?;

		Ok(ClientConfig {
			oauth,
			restlet,
			logger: self.logger,
			log_requests: self.log_requests,
			log_level: self.log_level,
			trace_requests: self.trace_requests,
			request_timeout: self.request_timeout.unwrap_or(ClientConfig::DEFAULT_REQUEST_TIMEOUT),
		})
	}
}
