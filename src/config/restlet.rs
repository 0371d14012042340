//! Restlet host and dispatch path.

// self
use crate::{_prelude::*, error::ConfigError};

/// Immutable restlet settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestletConfig {
	/// Host serving restlets, e.g. `https://<account>.restlets.api.netsuite.com`.
	///
	/// Its path always ends with `/`, so relative dispatch paths keep any base path.
	pub api_host: Url,
	/// Dispatch path, resolved against `api_host`.
	pub path: String,
}
impl RestletConfig {
	/// Path NetSuite uses to dispatch every restlet.
	pub const DEFAULT_PATH: &'static str = "app/site/hosting/restlet.nl";

	/// Returns a builder with every field unset.
	pub fn builder() -> RestletConfigBuilder {
		RestletConfigBuilder::default()
	}
}

/// Builder for [`RestletConfig`] values.
#[derive(Clone, Debug, Default)]
pub struct RestletConfigBuilder {
	api_host: Option<String>,
	path: Option<String>,
}
impl RestletConfigBuilder {
	/// Sets the restlet host.
	pub fn api_host(mut self, host: impl Into<String>) -> Self {
		self.api_host = Some(host.into());

		self
	}

	/// Overrides the dispatch path.
	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<RestletConfig, ConfigError> {
		let raw_host = self.api_host.ok_or(ConfigError::MissingField { field: "api_host" })?;
		let mut api_host = Url::parse(&raw_host)
			.map_err(|source| ConfigError::InvalidUrl { field: "api_host", source })?;

		if !api_host.path().ends_with('/') {
			let path = format!("{}/", api_host.path());

			api_host.set_path(&path);
		}

		Ok(RestletConfig {
			api_host,
			path: self.path.unwrap_or_else(|| RestletConfig::DEFAULT_PATH.into()),
		})
	}
}
