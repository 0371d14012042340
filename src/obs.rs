//! Observability hooks for the request pipeline.
//!
//! # Runtime Toggles
//!
//! - `trace_requests` on [`ClientConfig`](crate::config::ClientConfig) wraps every attempt in a
//!   `netsuite.request` span carrying `method`, `url`, and `request_payload` fields.
//! - `log_requests` plus an injected [`RequestLogger`] logs request/response lines, headers, and
//!   bodies at the configured [`LogLevel`].
//!
//! # Feature Flags
//!
//! - Enable `metrics` to increment `netsuite_request_total` (labeled by `method` + `outcome`) for
//!   every attempt and `netsuite_token_total` (labeled by `source`) for every issued token.

mod logger;
mod metrics;
mod tracing;

pub use logger::*;
pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each HTTP attempt against the target API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// 2xx response.
	Success,
	/// 401 response; triggers the single retry on a first attempt.
	Unauthorized,
	/// Any other non-success status.
	Failure,
	/// Transport or token failure; no response was observed.
	Error,
}
impl RequestOutcome {
	/// Classifies an HTTP status code.
	pub const fn from_status(status: u16) -> Self {
		match status {
			200..=299 => RequestOutcome::Success,
			401 => RequestOutcome::Unauthorized,
			_ => RequestOutcome::Failure,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Success => "success",
			RequestOutcome::Unauthorized => "unauthorized",
			RequestOutcome::Failure => "failure",
			RequestOutcome::Error => "error",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Where an issued bearer token came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenSource {
	/// Served from the token cache.
	Cache,
	/// Fetched from the OAuth token endpoint.
	Endpoint,
}
impl TokenSource {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenSource::Cache => "cache",
			TokenSource::Endpoint => "endpoint",
		}
	}
}
impl Display for TokenSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn outcome_classifies_statuses() {
		assert_eq!(RequestOutcome::from_status(204), RequestOutcome::Success);
		assert_eq!(RequestOutcome::from_status(401), RequestOutcome::Unauthorized);
		assert_eq!(RequestOutcome::from_status(403), RequestOutcome::Failure);
		assert_eq!(RequestOutcome::from_status(500).to_string(), "failure");
	}
}
