// self
use crate::{
	http::Method,
	obs::{RequestOutcome, TokenSource},
};

/// Records an attempt outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(method: Method, outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"netsuite_request_total",
			"method" => method.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (method, outcome);
	}
}

/// Records where an issued token came from via the global metrics recorder (when enabled).
pub fn record_token_source(source: TokenSource) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("netsuite_token_total", "source" => source.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = source;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_installed_recorder() {
		record_request_outcome(Method::Get, RequestOutcome::Unauthorized);
		record_token_source(TokenSource::Cache);
	}
}
