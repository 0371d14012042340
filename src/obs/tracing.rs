// crates.io
use tracing::{Instrument, Span, instrument::Instrumented};
// self
use crate::{_prelude::*, http::Method};

/// Span wrapper used around each HTTP attempt.
///
/// Disabled spans are [`Span::none`], so instrumenting with them is a passthrough.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	span: Span,
}
impl RequestSpan {
	/// Creates a span tagged with the attempt's method, URL, and payload when `enabled`.
	pub fn new(enabled: bool, method: Method, url: &Url, payload: Option<&Value>) -> Self {
		if !enabled {
			return Self::disabled();
		}

		let payload = payload.map(Value::to_string).unwrap_or_default();
		let span = tracing::info_span!(
			"netsuite.request",
			method = method.as_str(),
			url = url.as_str(),
			request_payload = payload.as_str(),
			otel.kind = "client",
		);

		Self { span }
	}

	/// Span that records nothing.
	pub fn disabled() -> Self {
		Self { span: Span::none() }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		fut.instrument(self.span.clone())
	}
}
