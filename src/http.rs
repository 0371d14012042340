//! Transport primitives shared by the token issuer and the authenticated client.
//!
//! [`HttpTransport`] is the crate's only dependency on an HTTP stack. Requests and responses are
//! the plain [`http`](oauth2::http) types re-exported by `oauth2`, so any client that can speak
//! them (reqwest, hyper, a test double) can be plugged in. The default implementation,
//! [`ReqwestTransport`], ships behind the `reqwest` feature.

// crates.io
pub use oauth2::{
	HttpRequest, HttpResponse,
	http::{HeaderMap, HeaderName, HeaderValue},
};
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// HTTP verbs supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `HEAD`
	Head,
	/// `DELETE`
	Delete,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
}
impl Method {
	/// Returns the canonical uppercase verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Head => "HEAD",
			Method::Delete => "DELETE",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
		}
	}

	/// Returns `true` for verbs that carry a request body.
	pub const fn has_body(self) -> bool {
		matches!(self, Method::Post | Method::Put | Method::Patch)
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<Method> for oauth2::http::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => Self::GET,
			Method::Head => Self::HEAD,
			Method::Delete => Self::DELETE,
			Method::Post => Self::POST,
			Method::Put => Self::PUT,
			Method::Patch => Self::PATCH,
		}
	}
}

/// Abstraction over HTTP transports.
///
/// Implementations execute exactly one request per call, never follow retries of their own, and
/// bound the whole exchange by `timeout`. Timeouts and connection failures surface as
/// [`TransportError`]; every HTTP status (including 4xx/5xx) is a successful call.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves once the full response body has been read.
	fn execute(&self, request: HttpRequest, timeout: Duration)
	-> TransportFuture<'_, HttpResponse>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(
		&self,
		request: HttpRequest,
		timeout: Duration,
	) -> TransportFuture<'_, HttpResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let url = request.uri().to_string();
			let mut request = reqwest::Request::try_from(request)
				.map_err(|e| TransportError::network(url.as_str(), e))?;

			*request.timeout_mut() = Some(timeout.unsigned_abs());

			let response =
				client.execute(request).await.map_err(|e| map_reqwest_error(&url, e))?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let bytes = response.bytes().await.map_err(|e| map_reqwest_error(&url, e))?;
			let mut response_new = HttpResponse::new(bytes.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(url: &str, e: ReqwestError) -> TransportError {
	if e.is_timeout() {
		TransportError::Timeout { url: url.to_owned() }
	} else {
		TransportError::network(url, e)
	}
}
