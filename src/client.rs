//! Authenticated HTTP client for the restlet host.
//!
//! Every verb funnels into [`Client::execute`], which owns the whole protocol:
//!
//! 1. Ask the [`TokenIssuer`] for a token (cached tokens allowed) and send the request with
//!    `Authorization: Bearer <token>`.
//! 2. On a 401, ask for a fresh token with the cache bypassed and send the request once more.
//! 3. Return whichever response came last. Non-401 statuses are never retried and statuses are
//!    never turned into errors; only transport, token, and configuration failures are.
//!
//! The cache-bypass decision is local to each call, so concurrent callers sharing one client
//! never influence each other.

pub mod response;

pub use response::*;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use oauth2::http::{
	Request,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::ConfigError,
	http::{HeaderMap, HeaderValue, HttpRequest, HttpTransport, Method},
	obs::{self, RequestOutcome, RequestSpan},
	token::TokenIssuer,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Client specialized for the crate's default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestNetSuiteClient = Client<ReqwestTransport>;

const JSON: &str = "application/json";

/// Executes authenticated requests against the restlet host.
pub struct Client<T>
where
	T: ?Sized + HttpTransport,
{
	config: ClientConfig,
	transport: Arc<T>,
	issuer: TokenIssuer<T>,
	retry_count: AtomicU64,
}
impl<T> Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that sends every request, token fetches included, through `transport`.
	pub fn with_transport(config: ClientConfig, transport: impl Into<Arc<T>>) -> Self {
		let transport = transport.into();
		let issuer = TokenIssuer::new(transport.clone(), config.request_timeout);

		Self { config, transport, issuer, retry_count: AtomicU64::new(0) }
	}

	/// Configuration the client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Number of 401-triggered retries performed by this instance so far.
	pub fn retry_count(&self) -> u64 {
		self.retry_count.load(Ordering::Relaxed)
	}

	/// Sends a `GET` with `params` appended to the query string.
	pub async fn get(
		&self,
		path: &str,
		params: &[(&str, &str)],
		headers: &HeaderMap,
	) -> Result<Response> {
		self.execute(Method::Get, path, params, None, headers).await
	}

	/// Sends a `HEAD` with `params` appended to the query string.
	pub async fn head(
		&self,
		path: &str,
		params: &[(&str, &str)],
		headers: &HeaderMap,
	) -> Result<Response> {
		self.execute(Method::Head, path, params, None, headers).await
	}

	/// Sends a `DELETE` with `params` appended to the query string.
	pub async fn delete(
		&self,
		path: &str,
		params: &[(&str, &str)],
		headers: &HeaderMap,
	) -> Result<Response> {
		self.execute(Method::Delete, path, params, None, headers).await
	}

	/// Sends a `POST` with `body` serialized as JSON.
	pub async fn post<B>(&self, path: &str, body: &B, headers: &HeaderMap) -> Result<Response>
	where
		B: ?Sized + Serialize,
	{
		self.execute_with_body(Method::Post, path, body, headers).await
	}

	/// Sends a `PUT` with `body` serialized as JSON.
	pub async fn put<B>(&self, path: &str, body: &B, headers: &HeaderMap) -> Result<Response>
	where
		B: ?Sized + Serialize,
	{
		self.execute_with_body(Method::Put, path, body, headers).await
	}

	/// Sends a `PATCH` with `body` serialized as JSON.
	pub async fn patch<B>(&self, path: &str, body: &B, headers: &HeaderMap) -> Result<Response>
	where
		B: ?Sized + Serialize,
	{
		self.execute_with_body(Method::Patch, path, body, headers).await
	}

	/// Runs one logical request: token injection plus at most one retry after a 401.
	///
	/// `path` is resolved against the restlet host and may carry its own query string; `params`
	/// are sorted by key and appended to it. `body` is ignored for verbs without a body, and a
	/// JSON `null` body sends no payload.
	pub async fn execute(
		&self,
		method: Method,
		path: &str,
		params: &[(&str, &str)],
		body: Option<&Value>,
		headers: &HeaderMap,
	) -> Result<Response> {
		let url = self.resolve(path, params)?;
		let body = body.filter(|value| method.has_body() && !value.is_null());
		let payload = body.map(serde_json::to_vec).transpose().map_err(ConfigError::from)?;
		let first = self.attempt(method, &url, body, payload.as_deref(), headers, false).await?;

		if !first.is_unauthorized() {
			return Ok(first);
		}

		let retries = self.retry_count.fetch_add(1, Ordering::Relaxed) + 1;

		tracing::debug!(
			method = method.as_str(),
			url = %url,
			retries,
			"Bearer token rejected; retrying once with a fresh token."
		);

		self.attempt(method, &url, body, payload.as_deref(), headers, true).await
	}

	async fn execute_with_body<B>(
		&self,
		method: Method,
		path: &str,
		body: &B,
		headers: &HeaderMap,
	) -> Result<Response>
	where
		B: ?Sized + Serialize,
	{
		let body = serde_json::to_value(body).map_err(ConfigError::from)?;

		self.execute(method, path, &[], Some(&body), headers).await
	}

	async fn attempt(
		&self,
		method: Method,
		url: &Url,
		body: Option<&Value>,
		payload: Option<&[u8]>,
		headers: &HeaderMap,
		skip_cache: bool,
	) -> Result<Response> {
		let span = RequestSpan::new(self.config.trace_requests, method, url, body);
		let result: Result<Response> = span
			.instrument(async {
				let token = self.issuer.issue(&self.config.oauth, skip_cache).await?;
				let request = build_request(method, url, payload, headers, &token)?;

				self.log_request(&request);

				let raw = self.transport.execute(request, self.config.request_timeout).await?;
				let response = Response::from_http(url, raw)?;

				self.log_response(&response);

				Ok(response)
			})
			.await;
		let outcome = match &result {
			Ok(response) => RequestOutcome::from_status(response.status),
			Err(_) => RequestOutcome::Error,
		};

		obs::record_request_outcome(method, outcome);

		result
	}

	fn resolve(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
		let mut url = self
			.config
			.restlet
			.api_host
			.join(path)
			.map_err(|source| ConfigError::InvalidPath { path: path.into(), source })?;

		if !params.is_empty() {
			let mut sorted = params.to_vec();

			sorted.sort_by(|a, b| a.0.cmp(b.0));
			url.query_pairs_mut().extend_pairs(sorted);
		}

		Ok(url)
	}

	fn log_request(&self, request: &HttpRequest) {
		let Some(logger) = self.config.request_logger() else {
			return;
		};
		let level = self.config.log_level;

		logger.log(level, &format!("request: {} {}", request.method(), request.uri()));
		logger.log(level, &format!("request: {}", render_headers(request.headers())));

		if !request.body().is_empty() {
			logger.log(level, &format!("request: {}", String::from_utf8_lossy(request.body())));
		}
	}

	fn log_response(&self, response: &Response) {
		let Some(logger) = self.config.request_logger() else {
			return;
		};
		let level = self.config.log_level;

		logger.log(level, &format!("response: Status {}", response.status));
		logger.log(level, &format!("response: {}", render_headers(&response.headers)));

		match &response.body {
			ResponseBody::Empty => {},
			ResponseBody::Json(value) => logger.log(level, &format!("response: {value}")),
			ResponseBody::Raw(bytes) =>
				logger.log(level, &format!("response: {}", String::from_utf8_lossy(bytes))),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a client backed by a fresh reqwest client that never follows redirects.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;

		Ok(Self::with_transport(config, ReqwestTransport::with_client(client)))
	}
}
impl<T> Debug for Client<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &self.config)
			.field("retry_count", &self.retry_count())
			.finish()
	}
}

/// Default JSON headers, then caller headers (replacing defaults by name), then the token.
fn build_request(
	method: Method,
	url: &Url,
	payload: Option<&[u8]>,
	headers: &HeaderMap,
	token: &str,
) -> Result<HttpRequest> {
	let mut merged = HeaderMap::new();

	merged.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
	merged.insert(ACCEPT, HeaderValue::from_static(JSON));

	for name in headers.keys() {
		merged.remove(name);

		for value in headers.get_all(name) {
			merged.append(name.clone(), value.clone());
		}
	}

	let mut authorization = HeaderValue::try_from(format!("Bearer {token}"))
		.map_err(|e| ConfigError::InvalidHeader { reason: e.to_string() })?;

	authorization.set_sensitive(true);
	merged.insert(AUTHORIZATION, authorization);

	let mut request = Request::builder()
		.method(oauth2::http::Method::from(method))
		.uri(url.as_str())
		.body(payload.map(<[u8]>::to_vec).unwrap_or_default())
		.map_err(ConfigError::from)?;

	*request.headers_mut() = merged;

	Ok(request)
}

fn render_headers(headers: &HeaderMap) -> String {
	headers
		.iter()
		.map(|(name, value)| {
			let value = if value.is_sensitive() {
				"<redacted>".into()
			} else {
				String::from_utf8_lossy(value.as_bytes()).into_owned()
			};

			format!("{name}: {value}")
		})
		.collect::<Vec<_>>()
		.join(" | ")
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::HeaderName;
	// self
	use super::*;

	fn url() -> Url {
		Url::parse("http://restlet.example.com/restlet").expect("Fixture URL should parse.")
	}

	#[test]
	fn request_headers_merge_defaults_caller_and_token() {
		let mut headers = HeaderMap::new();

		headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));
		headers.insert(HeaderName::from_static("x-trace"), HeaderValue::from_static("abc"));
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic spoofed"));

		let request = build_request(Method::Post, &url(), Some(b"{}"), &headers, "tok")
			.expect("Request should build.");

		assert_eq!(*request.method(), oauth2::http::Method::POST);
		assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
		assert_eq!(request.headers()[ACCEPT], "text/plain");
		assert_eq!(request.headers()["x-trace"], "abc");
		assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
		assert_eq!(request.body(), b"{}");
	}

	#[test]
	fn rendered_headers_redact_sensitive_values() {
		let request = build_request(Method::Get, &url(), None, &HeaderMap::new(), "tok")
			.expect("Request should build.");
		let rendered = render_headers(request.headers());

		assert!(rendered.contains("authorization: <redacted>"));
		assert!(rendered.contains("accept: application/json"));
		assert!(!rendered.contains("tok"));
	}

	#[test]
	fn tokens_with_control_characters_are_rejected() {
		let err = build_request(Method::Get, &url(), None, &HeaderMap::new(), "bad\ntoken")
			.expect_err("Header injection should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidHeader { .. })));
	}
}
