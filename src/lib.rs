//! NetSuite restlet client with certificate-based OAuth 2.0 client credentials, token caching,
//! and a single transparent retry when a bearer token is rejected.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod restlet;
pub mod secret;
pub mod token;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	use oauth2::http::{Response, header::CONTENT_TYPE};
	// self
	use crate::{
		cache::TokenCache,
		config::{ClientConfig, OAuthConfig, RestletConfig},
		error::TransportError,
		http::{HeaderMap, HttpRequest, HttpResponse, HttpTransport, TransportFuture},
	};
	#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

	/// PEM-encoded RSA private key used to sign test assertions.
	pub const TEST_PRIVATE_KEY: &str = include_str!("../tests/fixtures/test_rsa_private.pem");
	/// Public half of [`TEST_PRIVATE_KEY`], for verifying signed assertions.
	pub const TEST_PUBLIC_KEY: &str = include_str!("../tests/fixtures/test_rsa_public.pem");
	/// Client ID used by the test configurations.
	pub const TEST_CLIENT_ID: &str = "a_client_id";
	/// Certificate ID used by the test configurations.
	pub const TEST_CERTIFICATE_ID: &str = "a_certificate_id";

	/// Request observed by a [`ScriptedTransport`].
	#[derive(Clone, Debug)]
	pub struct RecordedRequest {
		/// Uppercase HTTP verb.
		pub method: String,
		/// Absolute request URL.
		pub url: String,
		/// Request headers.
		pub headers: HeaderMap,
		/// Raw body bytes.
		pub body: Vec<u8>,
		/// Timeout the caller asked for.
		pub timeout: Duration,
	}
	impl RecordedRequest {
		/// Returns the header value as text, if present.
		pub fn header(&self, name: &str) -> Option<&str> {
			self.headers.get(name).and_then(|value| value.to_str().ok())
		}

		/// Returns the body as UTF-8 text.
		pub fn body_text(&self) -> String {
			String::from_utf8_lossy(&self.body).into_owned()
		}

		/// Decodes a form-urlencoded body into ordered pairs.
		pub fn form(&self) -> Vec<(String, String)> {
			url::form_urlencoded::parse(&self.body).into_owned().collect()
		}

		/// Returns the first value of form field `name`.
		pub fn form_value(&self, name: &str) -> Option<String> {
			self.form().into_iter().find(|(key, _)| key == name).map(|(_, value)| value)
		}
	}

	/// [`HttpTransport`] that replays queued responses and records every request.
	///
	/// Running out of scripted responses yields a network error.
	#[derive(Debug, Default)]
	pub struct ScriptedTransport {
		responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
		requests: Mutex<Vec<RecordedRequest>>,
	}
	impl ScriptedTransport {
		/// Queues a response with the given status, content type, and body.
		pub fn respond(&self, status: u16, content_type: &str, body: &str) -> &Self {
			self.responses.lock().push_back(Ok(http_response(status, content_type, body)));

			self
		}

		/// Queues a JSON response.
		pub fn respond_json(&self, status: u16, body: &Value) -> &Self {
			self.respond(status, "application/json", &body.to_string())
		}

		/// Queues a successful token endpoint response.
		pub fn respond_token(&self, token: &str) -> &Self {
			self.respond_json(200, &token_body(token, 3600))
		}

		/// Queues a transport failure.
		pub fn fail(&self, error: TransportError) -> &Self {
			self.responses.lock().push_back(Err(error));

			self
		}

		/// Every request seen so far, oldest first.
		pub fn requests(&self) -> Vec<RecordedRequest> {
			self.requests.lock().clone()
		}

		/// Requests whose URL path ends with `suffix`.
		pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
			self.requests()
				.into_iter()
				.filter(|request| {
					Url::parse(&request.url).is_ok_and(|url| url.path().ends_with(suffix))
				})
				.collect()
		}

		/// Number of responses still queued.
		pub fn remaining(&self) -> usize {
			self.responses.lock().len()
		}
	}
	impl HttpTransport for ScriptedTransport {
		fn execute(
			&self,
			request: HttpRequest,
			timeout: Duration,
		) -> TransportFuture<'_, HttpResponse> {
			let (parts, body) = request.into_parts();
			let url = parts.uri.to_string();

			self.requests.lock().push(RecordedRequest {
				method: parts.method.to_string(),
				url: url.clone(),
				headers: parts.headers,
				body,
				timeout,
			});

			let next = self.responses.lock().pop_front();

			Box::pin(async move {
				next.unwrap_or_else(|| {
					Err(TransportError::network(
						url,
						std::io::Error::other("No scripted response left."),
					))
				})
			})
		}
	}

	/// Builds a raw transport response.
	pub fn http_response(status: u16, content_type: &str, body: &str) -> HttpResponse {
		Response::builder()
			.status(status)
			.header(CONTENT_TYPE, content_type)
			.body(body.as_bytes().to_vec())
			.expect("Test response should build.")
	}

	/// Token endpoint payload mirroring NetSuite's quoted `expires_in`.
	pub fn token_body(token: &str, expires_in: i64) -> Value {
		serde_json::json!({
			"access_token": token,
			"expires_in": expires_in.to_string(),
			"token_type": "Bearer",
		})
	}

	/// OAuth configuration signed with [`TEST_PRIVATE_KEY`].
	pub fn test_oauth_config(api_host: &str, cache: Option<Arc<dyn TokenCache>>) -> OAuthConfig {
		let builder = OAuthConfig::builder()
			.api_host(api_host)
			.client_id(TEST_CLIENT_ID)
			.certificate_id(TEST_CERTIFICATE_ID)
			.certificate_private_key(TEST_PRIVATE_KEY);
		let builder = match cache {
			Some(cache) => builder.cache(cache),
			None => builder.without_cache(),
		};

		builder.build().expect("Test OAuth configuration should build.")
	}

	/// Client configuration with both hosts pointing at `api_host`.
	pub fn test_client_config(
		api_host: &str,
		cache: Option<Arc<dyn TokenCache>>,
		restlet_path: &str,
	) -> ClientConfig {
		let restlet = RestletConfig::builder()
			.api_host(api_host)
			.path(restlet_path)
			.build()
			.expect("Test restlet configuration should build.");

		ClientConfig::builder()
			.oauth(test_oauth_config(api_host, cache))
			.restlet(restlet)
			.build()
			.expect("Test client configuration should build.")
	}

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tracing_subscriber as _};
