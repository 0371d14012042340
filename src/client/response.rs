//! Responses returned by the authenticated client.

// crates.io
use oauth2::http::header::CONTENT_TYPE;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{HeaderMap, HttpResponse},
};

/// Decoded response body.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
	/// No body bytes were returned.
	Empty,
	/// Body parsed from a `*/json` (or `*+json`) content type.
	Json(Value),
	/// Any other body, untouched.
	Raw(Vec<u8>),
}

/// Completed HTTP exchange with the target API.
///
/// Every status, including 4xx/5xx, is represented here; callers inspect [`Response::status`].
#[derive(Clone, Debug)]
pub struct Response {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Decoded body.
	pub body: ResponseBody,
}
impl Response {
	/// Decodes a raw transport response for `url`.
	pub fn from_http(url: &Url, response: HttpResponse) -> Result<Self, TransportError> {
		let status = response.status().as_u16();
		let (parts, bytes) = response.into_parts();
		let body = if bytes.is_empty() {
			ResponseBody::Empty
		} else if is_json(&parts.headers) {
			let value = serde_json::from_slice(&bytes).map_err(|source| {
				TransportError::MalformedBody { url: url.to_string(), source }
			})?;

			ResponseBody::Json(value)
		} else {
			ResponseBody::Raw(bytes)
		};

		Ok(Self { status, headers: parts.headers, body })
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` for 401 responses.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// Returns the parsed JSON body, if any.
	pub fn json(&self) -> Option<&Value> {
		match &self.body {
			ResponseBody::Json(value) => Some(value),
			_ => None,
		}
	}

	/// Deserializes the JSON body into `D`.
	pub fn json_as<D>(&self) -> Option<Result<D, serde_json::Error>>
	where
		D: for<'de> Deserialize<'de>,
	{
		self.json().map(D::deserialize)
	}
}

/// Matches `application/json`, `text/json`, and structured suffixes like `application/vnd+json`.
fn is_json(headers: &HeaderMap) -> bool {
	let Some(raw) = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()) else {
		return false;
	};
	let essence = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

	essence.ends_with("/json") || essence.ends_with("+json")
}
