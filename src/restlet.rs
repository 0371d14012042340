//! Restlet dispatch on top of the authenticated client.
//!
//! A restlet is addressed by a `script`/`deploy` pair on a single fixed path. Query verbs send
//! the pair as query parameters; body verbs bake it into the path so the body stays untouched.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	client::{Client, Response},
	config::ClientConfig,
	http::{HeaderMap, HttpTransport},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Builds `"<path>?deploy=<deploy>&script=<script>"` with form-urlencoded values.
///
/// Keys are emitted in sorted order so the result is deterministic.
pub fn restlet_path(path: &str, script: &str, deploy: &str) -> String {
	let query = form_urlencoded::Serializer::new(String::new())
		.append_pair("deploy", deploy)
		.append_pair("script", script)
		.finish();

	format!("{path}?{query}")
}

/// Dispatches calls to NetSuite restlets.
pub struct Restlet<T>
where
	T: ?Sized + HttpTransport,
{
	client: Client<T>,
}
impl<T> Restlet<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a dispatcher that sends everything through `transport`.
	pub fn with_transport(config: ClientConfig, transport: impl Into<Arc<T>>) -> Self {
		Self::with_client(Client::with_transport(config, transport))
	}

	/// Wraps an existing client.
	pub fn with_client(client: Client<T>) -> Self {
		Self { client }
	}

	/// Underlying authenticated client.
	pub fn client(&self) -> &Client<T> {
		&self.client
	}

	/// Calls the restlet with `GET`.
	///
	/// `params` are merged over `{script, deploy}`; a caller-supplied `script` or `deploy` wins.
	pub async fn get(
		&self,
		script: &str,
		deploy: &str,
		params: &[(&str, &str)],
		headers: &HeaderMap,
	) -> Result<Response> {
		let params = merge_params(script, deploy, params);

		self.client.get(self.path(), &params, headers).await
	}

	/// Calls the restlet with `HEAD`.
	pub async fn head(
		&self,
		script: &str,
		deploy: &str,
		params: &[(&str, &str)],
		headers: &HeaderMap,
	) -> Result<Response> {
		let params = merge_params(script, deploy, params);

		self.client.head(self.path(), &params, headers).await
	}

	/// Calls the restlet with `DELETE`.
	pub async fn delete(
		&self,
		script: &str,
		deploy: &str,
		params: &[(&str, &str)],
		headers: &HeaderMap,
	) -> Result<Response> {
		let params = merge_params(script, deploy, params);

		self.client.delete(self.path(), &params, headers).await
	}

	/// Calls the restlet with `POST`.
	pub async fn post<B>(
		&self,
		script: &str,
		deploy: &str,
		body: &B,
		headers: &HeaderMap,
	) -> Result<Response>
	where
		B: ?Sized + Serialize,
	{
		self.client.post(&restlet_path(self.path(), script, deploy), body, headers).await
	}

	/// Calls the restlet with `PUT`.
	pub async fn put<B>(
		&self,
		script: &str,
		deploy: &str,
		body: &B,
		headers: &HeaderMap,
	) -> Result<Response>
	where
		B: ?Sized + Serialize,
	{
		self.client.put(&restlet_path(self.path(), script, deploy), body, headers).await
	}

	/// Calls the restlet with `PATCH`.
	pub async fn patch<B>(
		&self,
		script: &str,
		deploy: &str,
		body: &B,
		headers: &HeaderMap,
	) -> Result<Response>
	where
		B: ?Sized + Serialize,
	{
		self.client.patch(&restlet_path(self.path(), script, deploy), body, headers).await
	}

	fn path(&self) -> &str {
		&self.client.config().restlet.path
	}
}
#[cfg(feature = "reqwest")]
impl Restlet<ReqwestTransport> {
	/// Creates a dispatcher backed by the default reqwest transport.
	pub fn new(config: ClientConfig) -> Result<Self> {
		Client::<ReqwestTransport>::new(config).map(Self::with_client)
	}
}
impl<T> Debug for Restlet<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Restlet").field("client", &self.client).finish()
	}
}

fn merge_params<'a>(
	script: &'a str,
	deploy: &'a str,
	params: &[(&'a str, &'a str)],
) -> Vec<(&'a str, &'a str)> {
	let mut merged = [("script", script), ("deploy", deploy)]
		.into_iter()
		.filter(|(key, _)| !params.iter().any(|(k, _)| k == key))
		.collect::<Vec<_>>();

	merged.extend_from_slice(params);

	merged
}
