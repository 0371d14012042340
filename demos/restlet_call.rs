//! Calls a mocked restlet twice with the default reqwest transport; the second call reuses the
//! cached token.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use netsuite_restlet::{
	cache::MemoryCache,
	config::{ClientConfig, OAuthConfig, RestletConfig},
	http::HeaderMap,
	obs::{LogLevel, TracingLogger},
	restlet::Restlet,
};

const PRIVATE_KEY: &str = include_str!("../tests/fixtures/test_rsa_private.pem");

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/services/rest/auth/oauth2/v1/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":\"3600\"}",
			);
		})
		.await;
	let restlet_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/app/site/hosting/restlet.nl")
				.header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body("{\"success\":true}");
		})
		.await;
	let oauth = OAuthConfig::builder()
		.api_host(server.base_url())
		.client_id("demo-client")
		.certificate_id("demo-certificate")
		.certificate_private_key(PRIVATE_KEY)
		.cache(Arc::new(MemoryCache::default()))
		.build()?;
	let restlet = RestletConfig::builder().api_host(server.base_url()).build()?;
	let config = ClientConfig::builder()
		.oauth(oauth)
		.restlet(restlet)
		.logger(Arc::new(TracingLogger))
		.log_requests(true)
		.log_level(LogLevel::Debug)
		.build()?;
	let restlet = Restlet::new(config)?;

	for attempt in 1..=2 {
		let response =
			restlet.get("customscript_demo", "1", &[("page", "1")], &HeaderMap::new()).await?;

		println!("Call {attempt}: status {} body {:?}.", response.status, response.json());
	}

	token_mock.assert_calls_async(1).await;
	restlet_mock.assert_calls_async(2).await;

	Ok(())
}
