// crates.io
use httpmock::prelude::*;
// self
use netsuite_restlet::{
	_preludet::*,
	cache::{MemoryCache, TokenCache},
	client::{Client, ResponseBody},
	config::{ClientConfig, RestletConfig},
	error::TransportError,
	http::{HeaderMap, ReqwestTransport},
	restlet::Restlet,
	secret::Secret,
	token::{CACHE_KEY, CachedToken},
};

const TOKEN_PATH: &str = "/services/rest/auth/oauth2/v1/token";
const RESTLET_PATH: &str = "/app/site/hosting/restlet.nl";

fn config(server: &MockServer, cache: Option<Arc<dyn TokenCache>>) -> ClientConfig {
	let restlet = RestletConfig::builder()
		.api_host(server.base_url())
		.build()
		.expect("Restlet configuration should build.");

	ClientConfig::builder()
		.oauth(test_oauth_config(&server.base_url(), cache))
		.restlet(restlet)
		.request_timeout(Duration::seconds(1))
		.build()
		.expect("Client configuration should build.")
}

async fn token_mock<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
	let body = token_body(token, 3600).to_string();

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").body(&body);
		})
		.await
}

#[tokio::test]
async fn restlet_call_fetches_token_and_sends_bearer() {
	let server = MockServer::start_async().await;
	let token = token_mock(&server, "netsuite-token").await;
	let target = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(RESTLET_PATH)
				.query_param("script", "ascript")
				.query_param("deploy", "adeploy")
				.header("authorization", "Bearer netsuite-token")
				.header("accept", "application/json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true}");
		})
		.await;
	let restlet = Restlet::<ReqwestTransport>::with_transport(
		config(&server, Some(Arc::new(MemoryCache::default()))),
		test_reqwest_transport(),
	);
	let response = restlet
		.get("ascript", "adeploy", &[], &HeaderMap::new())
		.await
		.expect("Restlet call should succeed.");

	assert_eq!(response.status, 200);
	assert_eq!(response.json(), Some(&serde_json::json!({ "success": true })));

	restlet.get("ascript", "adeploy", &[], &HeaderMap::new()).await.expect("Reuse should work.");

	token.assert_calls_async(1).await;
	target.assert_calls_async(2).await;
}

#[tokio::test]
async fn rejected_token_is_replaced_and_request_replayed() {
	let server = MockServer::start_async().await;
	let cache = Arc::new(MemoryCache::default());
	let stale = CachedToken {
		access_token: Some(Secret::new("stale")),
		expires_at: OffsetDateTime::now_utc() + Duration::days(1),
		refresh_token: None,
		token_type: Some("Bearer".into()),
	};

	cache
		.write(
			CACHE_KEY,
			serde_json::to_value(stale).expect("Token should serialize."),
			Duration::hours(1),
		)
		.await
		.expect("Seeding should succeed.");

	let token = token_mock(&server, "fresh").await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(POST).path("/restlet").header("authorization", "Bearer stale");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"expired\"}");
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/restlet")
				.query_param("script", "ascript")
				.query_param("deploy", "adeploy")
				.header("authorization", "Bearer fresh")
				.header("content-type", "application/json");
			then.status(200).header("content-type", "application/json").body("{\"id\":1}");
		})
		.await;
	let mut config = config(&server, Some(cache));

	config.restlet.path = "/restlet".into();

	let restlet = Restlet::<ReqwestTransport>::with_transport(config, test_reqwest_transport());
	let response = restlet
		.post("ascript", "adeploy", &serde_json::json!({ "name": "x" }), &HeaderMap::new())
		.await
		.expect("Replayed request should succeed.");

	assert_eq!(response.json(), Some(&serde_json::json!({ "id": 1 })));
	assert_eq!(restlet.client().retry_count(), 1);

	rejected.assert_async().await;
	token.assert_async().await;
	accepted.assert_async().await;
}

#[tokio::test]
async fn server_errors_come_back_as_responses() {
	let server = MockServer::start_async().await;
	let _token = token_mock(&server, "tok").await;
	let failing = server
		.mock_async(|when, then| {
			when.method(GET).path("/broken");
			then.status(500).header("content-type", "text/html").body("<h1>down</h1>");
		})
		.await;
	let client = Client::<ReqwestTransport>::with_transport(
		config(&server, None),
		test_reqwest_transport(),
	);
	let response =
		client.get("/broken", &[], &HeaderMap::new()).await.expect("500 should not be an error.");

	assert_eq!(response.status, 500);
	assert_eq!(response.body, ResponseBody::Raw(b"<h1>down</h1>".to_vec()));

	failing.assert_calls_async(1).await;
}

#[tokio::test]
async fn slow_responses_time_out() {
	let server = MockServer::start_async().await;
	let _token = token_mock(&server, "tok").await;
	let _slow = server
		.mock_async(|when, then| {
			when.method(GET).path("/slow");
			then.status(200).delay(std::time::Duration::from_secs(3));
		})
		.await;
	let client = Client::<ReqwestTransport>::with_transport(
		config(&server, None),
		test_reqwest_transport(),
	);
	let err = client
		.get("/slow", &[], &HeaderMap::new())
		.await
		.expect_err("Slow response should time out.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
	assert_eq!(client.retry_count(), 0);
}
