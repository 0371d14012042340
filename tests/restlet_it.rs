// self
use netsuite_restlet::{
	_preludet::*,
	cache::MemoryCache,
	config::{ClientConfig, RestletConfig},
	http::{HeaderMap, HeaderName, HeaderValue},
	restlet::Restlet,
};

const HOST: &str = "http://netsuite.example.com";
const RESTLET_URL: &str = "http://netsuite.example.com/app/site/hosting/restlet.nl";

fn restlet(transport: &Arc<ScriptedTransport>, path: Option<&str>) -> Restlet<ScriptedTransport> {
	let restlet = match path {
		Some(path) => RestletConfig::builder().api_host(HOST).path(path),
		None => RestletConfig::builder().api_host(HOST),
	}
	.build()
	.expect("Restlet configuration should build.");
	let config = ClientConfig::builder()
		.oauth(test_oauth_config(HOST, Some(Arc::new(MemoryCache::default()))))
		.restlet(restlet)
		.build()
		.expect("Client configuration should build.");

	Restlet::with_transport(config, transport.clone())
}

fn custom_headers() -> HeaderMap {
	let mut headers = HeaderMap::new();

	headers.insert(HeaderName::from_static("x-request-id"), HeaderValue::from_static("42"));

	headers
}

#[tokio::test]
async fn query_verbs_merge_identifiers_into_params() {
	let transport = Arc::new(ScriptedTransport::default());
	let restlet = restlet(&transport, None);

	transport
		.respond_token("tok")
		.respond_json(200, &serde_json::json!({ "items": [] }))
		.respond(200, "application/json", "")
		.respond_json(200, &serde_json::json!({ "deleted": true }));

	let response = restlet
		.get("ascript", "adeploy", &[("page", "2")], &custom_headers())
		.await
		.expect("Get should succeed.");

	assert_eq!(response.json(), Some(&serde_json::json!({ "items": [] })));

	restlet.head("ascript", "adeploy", &[], &HeaderMap::new()).await.expect("Head should succeed.");
	restlet
		.delete("ascript", "adeploy", &[("id", "7")], &HeaderMap::new())
		.await
		.expect("Delete should succeed.");

	let requests = transport.requests_to("restlet.nl");
	let summary = requests
		.iter()
		.map(|request| (request.method.as_str(), request.url.clone()))
		.collect::<Vec<_>>();

	assert_eq!(
		summary,
		[
			("GET", format!("{RESTLET_URL}?deploy=adeploy&page=2&script=ascript")),
			("HEAD", format!("{RESTLET_URL}?deploy=adeploy&script=ascript")),
			("DELETE", format!("{RESTLET_URL}?deploy=adeploy&id=7&script=ascript")),
		]
	);
	assert_eq!(requests[0].header("x-request-id"), Some("42"));
	assert_eq!(requests[0].header("authorization"), Some("Bearer tok"));
}

#[tokio::test]
async fn body_verbs_put_identifiers_in_the_path() {
	let transport = Arc::new(ScriptedTransport::default());
	let restlet = restlet(&transport, Some("/restlet"));
	let body = serde_json::json!({ "record": { "id": 1 } });

	transport.respond_token("tok");

	for _ in 0..3 {
		transport.respond_json(200, &serde_json::json!({ "success": true }));
	}

	restlet
		.post("ascript", "adeploy", &body, &custom_headers())
		.await
		.expect("Post should succeed.");
	restlet.put("ascript", "adeploy", &body, &HeaderMap::new()).await.expect("Put should succeed.");
	restlet
		.patch("ascript", "adeploy", &body, &HeaderMap::new())
		.await
		.expect("Patch should succeed.");

	let requests = transport.requests_to("/restlet");

	assert_eq!(requests.len(), 3);
	assert_eq!(requests[0].header("x-request-id"), Some("42"));

	for (request, method) in requests.iter().zip(["POST", "PUT", "PATCH"]) {
		let sent: Value = serde_json::from_slice(&request.body).expect("Body should be JSON.");

		assert_eq!(request.method, method);
		assert_eq!(request.url, format!("{HOST}/restlet?deploy=adeploy&script=ascript"));
		assert_eq!(sent, body);
	}
}

#[tokio::test]
async fn typed_bodies_are_serialized() {
	#[derive(Serialize)]
	struct Order<'a> {
		id: u32,
		memo: &'a str,
	}

	let transport = Arc::new(ScriptedTransport::default());
	let restlet = restlet(&transport, None);

	transport.respond_token("tok").respond_json(200, &serde_json::json!({}));
	restlet
		.post("ascript", "adeploy", &Order { id: 3, memo: "rush" }, &HeaderMap::new())
		.await
		.expect("Post should succeed.");

	let requests = transport.requests_to("restlet.nl");

	assert_eq!(requests[0].body_text(), "{\"id\":3,\"memo\":\"rush\"}");
}

#[tokio::test]
async fn base_path_on_the_host_is_kept_for_both_endpoints() {
	let host = "https://acct.example.com/base";
	let transport = Arc::new(ScriptedTransport::default());
	let restlet = Restlet::<ScriptedTransport>::with_transport(
		test_client_config(host, None, RestletConfig::DEFAULT_PATH),
		transport.clone(),
	);

	transport.respond_token("tok").respond_json(200, &serde_json::json!({}));
	restlet.get("ascript", "adeploy", &[], &HeaderMap::new()).await.expect("Get should succeed.");

	let urls = transport.requests().into_iter().map(|request| request.url).collect::<Vec<_>>();

	assert_eq!(
		urls,
		[
			format!("{host}/services/rest/auth/oauth2/v1/token"),
			format!("{host}/app/site/hosting/restlet.nl?deploy=adeploy&script=ascript"),
		]
	);
}
