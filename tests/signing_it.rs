// std
use std::sync::{Arc, Mutex};
// self
use mkm_sdk::{
	auth::{CredentialSet, SigningStrategy, StrategyKind, select_strategy},
	dispatch::Dispatcher,
	endpoint::{PRODUCTION_ENDPOINT, SANDBOX_ENDPOINT},
	error::ConfigError,
	http::{ApiResponse, ApiTransport, HttpMethod, RequestOptions, SignedRequest, TransportFuture},
	oauth1::SignatureMethod,
};

#[derive(Default)]
struct RecordingTransport {
	requests: Mutex<Vec<SignedRequest>>,
}
impl RecordingTransport {
	fn take(&self) -> Vec<SignedRequest> {
		std::mem::take(&mut *self.requests.lock().expect("Recording lock should not be poisoned."))
	}
}
impl ApiTransport for RecordingTransport {
	type Error = std::io::Error;

	fn execute(&self, request: SignedRequest) -> TransportFuture<'_, Self::Error> {
		let request_url = request.url.to_string();

		self.requests.lock().expect("Recording lock should not be poisoned.").push(request);

		Box::pin(async move { Ok(ApiResponse { status: 200, body: String::new(), request_url }) })
	}
}

fn header_params(authorization: &str) -> Vec<(String, String)> {
	authorization
		.strip_prefix("OAuth ")
		.expect("Authorization header should use the OAuth scheme.")
		.split(", ")
		.map(|pair| {
			let (name, value) = pair.split_once('=').expect("Header parameter should be a pair.");

			(name.to_owned(), value.trim_matches('"').to_owned())
		})
		.collect()
}

fn param<'a>(params: &'a [(String, String)], name: &str) -> &'a str {
	params
		.iter()
		.find(|(key, _)| key == name)
		.map(|(_, value)| value.as_str())
		.unwrap_or_else(|| panic!("Header should carry `{name}`."))
}

fn full_credentials() -> CredentialSet {
	CredentialSet::new("my_app_token", "my_app_secret", "my_access_token", "my_access_token_secret")
}

#[test]
fn selection_depends_only_on_access_pair_emptiness() {
	let cases = [
		(CredentialSet::new("a", "b", "c", "d"), StrategyKind::Full),
		(CredentialSet::new("a", "b", "", ""), StrategyKind::AppOnly),
		(CredentialSet::new("a", "b", "c", ""), StrategyKind::AppOnly),
		(CredentialSet::new("a", "b", "", "d"), StrategyKind::AppOnly),
	];

	for (credentials, expected) in cases {
		for endpoint in [PRODUCTION_ENDPOINT, SANDBOX_ENDPOINT] {
			let strategy =
				select_strategy(endpoint, &credentials).expect("Valid app credentials should select.");

			assert_eq!(strategy.kind(), expected);
			assert_eq!(strategy.client().realm, endpoint);
			assert_eq!(
				strategy,
				select_strategy(endpoint, &credentials).expect("Selection should be repeatable.")
			);
		}
	}
}

#[test]
fn empty_app_pair_is_rejected_regardless_of_access_pair() {
	for credentials in [
		CredentialSet::new("", "b", "c", "d"),
		CredentialSet::new("a", "", "c", "d"),
		CredentialSet::new("", "", "", ""),
	] {
		let err = select_strategy(SANDBOX_ENDPOINT, &credentials)
			.expect_err("Empty app credentials should be rejected.");

		assert!(matches!(err, ConfigError::MissingCredential { .. }));
	}
}

#[test]
fn full_strategy_binds_all_four_credentials() {
	let strategy = select_strategy(PRODUCTION_ENDPOINT, &full_credentials())
		.expect("Full credentials should select.");
	let SigningStrategy::Full(client) = strategy else {
		panic!("Full credentials should select the full strategy.");
	};

	assert_eq!(client.realm, "https://api.cardmarket.com/ws/v1.1/output.json");
	assert_eq!(client.client_key, "my_app_token");
	assert_eq!(client.client_secret.expose(), "my_app_secret");
	assert_eq!(client.resource_owner_key, "my_access_token");
	assert_eq!(client.resource_owner_secret.expose(), "my_access_token_secret");
}

#[tokio::test]
async fn dispatched_header_matches_deterministic_signature() {
	let transport = Arc::new(RecordingTransport::default());
	let dispatcher =
		Dispatcher::<RecordingTransport>::with_transport(SANDBOX_ENDPOINT, transport.clone());
	let options = RequestOptions::default().with_query("start", "0").with_query("maxResults", "10");

	let app_only = CredentialSet::new("my_app_token", "my_app_secret", "", "");

	for credentials in [full_credentials(), app_only] {
		dispatcher
			.request("/articles/100569", HttpMethod::Get, &credentials, options.clone())
			.await
			.expect("Recorded request should succeed.");

		let mut requests = transport.take();

		assert_eq!(requests.len(), 1, "Exactly one transport call per request.");

		let request = requests.remove(0);
		let authorization = request.header("Authorization").expect("Authorization must be set.");
		let url = format!("{SANDBOX_ENDPOINT}/articles/100569");

		assert!(authorization.starts_with(&format!("OAuth realm=\"{url}\", ")));
		assert_eq!(request.url.as_str(), format!("{url}?start=0&maxResults=10"));

		let params = header_params(authorization);
		let nonce = param(&params, "oauth_nonce");
		let timestamp =
			param(&params, "oauth_timestamp").parse::<i64>().expect("Timestamp should be numeric.");

		assert_eq!(nonce.len(), 32);
		assert_eq!(param(&params, "oauth_token"), credentials.access_token);
		assert_eq!(param(&params, "oauth_signature_method"), "HMAC-SHA1");
		assert_eq!(param(&params, "oauth_version"), "1.0");

		let expected = select_strategy(&url, &credentials)
			.expect("Selection should succeed.")
			.sign_with(HttpMethod::Get, &url, options.clone(), nonce, timestamp)
			.expect("Deterministic signing should succeed.");

		assert_eq!(expected.header("Authorization"), Some(authorization));
	}
}

#[tokio::test]
async fn signature_method_override_reaches_the_header() {
	let transport = Arc::new(RecordingTransport::default());
	let dispatcher =
		Dispatcher::<RecordingTransport>::with_transport(PRODUCTION_ENDPOINT, transport.clone())
			.with_signature_method(SignatureMethod::HmacSha256);

	dispatcher
		.request("/games", HttpMethod::Get, &full_credentials(), RequestOptions::default())
		.await
		.expect("Recorded request should succeed.");

	let requests = transport.take();
	let params = header_params(requests[0].header("Authorization").expect("Header must be set."));

	assert_eq!(param(&params, "oauth_signature_method"), "HMAC-SHA256");
	assert_eq!(param(&params, "realm"), format!("{PRODUCTION_ENDPOINT}/games"));
}

#[tokio::test]
async fn form_bodies_are_forwarded_and_signed() {
	let transport = Arc::new(RecordingTransport::default());
	let dispatcher =
		Dispatcher::<RecordingTransport>::with_transport(SANDBOX_ENDPOINT, transport.clone());
	let options = RequestOptions::default().with_form([("idProduct", "100569"), ("count", "2")]);

	dispatcher
		.request("/stock", HttpMethod::Post, &full_credentials(), options.clone())
		.await
		.expect("Recorded request should succeed.");

	let request = transport.take().remove(0);
	let authorization = request.header("Authorization").expect("Authorization must be set.");
	let params = header_params(authorization);
	let url = format!("{SANDBOX_ENDPOINT}/stock");
	let expected = select_strategy(&url, &full_credentials())
		.expect("Selection should succeed.")
		.sign_with(
			HttpMethod::Post,
			&url,
			options.clone(),
			param(&params, "oauth_nonce"),
			param(&params, "oauth_timestamp").parse().expect("Timestamp should be numeric."),
		)
		.expect("Deterministic signing should succeed.");

	assert_eq!(request.method, HttpMethod::Post);
	assert_eq!(request.body, options.body);
	assert_eq!(expected.header("Authorization"), Some(authorization));
}
