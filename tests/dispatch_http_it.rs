#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde::Deserialize;
use tokio::{
	io::{AsyncReadExt, AsyncWriteExt},
	net::TcpListener,
};
// self
use mkm_sdk::{
	auth::CredentialSet,
	catalog::MARKET_PLACE,
	client::MkmClient,
	dispatch::{Dispatcher, ReqwestDispatcher},
	error::{Error, TransportError},
	http::{HttpMethod, RequestOptions},
};

const BASE_PATH: &str = "/ws/v1.1/output.json";
const GAMES_BODY: &str = "{\"game\":[{\"idGame\":1,\"name\":\"Magic the Gathering\"},{\"idGame\":3,\"name\":\"Yugioh\"}]}";

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct Game {
	#[serde(rename = "idGame")]
	id_game: u32,
	name: String,
}

#[derive(Debug, Deserialize)]
struct Games {
	game: Vec<Game>,
}

fn dispatcher(server: &MockServer) -> ReqwestDispatcher {
	Dispatcher::new(server.url(BASE_PATH))
}

// Accepts one connection and returns the raw request head once the whole body has arrived.
async fn capture_request_head(listener: TcpListener) -> String {
	let (mut socket, _) = listener.accept().await.expect("Client should connect.");
	let mut received = Vec::new();
	let mut buf = [0_u8; 1024];

	loop {
		let read = socket.read(&mut buf).await.expect("Request should be readable.");

		received.extend_from_slice(&buf[..read]);

		let text = String::from_utf8_lossy(&received).into_owned();

		if let Some(end) = text.find("\r\n\r\n") {
			let length = text[..end]
				.lines()
				.find_map(|line| {
					let (name, value) = line.split_once(':')?;

					if name.eq_ignore_ascii_case("content-length") {
						value.trim().parse::<usize>().ok()
					} else {
						None
					}
				})
				.unwrap_or(0);

			if read == 0 || received.len() >= end + 4 + length {
				socket
					.write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
					.await
					.expect("Response should be writable.");

				return text[..end].to_owned();
			}
		}
		if read == 0 {
			panic!("Connection closed before the request head was complete.");
		}
	}
}

fn app_only() -> CredentialSet {
	CredentialSet::new("app_token", "app_secret", "", "")
}

#[tokio::test]
async fn success_returns_body_untouched() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{BASE_PATH}/games")).header_exists("authorization");
			then.status(200).header("content-type", "application/json").body(GAMES_BODY);
		})
		.await;
	let response = dispatcher(&server)
		.request("/games", HttpMethod::Get, &app_only(), RequestOptions::default())
		.await
		.expect("Games request should succeed.");

	mock.assert_async().await;

	assert_eq!(response.status, 200);
	assert_eq!(response.text(), GAMES_BODY);

	let games: Games = response.json().expect("Games payload should decode.");

	assert_eq!(games.game[1], Game { id_game: 3, name: "Yugioh".into() });
}

#[tokio::test]
async fn not_found_maps_to_connection_error_without_retry() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{BASE_PATH}/product/0"));
			then.status(404).body("{\"error\":\"not found\"}");
		})
		.await;
	let err = dispatcher(&server)
		.request("/product/0", HttpMethod::Get, &app_only(), RequestOptions::default())
		.await
		.expect_err("Missing product should fail.");

	mock.assert_calls_async(1).await;

	match err {
		Error::Connection(err) => {
			assert_eq!(err.status, 404);
			assert_eq!(err.body, "{\"error\":\"not found\"}");
			assert_eq!(err.request_url, server.url(format!("{BASE_PATH}/product/0")));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn non_standard_failure_codes_are_connection_errors() {
	for status in [480_u16, 545] {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(GET).path(format!("{BASE_PATH}/account"));
				then.status(status).body("");
			})
			.await;

		let err = dispatcher(&server)
			.request("/account", HttpMethod::Get, &app_only(), RequestOptions::default())
			.await
			.expect_err("Non-standard failure status should fail.");

		assert_eq!(err.status(), Some(status));
		assert!(matches!(err, Error::Connection(_)));
	}
}

#[tokio::test]
async fn query_and_form_parameters_reach_the_wire() {
	let server = MockServer::start_async().await;
	let articles = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("{BASE_PATH}/articles/100569"))
				.query_param("start", "0")
				.query_param("maxResults", "10");
			then.status(206).body("{\"article\":[]}");
		})
		.await;
	let stock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(format!("{BASE_PATH}/stock"))
				.header("content-type", "application/x-www-form-urlencoded")
				.body("idProduct=100569&count=2");
			then.status(201).body("{}");
		})
		.await;
	let dispatcher = dispatcher(&server);
	let credentials = CredentialSet::new("app_token", "app_secret", "access_token", "token_secret");

	dispatcher
		.request(
			"/articles/100569",
			HttpMethod::Get,
			&credentials,
			RequestOptions::default().with_query("start", "0").with_query("maxResults", "10"),
		)
		.await
		.expect("Partial content is a success.");
	dispatcher
		.request(
			"/stock",
			HttpMethod::Post,
			&credentials,
			RequestOptions::default().with_form([("idProduct", "100569"), ("count", "2")]),
		)
		.await
		.expect("Stock insert should succeed.");

	articles.assert_async().await;
	stock.assert_async().await;
}

#[tokio::test]
async fn client_calls_catalog_resources() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{BASE_PATH}/expansion/1"));
			then.status(200).body("{\"expansion\":[]}");
		})
		.await;
	let client = MkmClient::with_dispatcher(dispatcher(&server), app_only());
	let response = client
		.call(MARKET_PLACE, "expansion", &[("game", "1")], RequestOptions::default())
		.await
		.expect("Expansion request should succeed.");

	mock.assert_async().await;

	assert_eq!(response.body, "{\"expansion\":[]}");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
	let dispatcher = Dispatcher::new("http://127.0.0.1:1/ws/v1.1/output.json");
	let err = dispatcher
		.request("/games", HttpMethod::Get, &app_only(), RequestOptions::default())
		.await
		.expect_err("Closed port should fail.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	assert_eq!(err.status(), None);
}

#[tokio::test]
async fn body_content_type_is_sent_once() {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Listener should bind.");
	let addr = listener.local_addr().expect("Listener should have an address.");
	let server = tokio::spawn(capture_request_head(listener));
	let options = RequestOptions::default()
		.with_header("Content-Type", "application/xml")
		.with_body("application/xml", "<request/>");

	Dispatcher::new(format!("http://{addr}{BASE_PATH}"))
		.request("/stock", HttpMethod::Post, &app_only(), options)
		.await
		.expect("Stock insert should succeed.");

	let head = server.await.expect("Capture task should finish.");
	let content_types = head
		.lines()
		.filter(|line| line.to_ascii_lowercase().starts_with("content-type:"))
		.collect::<Vec<_>>();

	assert_eq!(content_types.len(), 1, "Request head:\n{head}");
	assert!(content_types[0].ends_with("application/xml"));
}
