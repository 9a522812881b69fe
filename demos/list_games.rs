//! Lists the games offered by the marketplace.
//!
//! With `MKM_APP_TOKEN` and `MKM_APP_SECRET` set, the demo calls the sandbox deployment using the
//! credentials from the environment. Otherwise it signs the same request against a local mock.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::Deserialize;
// self
use mkm_sdk::{
	auth::{APP_TOKEN_VAR, CredentialSet},
	catalog::MARKET_PLACE,
	client::MkmClient,
	dispatch::Dispatcher,
	endpoint::Environment,
	http::RequestOptions,
};

#[derive(Debug, Deserialize)]
struct Game {
	#[serde(rename = "idGame")]
	id_game: u32,
	name: String,
}

#[derive(Debug, Deserialize)]
struct Games {
	game: Vec<Game>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let client = if std::env::var_os(APP_TOKEN_VAR).is_some() {
		MkmClient::from_env(Environment::Sandbox)?
	} else {
		server
			.mock_async(|when, then| {
				when.method(GET).path("/ws/v1.1/output.json/games").header_exists("authorization");
				then.status(200).header("content-type", "application/json").body(
					"{\"game\":[{\"idGame\":1,\"name\":\"Magic the Gathering\"},{\"idGame\":3,\"name\":\"Yugioh\"}]}",
				);
			})
			.await;

		MkmClient::with_dispatcher(
			Dispatcher::new(server.url("/ws/v1.1/output.json")),
			CredentialSet::new("demo-app-token", "demo-app-secret", "", ""),
		)
	};
	let response = client.call(MARKET_PLACE, "games", &[], RequestOptions::default()).await?;
	let games = response.json::<Games>()?;

	for game in games.game {
		println!("{:>3} {}", game.id_game, game.name);
	}

	Ok(())
}
