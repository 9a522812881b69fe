//! Base endpoints of the two Cardmarket deployments.

// self
use crate::_prelude::*;

/// Production base endpoint.
pub const PRODUCTION_ENDPOINT: &str = "https://api.cardmarket.com/ws/v1.1/output.json";
/// Sandbox base endpoint.
pub const SANDBOX_ENDPOINT: &str = "https://sandbox.cardmarket.com/ws/v1.1/output.json";

/// Deployment targeted by a dispatcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
	#[default]
	/// Live marketplace.
	Production,
	/// Sandbox marketplace for integration testing.
	Sandbox,
}
impl Environment {
	/// Returns the base endpoint string for the deployment.
	pub const fn base_endpoint(self) -> &'static str {
		match self {
			Environment::Production => PRODUCTION_ENDPOINT,
			Environment::Sandbox => SANDBOX_ENDPOINT,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Environment::Production => "production",
			Environment::Sandbox => "sandbox",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
