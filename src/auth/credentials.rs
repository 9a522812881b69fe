//! Credential sets and the environment-backed loader.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Environment variable holding the application token.
pub const APP_TOKEN_VAR: &str = "MKM_APP_TOKEN";
/// Environment variable holding the application secret.
pub const APP_SECRET_VAR: &str = "MKM_APP_SECRET";
/// Environment variable holding the optional access token.
pub const ACCESS_TOKEN_VAR: &str = "MKM_ACCESS_TOKEN";
/// Environment variable holding the optional access token secret.
pub const ACCESS_TOKEN_SECRET_VAR: &str = "MKM_ACCESS_TOKEN_SECRET";

const FIELDS: [&str; 4] = ["app_token", "app_secret", "access_token", "access_token_secret"];

/// Application-level credential pair issued to a registered app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredentials {
	/// Application token (OAuth consumer key).
	pub app_token: String,
	/// Application secret (OAuth consumer secret).
	pub app_secret: Secret,
}
impl AppCredentials {
	/// Creates a pair from explicit values.
	pub fn new(app_token: impl Into<String>, app_secret: impl Into<Secret>) -> Self {
		Self { app_token: app_token.into(), app_secret: app_secret.into() }
	}

	/// Loads the pair from `MKM_APP_TOKEN` and `MKM_APP_SECRET`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads the pair through an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let app_token =
			lookup(APP_TOKEN_VAR).ok_or(ConfigError::MissingEnvVar { name: APP_TOKEN_VAR })?;
		let app_secret =
			lookup(APP_SECRET_VAR).ok_or(ConfigError::MissingEnvVar { name: APP_SECRET_VAR })?;

		Ok(Self::new(app_token, app_secret))
	}
}

/// The four credential strings supplied with every request.
///
/// The access-token pair may be empty; its emptiness decides between four-legged and two-legged
/// signing (see [`select_strategy`](crate::auth::select_strategy)).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
	/// Application token (OAuth consumer key).
	pub app_token: String,
	/// Application secret (OAuth consumer secret).
	pub app_secret: Secret,
	/// User access token (OAuth resource-owner key); may be empty.
	pub access_token: String,
	/// User access token secret (OAuth resource-owner secret); may be empty.
	pub access_token_secret: Secret,
}
impl CredentialSet {
	/// Creates a set from explicit values.
	pub fn new(
		app_token: impl Into<String>,
		app_secret: impl Into<Secret>,
		access_token: impl Into<String>,
		access_token_secret: impl Into<Secret>,
	) -> Self {
		Self {
			app_token: app_token.into(),
			app_secret: app_secret.into(),
			access_token: access_token.into(),
			access_token_secret: access_token_secret.into(),
		}
	}

	/// Creates a set carrying only the application pair.
	pub fn app_only(app: AppCredentials) -> Self {
		Self {
			app_token: app.app_token,
			app_secret: app.app_secret,
			access_token: String::new(),
			access_token_secret: Secret::default(),
		}
	}

	/// Replaces the access-token pair.
	pub fn with_access_token(
		mut self,
		access_token: impl Into<String>,
		access_token_secret: impl Into<Secret>,
	) -> Self {
		self.access_token = access_token.into();
		self.access_token_secret = access_token_secret.into();

		self
	}

	/// Builds a set from a string mapping.
	///
	/// All four keys must be present; values may be empty.
	pub fn from_map(map: &HashMap<String, String>) -> Result<Self, ConfigError> {
		let [app_token, app_secret, access_token, access_token_secret] = FIELDS
			.map(|field| map.get(field).cloned().ok_or(ConfigError::MissingCredential { field }));

		Ok(Self::new(app_token?, app_secret?, access_token?, access_token_secret?))
	}

	/// Loads the app pair and the optional access-token pair from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads the set through an arbitrary variable lookup.
	///
	/// Absent access-token variables default to empty strings.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let app = AppCredentials::from_lookup(&lookup)?;
		let access_token = lookup(ACCESS_TOKEN_VAR).unwrap_or_default();
		let access_token_secret = lookup(ACCESS_TOKEN_SECRET_VAR).unwrap_or_default();

		Ok(Self::app_only(app).with_access_token(access_token, access_token_secret))
	}

	/// Returns `true` when both access-token values are non-empty.
	pub fn has_access_token(&self) -> bool {
		!self.access_token.is_empty() && !self.access_token_secret.is_empty()
	}
}
impl From<AppCredentials> for CredentialSet {
	fn from(app: AppCredentials) -> Self {
		Self::app_only(app)
	}
}
