//! OAuth1 strategy selection.
//!
//! [`select_strategy`] is a pure decision over the credential set: a complete access-token pair
//! yields four-legged signing, anything less falls back to two-legged signing with the
//! application pair alone. The returned [`SigningStrategy`] is bound to the endpoint URL it was
//! selected for and is meant to be used for exactly one request.

// self
use crate::{
	_prelude::*,
	auth::CredentialSet,
	error::ConfigError,
	http::{HttpMethod, RequestOptions, SignedRequest},
	oauth1::{self, OAuth1Client, SignatureMethod},
};

/// Signing strategy variants, as labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
	/// Four-legged signing with application and user credentials.
	Full,
	/// Two-legged signing with application credentials only.
	AppOnly,
}
impl StrategyKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StrategyKind::Full => "full",
			StrategyKind::AppOnly => "app_only",
		}
	}
}
impl Display for StrategyKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request signer chosen for one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SigningStrategy {
	/// All four credentials are bound.
	Full(OAuth1Client),
	/// Only the application pair is bound; the resource-owner key and secret are empty and
	/// `oauth_token` is still sent, empty, as the service expects.
	AppOnly(OAuth1Client),
}
impl SigningStrategy {
	/// Returns the variant label.
	pub fn kind(&self) -> StrategyKind {
		match self {
			Self::Full(_) => StrategyKind::Full,
			Self::AppOnly(_) => StrategyKind::AppOnly,
		}
	}

	/// Returns the bound signer.
	pub fn client(&self) -> &OAuth1Client {
		match self {
			Self::Full(client) | Self::AppOnly(client) => client,
		}
	}

	/// Overrides the signature algorithm of the bound signer.
	pub fn with_signature_method(self, method: SignatureMethod) -> Self {
		match self {
			Self::Full(client) => Self::Full(client.with_signature_method(method)),
			Self::AppOnly(client) => Self::AppOnly(client.with_signature_method(method)),
		}
	}

	/// Signs a request with a fresh nonce and the current time.
	pub fn sign(
		&self,
		method: HttpMethod,
		url: &str,
		options: RequestOptions,
	) -> Result<SignedRequest, ConfigError> {
		self.sign_with(method, url, options, &oauth1::generate_nonce(), oauth1::current_timestamp())
	}

	/// Signs a request with an explicit nonce and timestamp.
	///
	/// Query options are appended to `url` before signing; an `Authorization` header already
	/// present in the options is replaced. When a body is set, it alone decides the content
	/// type, so caller `Content-Type` headers are dropped.
	pub fn sign_with(
		&self,
		method: HttpMethod,
		url: &str,
		options: RequestOptions,
		nonce: &str,
		timestamp: i64,
	) -> Result<SignedRequest, ConfigError> {
		options.validate()?;

		let mut target = Url::parse(url)
			.map_err(|source| ConfigError::InvalidUrl { url: url.to_owned(), source })?;

		if !options.query.is_empty() {
			target.query_pairs_mut().extend_pairs(&options.query);
		}

		let authorization = self.client().authorization_header(
			method,
			&target,
			options.form_params(),
			nonce,
			timestamp,
		)?;
		let RequestOptions { mut headers, body, .. } = options;

		headers.retain(|(name, _)| {
			!name.eq_ignore_ascii_case("authorization")
				&& !(body.is_some() && name.eq_ignore_ascii_case("content-type"))
		});
		headers.push(("Authorization".into(), authorization));

		Ok(SignedRequest { method, url: target, headers, body })
	}
}

/// Picks the signing strategy for a request to `endpoint_url`.
///
/// The URL is only bound as the signing realm; it is not validated here. An empty application
/// token or secret is rejected before anything else is considered.
pub fn select_strategy(
	endpoint_url: &str,
	credentials: &CredentialSet,
) -> Result<SigningStrategy, ConfigError> {
	if credentials.app_token.is_empty() {
		return Err(ConfigError::MissingCredential { field: "app_token" });
	}
	if credentials.app_secret.is_empty() {
		return Err(ConfigError::MissingCredential { field: "app_secret" });
	}

	let client = OAuth1Client::new(
		endpoint_url,
		credentials.app_token.as_str(),
		credentials.app_secret.clone(),
	);

	if credentials.has_access_token() {
		Ok(SigningStrategy::Full(client.with_resource_owner(
			credentials.access_token.as_str(),
			credentials.access_token_secret.clone(),
		)))
	} else {
		Ok(SigningStrategy::AppOnly(client.with_empty_token()))
	}
}
