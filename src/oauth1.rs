//! OAuth 1.0a request signing (RFC 5849) shared by both signing strategies.
//!
//! The signer is a plain value: it binds a realm and the consumer/resource-owner credentials,
//! and renders an `Authorization` header for a given method, URL and form body. Nonce and
//! timestamp are inputs to [`OAuth1Client::authorization_header`] so signatures can be
//! reproduced exactly; [`generate_nonce`] and [`current_timestamp`] supply fresh values.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
use sha2::Sha256;
use time::OffsetDateTime;
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError, http::HttpMethod};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Protocol version advertised in every signed request.
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_LEN: usize = 32;
// RFC 3986 unreserved characters stay literal; everything else is escaped.
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Signature algorithms supported by the signer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMethod {
	#[default]
	/// `HMAC-SHA1`, required by the Cardmarket API.
	#[serde(rename = "HMAC-SHA1")]
	HmacSha1,
	/// `HMAC-SHA256`.
	#[serde(rename = "HMAC-SHA256")]
	HmacSha256,
}
impl SignatureMethod {
	/// Returns the `oauth_signature_method` token.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::HmacSha1 => "HMAC-SHA1",
			SignatureMethod::HmacSha256 => "HMAC-SHA256",
		}
	}
}
impl Display for SignatureMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// OAuth1 signer bound to one realm and one set of credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuth1Client {
	/// Realm rendered into the `Authorization` header; the request URL for this API.
	pub realm: String,
	/// Consumer key (application token).
	pub client_key: String,
	/// Consumer secret (application secret).
	pub client_secret: Secret,
	/// Resource-owner key (access token); empty for two-legged signing.
	pub resource_owner_key: String,
	/// Resource-owner secret (access token secret); empty for two-legged signing.
	pub resource_owner_secret: Secret,
	/// Signature algorithm.
	pub signature_method: SignatureMethod,
	/// Emits `oauth_token=""` when the resource-owner key is empty.
	pub emit_empty_token: bool,
}
impl OAuth1Client {
	/// Creates a signer carrying consumer credentials only.
	pub fn new(
		realm: impl Into<String>,
		client_key: impl Into<String>,
		client_secret: impl Into<Secret>,
	) -> Self {
		Self {
			realm: realm.into(),
			client_key: client_key.into(),
			client_secret: client_secret.into(),
			resource_owner_key: String::new(),
			resource_owner_secret: Secret::default(),
			signature_method: SignatureMethod::default(),
			emit_empty_token: false,
		}
	}

	/// Binds resource-owner credentials.
	pub fn with_resource_owner(
		mut self,
		key: impl Into<String>,
		secret: impl Into<Secret>,
	) -> Self {
		self.resource_owner_key = key.into();
		self.resource_owner_secret = secret.into();

		self
	}

	/// Overrides the signature algorithm.
	pub fn with_signature_method(mut self, method: SignatureMethod) -> Self {
		self.signature_method = method;

		self
	}

	/// Keeps `oauth_token` in the protocol parameters even when it is empty.
	pub fn with_empty_token(mut self) -> Self {
		self.emit_empty_token = true;

		self
	}

	/// Protocol parameters for one request, without `oauth_signature`.
	pub fn oauth_params(&self, nonce: &str, timestamp: i64) -> Vec<(&'static str, String)> {
		let mut params = vec![
			("oauth_consumer_key", self.client_key.clone()),
			("oauth_nonce", nonce.to_owned()),
			("oauth_signature_method", self.signature_method.as_str().to_owned()),
			("oauth_timestamp", timestamp.to_string()),
			("oauth_version", OAUTH_VERSION.to_owned()),
		];

		if !self.resource_owner_key.is_empty() || self.emit_empty_token {
			params.push(("oauth_token", self.resource_owner_key.clone()));
		}

		params
	}

	/// Signs a base string and returns the base64 signature.
	pub fn sign(&self, base_string: &str) -> Result<String, ConfigError> {
		let key = format!(
			"{}&{}",
			percent_encode(self.client_secret.expose()),
			percent_encode(self.resource_owner_secret.expose())
		);
		let digest = match self.signature_method {
			SignatureMethod::HmacSha1 => {
				let mut mac =
					HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| ConfigError::SigningKey)?;

				mac.update(base_string.as_bytes());

				mac.finalize().into_bytes().to_vec()
			},
			SignatureMethod::HmacSha256 => {
				let mut mac = HmacSha256::new_from_slice(key.as_bytes())
					.map_err(|_| ConfigError::SigningKey)?;

				mac.update(base_string.as_bytes());

				mac.finalize().into_bytes().to_vec()
			},
		};

		Ok(STANDARD.encode(digest))
	}

	/// Renders the `Authorization` header value for a request.
	///
	/// Query parameters are read from `url`; `form` holds form-encoded body pairs. Both enter the
	/// signature together with the protocol parameters.
	pub fn authorization_header(
		&self,
		method: HttpMethod,
		url: &Url,
		form: &[(String, String)],
		nonce: &str,
		timestamp: i64,
	) -> Result<String, ConfigError> {
		let mut params = self.oauth_params(nonce, timestamp);
		let base_string = signature_base_string(method, url, form, &params);

		params.push(("oauth_signature", self.sign(&base_string)?));
		params.sort_by(|a, b| a.0.cmp(b.0));

		let mut header = String::from("OAuth ");

		if !self.realm.is_empty() {
			header.push_str(&format!("realm=\"{}\", ", quote_realm(&self.realm)));
		}

		let rendered = params
			.iter()
			.map(|(name, value)| format!("{name}=\"{}\"", percent_encode(value)))
			.collect::<Vec<_>>()
			.join(", ");

		header.push_str(&rendered);

		Ok(header)
	}
}

/// Escapes `"` and `\` so the realm stays a single quoted-string.
fn quote_realm(realm: &str) -> String {
	let mut quoted = String::with_capacity(realm.len());

	for c in realm.chars() {
		if matches!(c, '"' | '\\') {
			quoted.push('\\');
		}

		quoted.push(c);
	}

	quoted
}

/// Percent-encodes a value with the RFC 3986 unreserved set.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, ENCODE_SET).to_string()
}

/// Base string URI: scheme and host (lower-cased by parsing), non-default port, and path.
pub fn base_string_uri(url: &Url) -> String {
	let mut uri = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());

	if let Some(port) = url.port() {
		uri.push_str(&format!(":{port}"));
	}

	uri.push_str(url.path());

	uri
}

/// Builds the signature base string for a request.
pub fn signature_base_string(
	method: HttpMethod,
	url: &Url,
	form: &[(String, String)],
	oauth_params: &[(&str, String)],
) -> String {
	let mut pairs = url
		.query_pairs()
		.map(|(name, value)| (percent_encode(&name), percent_encode(&value)))
		.chain(form.iter().map(|(name, value)| (percent_encode(name), percent_encode(value))))
		.chain(oauth_params.iter().map(|(name, value)| (percent_encode(name), percent_encode(value))))
		.collect::<Vec<_>>();

	pairs.sort();

	let normalized =
		pairs.iter().map(|(name, value)| format!("{name}={value}")).collect::<Vec<_>>().join("&");

	format!(
		"{}&{}&{}",
		method.as_str(),
		percent_encode(&base_string_uri(url)),
		percent_encode(&normalized)
	)
}

/// Generates a fresh alphanumeric nonce.
pub fn generate_nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

/// Current UNIX time in seconds.
pub fn current_timestamp() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}
