//! Transport primitives for signed API calls.
//!
//! [`ApiTransport`] is the client's only dependency on an HTTP stack. The dispatcher hands it a
//! [`SignedRequest`] whose `Authorization` header is already in place and receives an
//! [`ApiResponse`] back; classifying the status is left to the dispatcher, so transports must
//! return non-2xx responses as values rather than errors.

// self
use crate::{_prelude::*, error::ConfigError};

/// Lowest status code treated as a failure.
pub const FAILURE_STATUS_FLOOR: u16 = 400;

const TOKEN_SYMBOLS: &[u8] = b"!#$%&'*+-.^_`|~";

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a, E> = Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing signed requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared behind an
/// [`Arc`] by any number of dispatchers and concurrent calls.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type Error: 'static + Send + Sync + StdError;

	/// Executes the request exactly once.
	fn execute(&self, request: SignedRequest) -> TransportFuture<'_, Self::Error>;
}

/// HTTP verbs accepted by the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `DELETE`
	Delete,
	/// `PATCH`
	Patch,
}
impl HttpMethod {
	/// Returns the upper-case method token used on the wire and in signatures.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
			HttpMethod::Patch => "PATCH",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for HttpMethod {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"GET" => Ok(HttpMethod::Get),
			"POST" => Ok(HttpMethod::Post),
			"PUT" => Ok(HttpMethod::Put),
			"DELETE" => Ok(HttpMethod::Delete),
			"PATCH" => Ok(HttpMethod::Patch),
			_ => Err(ConfigError::UnsupportedMethod { method: s.to_owned() }),
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<HttpMethod> for reqwest::Method {
	fn from(method: HttpMethod) -> Self {
		match method {
			HttpMethod::Get => reqwest::Method::GET,
			HttpMethod::Post => reqwest::Method::POST,
			HttpMethod::Put => reqwest::Method::PUT,
			HttpMethod::Delete => reqwest::Method::DELETE,
			HttpMethod::Patch => reqwest::Method::PATCH,
		}
	}
}

/// Request payload passed through to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
	/// `application/x-www-form-urlencoded` pairs; these take part in the OAuth signature.
	Form(Vec<(String, String)>),
	/// Opaque payload (the service speaks XML for writes); excluded from the signature.
	Raw {
		/// Value of the `Content-Type` header.
		content_type: String,
		/// Payload bytes.
		bytes: Vec<u8>,
	},
}

/// Transport options passed through by the dispatcher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Extra request headers.
	pub headers: Vec<(String, String)>,
	/// Query parameters appended to the composed URL.
	pub query: Vec<(String, String)>,
	/// Optional request body.
	pub body: Option<RequestBody>,
}
impl RequestOptions {
	/// Adds a request header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Adds a query parameter.
	pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));

		self
	}

	/// Sets a form-encoded body.
	pub fn with_form<I, K, V>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.body =
			Some(RequestBody::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()));

		self
	}

	/// Sets an opaque body with its content type.
	pub fn with_body(mut self, content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		self.body = Some(RequestBody::Raw { content_type: content_type.into(), bytes: bytes.into() });

		self
	}

	/// Checks every header, and the content type of an opaque body, before anything is signed.
	pub fn validate(&self) -> Result<(), ConfigError> {
		for (name, value) in &self.headers {
			validate_header(name, value)?;
		}
		if let Some(RequestBody::Raw { content_type, .. }) = &self.body {
			validate_header("Content-Type", content_type)?;
		}

		Ok(())
	}

	/// Form pairs that must be included in the signature base string.
	pub fn form_params(&self) -> &[(String, String)] {
		match &self.body {
			Some(RequestBody::Form(pairs)) => pairs,
			_ => &[],
		}
	}
}

/// Fully-formed request ready for the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Absolute URL including every query parameter.
	pub url: Url,
	/// Headers, `Authorization` included.
	pub headers: Vec<(String, String)>,
	/// Optional body.
	pub body: Option<RequestBody>,
}
impl SignedRequest {
	/// Returns the first header value matching `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
	}
}

/// Response as seen by the dispatcher; the body is never interpreted there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body text.
	pub body: String,
	/// URL the request was sent to.
	pub request_url: String,
}
impl ApiResponse {
	/// Returns `true` when the status is below the failure range.
	pub fn is_success(&self) -> bool {
		self.status < FAILURE_STATUS_FLOOR
	}

	/// Returns the body text.
	pub fn text(&self) -> &str {
		&self.body
	}

	/// Decodes the body as JSON, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_str(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { source, status: self.status })
	}
}

/// Rejects header names that are not tokens and values outside visible ASCII and tab.
pub fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
	let name_ok = !name.is_empty()
		&& name.bytes().all(|b| b.is_ascii_alphanumeric() || TOKEN_SYMBOLS.contains(&b));
	let value_ok = value.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b));

	if name_ok && value_ok {
		Ok(())
	} else {
		Err(ConfigError::InvalidHeader { name: name.to_owned() })
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Timeouts, proxies and redirect policy belong to the wrapped client; build one with the
/// desired settings and pass it to [`ReqwestTransport::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	type Error = ReqwestError;

	fn execute(&self, request: SignedRequest) -> TransportFuture<'_, Self::Error> {
		Box::pin(async move {
			let SignedRequest { method, url, headers, body } = request;
			let mut builder = self.0.request(method.into(), url);

			for (name, value) in &headers {
				builder = builder.header(name.as_str(), value.as_str());
			}

			builder = match body {
				Some(RequestBody::Form(pairs)) => builder.form(&pairs),
				Some(RequestBody::Raw { content_type, bytes }) =>
					builder.header(reqwest::header::CONTENT_TYPE, content_type).body(bytes),
				None => builder,
			};

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let request_url = response.url().to_string();
			let body = response.text().await?;

			Ok(ApiResponse { status, body, request_url })
		})
	}
}
