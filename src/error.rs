//! Client-level error types shared by the selector, the dispatcher, and the transports.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; raised before any network activity.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The service answered with a failure status.
	#[error(transparent)]
	Connection(#[from] ConnectionError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Response body does not match the requested type.
	#[error("Response body with status {status} could not be decoded.")]
	Decode {
		/// Path-aware parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the decoded response.
		status: u16,
	},
}
impl Error {
	/// Returns the HTTP status code associated with the failure, when one is known.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Connection(err) => Some(err.status),
			Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures; none of them reach the network.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required environment variable is absent.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnvVar {
		/// Variable name.
		name: &'static str,
	},
	/// A credential is missing from the supplied mapping, or a required one is empty.
	#[error("Credential `{field}` must be provided.")]
	MissingCredential {
		/// Credential field name.
		field: &'static str,
	},
	/// The catalog has no resource under the requested name.
	#[error("Unknown resource `{section}.{name}`.")]
	UnknownResource {
		/// Catalog section.
		section: String,
		/// Resource name within the section.
		name: String,
	},
	/// A path template placeholder was not supplied.
	#[error("Resource `{resource}` requires the `{parameter}` path parameter.")]
	MissingPathParameter {
		/// Resource name.
		resource: &'static str,
		/// Placeholder name.
		parameter: String,
	},
	/// The composed request URL cannot be parsed.
	#[error("Request URL `{url}` is invalid.")]
	InvalidUrl {
		/// URL that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A request header name or value cannot be sent on the wire.
	#[error("Request header `{name}` has an invalid name or value.")]
	InvalidHeader {
		/// Header name as supplied.
		name: String,
	},
	/// The HTTP method is not one the service accepts.
	#[error("HTTP method `{method}` is not supported.")]
	UnsupportedMethod {
		/// Method string as supplied.
		method: String,
	},
	/// The HMAC implementation rejected the signing key.
	#[error("Signing key was rejected by the HMAC implementation.")]
	SigningKey,
}

/// Failure status returned by the service.
///
/// Any status at or above 400 lands here, including the non-standard codes the service emits.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Request to {request_url} failed with status {status}: {}.", body_preview(.body))]
pub struct ConnectionError {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
	/// URL the failing request was sent to.
	pub request_url: String,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific error, unmodified.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

fn body_preview(body: &str) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
