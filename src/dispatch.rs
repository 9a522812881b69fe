//! Request dispatch against one fixed base endpoint.
//!
//! A [`Dispatcher`] owns nothing but its base endpoint, a shared transport and the signature
//! algorithm. Every [`Dispatcher::request`] composes `base_endpoint + logical_path`, selects a
//! signing strategy for that URL from the caller's credentials, signs, performs exactly one
//! transport call, and passes the response through [`classify_response`]. There is no retry,
//! caching, or state carried between calls.

// self
use crate::{
	_prelude::*,
	auth::{self, CredentialSet, SigningStrategy},
	endpoint::Environment,
	error::{ConnectionError, TransportError},
	http::{ApiResponse, ApiTransport, FAILURE_STATUS_FLOOR, HttpMethod, RequestOptions},
	oauth1::SignatureMethod,
	obs::{self, RequestOutcome, RequestSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Dispatcher specialized for the crate's default reqwest transport.
pub type ReqwestDispatcher = Dispatcher<ReqwestTransport>;

/// Signs and sends requests against a single base endpoint.
pub struct Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	base_endpoint: String,
	transport: Arc<T>,
	signature_method: SignatureMethod,
}
impl<T> Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a dispatcher for `base_endpoint` that sends through `transport`.
	pub fn with_transport(base_endpoint: impl Into<String>, transport: impl Into<Arc<T>>) -> Self {
		Self {
			base_endpoint: base_endpoint.into(),
			transport: transport.into(),
			signature_method: SignatureMethod::default(),
		}
	}

	/// Overrides the signature algorithm applied to every selected strategy.
	pub fn with_signature_method(mut self, method: SignatureMethod) -> Self {
		self.signature_method = method;

		self
	}

	/// Base endpoint fixed at construction.
	pub fn base_endpoint(&self) -> &str {
		&self.base_endpoint
	}

	/// Shared transport handle.
	pub fn transport(&self) -> &Arc<T> {
		&self.transport
	}

	/// Signature algorithm applied to selected strategies.
	pub fn signature_method(&self) -> SignatureMethod {
		self.signature_method
	}

	/// Concatenates the base endpoint and a logical path.
	pub fn compose_url(&self, logical_path: &str) -> String {
		format!("{}{logical_path}", self.base_endpoint)
	}

	/// Composes the URL for `logical_path` and selects the strategy that would sign it.
	pub fn strategy_for(
		&self,
		logical_path: &str,
		auth: &CredentialSet,
	) -> Result<SigningStrategy> {
		self.select(&self.compose_url(logical_path), auth)
	}

	/// Signs and sends one request, classifying the response by status.
	///
	/// Selection and signing happen before the request counts as attempted, so configuration
	/// errors are never recorded as attempts or failures.
	///
	/// # Errors
	///
	/// - [`Error::Config`] when the credentials, the composed URL or the headers are unusable;
	///   nothing is sent.
	/// - [`Error::Transport`] when the transport fails; its error is kept as the source.
	/// - [`Error::Connection`] when the service answers with a status of 400 or above.
	pub async fn request(
		&self,
		logical_path: &str,
		method: HttpMethod,
		auth: &CredentialSet,
		options: RequestOptions,
	) -> Result<ApiResponse> {
		let full_url = self.compose_url(logical_path);
		let strategy = self.select(&full_url, auth)?;
		let signed = strategy.sign(method, &full_url, options)?;
		let kind = strategy.kind();
		let span = RequestSpan::new(method, kind, "request");

		obs::record_request_outcome(kind, RequestOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response =
					self.transport.execute(signed).await.map_err(TransportError::network)?;

				classify_response(response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_request_outcome(kind, RequestOutcome::Success),
			Err(_) => obs::record_request_outcome(kind, RequestOutcome::Failure),
		}

		result
	}

	fn select(&self, full_url: &str, auth: &CredentialSet) -> Result<SigningStrategy> {
		let strategy = auth::select_strategy(full_url, auth)?;

		Ok(strategy.with_signature_method(self.signature_method))
	}
}
#[cfg(feature = "reqwest")]
impl Dispatcher<ReqwestTransport> {
	/// Creates a dispatcher for `base_endpoint` backed by a default reqwest client.
	pub fn new(base_endpoint: impl Into<String>) -> Self {
		Self::with_transport(base_endpoint, ReqwestTransport::default())
	}

	/// Creates a dispatcher for a known deployment.
	pub fn for_environment(env: Environment) -> Self {
		Self::new(env.base_endpoint())
	}

	/// Creates a dispatcher for the production deployment.
	pub fn production() -> Self {
		Self::for_environment(Environment::Production)
	}

	/// Creates a dispatcher for the sandbox deployment.
	pub fn sandbox() -> Self {
		Self::for_environment(Environment::Sandbox)
	}
}
impl<T> Clone for Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			base_endpoint: self.base_endpoint.clone(),
			transport: Arc::clone(&self.transport),
			signature_method: self.signature_method,
		}
	}
}
impl<T> Debug for Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("base_endpoint", &self.base_endpoint)
			.field("signature_method", &self.signature_method)
			.finish()
	}
}

/// Passes responses below 400 through untouched and turns the rest into [`ConnectionError`].
///
/// The failure test is a range check; the service emits non-standard codes (480, 545, 1001)
/// that must fail like any 4xx. Redirect statuses count as success.
pub fn classify_response(response: ApiResponse) -> Result<ApiResponse> {
	if response.status < FAILURE_STATUS_FLOOR {
		return Ok(response);
	}

	let ApiResponse { status, body, request_url } = response;

	Err(ConnectionError { status, body, request_url }.into())
}
