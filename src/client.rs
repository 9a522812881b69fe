//! Resource-name facade over [`Dispatcher`].

// self
use crate::{
	_prelude::*,
	auth::CredentialSet,
	catalog::{self, ResourceEndpoint},
	dispatch::Dispatcher,
	endpoint::Environment,
	error::ConfigError,
	http::{ApiResponse, ApiTransport, HttpMethod, RequestOptions},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestMkmClient = MkmClient<ReqwestTransport>;

/// Dispatcher bundled with the credentials every call is signed with.
pub struct MkmClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Underlying dispatcher.
	pub dispatcher: Dispatcher<T>,
	/// Credentials injected into every request.
	pub credentials: CredentialSet,
}
impl<T> MkmClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Pairs an existing dispatcher with credentials.
	pub fn with_dispatcher(dispatcher: Dispatcher<T>, credentials: CredentialSet) -> Self {
		Self { dispatcher, credentials }
	}

	/// Base endpoint of the underlying dispatcher.
	pub fn base_endpoint(&self) -> &str {
		self.dispatcher.base_endpoint()
	}

	/// Calls a catalog resource, filling its path template from `params`.
	///
	/// Unknown resources and missing path parameters fail before anything is sent.
	pub async fn call(
		&self,
		section: &str,
		name: &str,
		params: &[(&str, &str)],
		options: RequestOptions,
	) -> Result<ApiResponse> {
		let resource = catalog::lookup(section, name)?;

		self.call_resource(resource, params, options).await
	}

	/// Calls an already resolved catalog entry.
	pub async fn call_resource(
		&self,
		resource: &ResourceEndpoint,
		params: &[(&str, &str)],
		options: RequestOptions,
	) -> Result<ApiResponse> {
		let path = resource.resolve_path(params)?;

		self.request(&path, resource.method, options).await
	}

	/// Sends a raw logical path with the injected credentials.
	pub async fn request(
		&self,
		logical_path: &str,
		method: HttpMethod,
		options: RequestOptions,
	) -> Result<ApiResponse> {
		self.dispatcher.request(logical_path, method, &self.credentials, options).await
	}
}
#[cfg(feature = "reqwest")]
impl MkmClient<ReqwestTransport> {
	/// Creates a reqwest-backed client for a known deployment.
	pub fn new(env: Environment, credentials: CredentialSet) -> Self {
		Self::with_dispatcher(Dispatcher::for_environment(env), credentials)
	}

	/// Creates a production client.
	pub fn production(credentials: CredentialSet) -> Self {
		Self::new(Environment::Production, credentials)
	}

	/// Creates a sandbox client.
	pub fn sandbox(credentials: CredentialSet) -> Self {
		Self::new(Environment::Sandbox, credentials)
	}

	/// Creates a client whose credentials come from the `MKM_*` environment variables.
	pub fn from_env(env: Environment) -> Result<Self, ConfigError> {
		Ok(Self::new(env, CredentialSet::from_env()?))
	}
}
impl<T> Clone for MkmClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self { dispatcher: self.dispatcher.clone(), credentials: self.credentials.clone() }
	}
}
impl<T> Debug for MkmClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MkmClient")
			.field("dispatcher", &self.dispatcher)
			.field("credentials", &self.credentials)
			.finish()
	}
}
