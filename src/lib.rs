//! Cardmarket (MKM) API client: OAuth1-signed requests against the production or sandbox
//! endpoint, with every HTTP status at or above 400 surfaced as a typed connection error.
//!
//! The crate is split along the two decisions each request makes:
//!
//! - [`auth::select_strategy`] picks a four-legged ([`auth::SigningStrategy::Full`]) or a
//!   two-legged ([`auth::SigningStrategy::AppOnly`]) OAuth1 signer from the supplied credentials.
//! - [`dispatch::Dispatcher`] composes the request URL from its fixed base endpoint, signs the
//!   request, hands it to an [`http::ApiTransport`], and classifies the response status.
//!
//! [`client::MkmClient`] bundles a dispatcher with injected credentials and the resource
//! [`catalog`] for callers that prefer logical resource names over raw paths.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod catalog;
pub mod client;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod oauth1;
pub mod obs;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
