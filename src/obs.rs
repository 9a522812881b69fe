//! Optional observability helpers for request dispatch.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every dispatch inside a span named `mkm_sdk.request` with the
//!   `method`, `strategy` and `stage` fields.
//! - Enable `metrics` to increment the `mkm_sdk_request_total` counter for every
//!   attempt/success/failure, labeled by `strategy` + `outcome`. Only requests that reach the
//!   transport are counted; configuration errors raised while selecting or signing are not.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// A signed request is about to be sent.
	Attempt,
	/// The service answered below the failure range.
	Success,
	/// Signing, transport or status classification failed.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
