//! Credentials, secret redaction, and OAuth1 strategy selection.

pub mod credentials;
pub mod secret;
pub mod strategy;

pub use credentials::*;
pub use secret::*;
pub use strategy::*;
