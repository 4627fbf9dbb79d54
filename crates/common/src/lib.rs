//! Modular common utilities shared across riskscreen crates.
//!
//! Nothing in here knows about screening cases or matches; it holds the
//! protocol-agnostic machinery the screening crates are built on.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: capped exponential backoff
//! - `runtime`: two-stage OAuth token lifecycle, clocks, cancellable sleeper
//! - `test-utils`: scripted grant exchange, mock clock, recording sleeper

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod resilience;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod auth;
#[cfg(feature = "runtime")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(all(feature = "runtime", any(feature = "test-utils", test)))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use auth::{AuthClient, AuthError, Credential, GrantExchange, OAuthClient, OAuthConfig, TokenStore};
#[cfg(feature = "foundation")]
pub use resilience::ExponentialBackoff;
#[cfg(feature = "runtime")]
pub use time::{Clock, SleepOutcome, Sleeper, SystemClock, TokioSleeper};
