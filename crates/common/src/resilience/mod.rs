//! Resilience patterns
//!
//! Polling loops against eventually-consistent remote resources use a
//! capped exponential backoff with a hard attempt budget; nothing here ever
//! retries forever.

pub mod backoff;

pub use backoff::ExponentialBackoff;
