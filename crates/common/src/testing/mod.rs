//! Testing utilities and helpers
//!
//! - **[`mocks`]**: scripted identity provider
//! - **[`time`]**: mock clock and recording sleeper

pub mod mocks;
pub mod time;

pub use mocks::MockGrantExchange;
pub use time::{MockClock, RecordingSleeper};
