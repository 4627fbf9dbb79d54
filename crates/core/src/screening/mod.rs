//! Screening case orchestration
//!
//! This module provides the [`ScreeningApi`] port and the
//! [`CaseOrchestrator`] that drives a case through creation and the two
//! polling loops.

pub mod orchestrator;
pub mod poll;
pub mod ports;

pub use orchestrator::{CaseOrchestrator, PollingPolicy};
pub use poll::{classify_matches, classify_transaction, PollOutcome};
pub use ports::ScreeningApi;
