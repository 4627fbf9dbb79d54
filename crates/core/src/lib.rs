//! # Riskscreen Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the screening API, report writing and
//!   file transfer
//! - The case orchestration state machine and its polling loops
//! - Match flattening for export
//! - The screening batch job
//!
//! ## Architecture Principles
//! - Only depends on `riskscreen-common` and `riskscreen-domain`
//! - No HTTP, filesystem or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod batch;
pub mod export;
pub mod screening;

// Re-export specific items to avoid ambiguity
pub use batch::{BatchReport, BatchStatus, ScreeningBatch};
pub use export::{FileTransfer, MatchTable, ReportWriter};
pub use screening::{CaseOrchestrator, PollOutcome, PollingPolicy, ScreeningApi};
