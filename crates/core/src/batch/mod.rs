//! Batch processing operations
//!
//! This module provides the scheduled screening job that chains name
//! download, case orchestration, export and delivery.

pub mod service;

pub use service::{BatchReport, BatchStatus, ScreeningBatch};
