//! # Riskscreen Domain
//!
//! Business domain types and models for entity screening.
//!
//! This crate contains:
//! - The screening error taxonomy and Result definition
//! - Configuration structures
//! - Vendor constants (endpoints, media types, polling defaults)
//! - Typed request payloads and tolerant response views
//!
//! ## Architecture
//! - No dependencies on other riskscreen crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
