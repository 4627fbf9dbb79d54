//! Match export
//!
//! Flattening and column ordering of match records, plus the ports used to
//! persist and deliver the resulting table.

pub mod flatten;
pub mod ports;

pub use flatten::{flatten_match, MatchTable};
pub use ports::{FileTransfer, ReportWriter};
