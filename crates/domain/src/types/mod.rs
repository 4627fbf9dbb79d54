//! Domain types and models

pub mod bulk;
pub mod case;
pub mod matches;
pub mod search;

pub use bulk::{Association, BulkAssociationRequest, CaseDetails, NameType, RecordType};
pub use case::{ApiResponse, CaseHandle, CaseOutcome, CaseState, MatchResults, TransactionStatus};
pub use matches::{classify_match_response, extract_matches, Match, MatchLocation, MatchReadiness};
pub use search::{EntityNameSearch, IdSearch, NameSearch, PersonNameSearch, RiskEntitySearch, SearchType};
