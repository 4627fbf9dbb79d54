//! Application constants
//!
//! Vendor protocol details (paths, media types) and
//! default budgets. The string values are part of the remote contract and
//! must be sent byte-for-byte.

// Screening API paths
pub const SEARCH_PATH: &str = "/riskentities/search";
pub const PROFILES_PATH: &str = "/riskentities/profiles";
pub const CASES_PATH: &str = "/risk-entity-screening-cases";
pub const BULK_ASSOCIATIONS_TYPE: &str = "risk-entity-screening-cases/bulk-associations";

// Default hosts
pub const DEFAULT_AUTH_HOST: &str = "auth.accounts.dowjones.com";
pub const DEFAULT_API_HOST: &str = "api.dowjones.com";
pub const DEFAULT_DEVICE: &str = "mac";

// Polling budgets
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;
pub const TRANSACTION_BASE_DELAY_SECS: u64 = 5;
pub const MATCHES_BASE_DELAY_SECS: u64 = 10;
pub const POLL_CAP_DELAY_SECS: u64 = 220;
pub const DEFAULT_MATCH_PAGE_LIMIT: u32 = 5000;
pub const MAX_CASE_PAGE_LIMIT: u32 = 1000;

// Export
pub const REPORT_UPLOAD_NAME: &str = "DJ_Response.csv";
pub const REPORT_FILE_PREFIX: &str = "DJ_Response";

/// Columns that always lead the exported match table, in this order.
pub const PRIORITY_COLUMNS: [&str; 13] = [
    "peid",
    "subscription_name",
    "primary_name_entity_name",
    "primary_name_first_name",
    "primary_name_middle_name",
    "primary_name_last_name",
    "match_name",
    "match_type",
    "match_id",
    "gender",
    "birthdates_0_day",
    "birthdates_0_month",
    "birthdates_0_year",
];

/// Fixed vendor media types, one per resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// Name/person/entity/id search
    Search,
    /// Risk profile fetch
    Profile,
    /// Screening case and bulk-association resources
    BulkAssociations,
    /// Plain JSON (transaction and match polling)
    Json,
}

impl MediaType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Search => "application/vnd.dowjones.dna.riskentities.v_2.0+json",
            Self::Profile => "application/vnd.dowjones.dna.riskentities-profiles.v_2.0+json",
            Self::BulkAssociations => "application/vnd.dowjones.dna.bulk-associations.v_1.2+json",
            Self::Json => "application/json",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
