//! Match payload views
//!
//! The vendor returns matches in three different shapes depending on the
//! endpoint and API revision. [`MatchLocation`] names each of them so
//! extraction is an explicit, ordered search instead of ad-hoc lookups.

use serde_json::{Map, Value};

use crate::errors::{Result, ScreeningError};

/// One watch-list hit, passed through unmodified
pub type Match = Map<String, Value>;

/// Where a response may carry its matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLocation {
    /// `matches: [...]`
    TopLevel,
    /// `data: [{attributes: {matches: [...]}}]`
    DataAttributes,
    /// `matches: {data: [{attributes: {matches: [...]}}]}`
    NestedData,
}

impl MatchLocation {
    /// Extraction order
    pub const SEARCH_ORDER: [MatchLocation; 3] =
        [Self::TopLevel, Self::DataAttributes, Self::NestedData];

    /// Collect the matches found at this location. Entries that are not JSON
    /// objects are skipped.
    #[must_use]
    pub fn extract(self, body: &Value) -> Vec<Match> {
        match self {
            Self::TopLevel => body
                .get("matches")
                .and_then(Value::as_array)
                .map(|items| objects(items).collect())
                .unwrap_or_default(),
            Self::DataAttributes => from_data_items(body.get("data")),
            Self::NestedData => from_data_items(body.get("matches").and_then(|m| m.get("data"))),
        }
    }
}

fn objects(items: &[Value]) -> impl Iterator<Item = Match> + '_ {
    items.iter().filter_map(|item| item.as_object().cloned())
}

fn from_data_items(data: Option<&Value>) -> Vec<Match> {
    let Some(items) = data.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.pointer("/attributes/matches").and_then(Value::as_array))
        .flat_map(|matches| objects(matches))
        .collect()
}

/// Pull the matches out of a ready response.
///
/// Locations are tried in [`MatchLocation::SEARCH_ORDER`]; the first one
/// yielding a non-empty list wins.
///
/// # Errors
///
/// [`ScreeningError::NoMatchesFound`] when every location is empty.
pub fn extract_matches(body: &Value) -> Result<Vec<Match>> {
    MatchLocation::SEARCH_ORDER
        .iter()
        .map(|location| location.extract(body))
        .find(|matches| !matches.is_empty())
        .ok_or_else(|| {
            ScreeningError::NoMatchesFound(
                "response carried no matches at any known location".to_string(),
            )
        })
}

/// How a match-retrieval response should be treated by the poller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchReadiness {
    Ready,
    Processing,
    Failed { status: u16, detail: String },
}

/// Classify a match-retrieval response body.
///
/// A body with `data` or `matches`, or without `errors`, is ready. An
/// `errors` array with any entry of status 202 means still processing.
/// Anything else is a remote failure described by the first error entry.
#[must_use]
pub fn classify_match_response(body: &Value) -> MatchReadiness {
    let Some(object) = body.as_object() else {
        return MatchReadiness::Ready;
    };
    if object.contains_key("data") || object.contains_key("matches") {
        return MatchReadiness::Ready;
    }
    let Some(errors) = object.get("errors") else {
        return MatchReadiness::Ready;
    };

    let entries = errors.as_array().map(Vec::as_slice).unwrap_or_default();
    if entries.iter().any(|entry| error_status(entry) == Some(202)) {
        return MatchReadiness::Processing;
    }

    let first = entries.first();
    MatchReadiness::Failed {
        status: first.and_then(error_status).unwrap_or(500),
        detail: first
            .and_then(|entry| entry.get("detail").or_else(|| entry.get("title")))
            .and_then(Value::as_str)
            .map_or_else(|| errors.to_string(), str::to_string),
    }
}

// The vendor sends status both as a number and as a string.
fn error_status(entry: &Value) -> Option<u16> {
    match entry.get("status")? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_from_data_attributes() {
        let body = json!({"data": [{"attributes": {"matches": [{"id": "m1"}, {"id": "m2"}]}}]});
        let matches = extract_matches(&body).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["id"], "m1");
        assert_eq!(matches[1]["id"], "m2");
    }

    #[test]
    fn top_level_wins_over_later_locations() {
        let body = json!({
            "matches": [{"score": 90}],
            "data": [{"attributes": {"matches": [{"score": 10}]}}]
        });
        let matches = extract_matches(&body).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["score"], 90);
    }

    #[test]
    fn empty_earlier_location_falls_through() {
        let body = json!({
            "matches": [],
            "data": [{"attributes": {"matches": [{"score": 10}]}}]
        });
        assert_eq!(extract_matches(&body).unwrap()[0]["score"], 10);
    }

    #[test]
    fn extracts_from_nested_data() {
        let body = json!({"matches": {"data": [
            {"attributes": {"matches": [{"peid": 1}]}},
            {"attributes": {"matches": [{"peid": 2}]}}
        ]}});
        let matches = extract_matches(&body).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1]["peid"], 2);
    }

    #[test]
    fn no_matches_anywhere_is_an_error() {
        let err = extract_matches(&json!({"data": []})).unwrap_err();
        assert!(matches!(err, ScreeningError::NoMatchesFound(_)));
    }

    #[test]
    fn classifies_match_responses() {
        assert_eq!(classify_match_response(&json!({"matches": []})), MatchReadiness::Ready);
        assert_eq!(classify_match_response(&json!({"meta": {}})), MatchReadiness::Ready);
        assert_eq!(
            classify_match_response(&json!({"errors": [{"status": 202}]})),
            MatchReadiness::Processing
        );
        assert_eq!(
            classify_match_response(&json!({"errors": [{"status": "202", "detail": "busy"}]})),
            MatchReadiness::Processing
        );
        assert_eq!(
            classify_match_response(&json!({"errors": [{"status": 500, "detail": "boom"}]})),
            MatchReadiness::Failed { status: 500, detail: "boom".into() }
        );
    }
}
