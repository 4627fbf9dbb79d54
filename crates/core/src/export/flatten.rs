//! Match flattening for tabular export
//!
//! Flattening is one level deep: nested objects become `key_subkey`, array
//! items become `key_i_subkey` (object items) or `key_i` (scalars). Deeper
//! values are kept as JSON and rendered compactly.

use std::collections::{BTreeMap, BTreeSet};

use riskscreen_domain::constants::PRIORITY_COLUMNS;
use riskscreen_domain::Match;
use serde_json::Value;

/// Flatten one match record.
#[must_use]
pub fn flatten_match(record: &Match) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();

    for (key, value) in record {
        match value {
            Value::Object(fields) => {
                for (sub_key, sub_value) in fields {
                    flat.insert(format!("{key}_{sub_key}"), sub_value.clone());
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if let Value::Object(fields) = item {
                        for (sub_key, sub_value) in fields {
                            flat.insert(format!("{key}_{index}_{sub_key}"), sub_value.clone());
                        }
                    } else {
                        flat.insert(format!("{key}_{index}"), item.clone());
                    }
                }
            }
            scalar => {
                flat.insert(key.clone(), scalar.clone());
            }
        }
    }

    flat
}

/// Header plus string rows ready for a CSV writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MatchTable {
    /// Flatten `matches` and order columns: every priority column first (even
    /// when no record has it), then the remaining columns sorted.
    #[must_use]
    pub fn from_matches(matches: &[Match]) -> Self {
        let flattened: Vec<BTreeMap<String, Value>> = matches.iter().map(flatten_match).collect();

        let extra: BTreeSet<&str> = flattened
            .iter()
            .flat_map(|record| record.keys().map(String::as_str))
            .filter(|column| !PRIORITY_COLUMNS.contains(column))
            .collect();

        let columns: Vec<String> = PRIORITY_COLUMNS
            .iter()
            .copied()
            .chain(extra)
            .map(str::to_string)
            .collect();

        let rows = flattened
            .iter()
            .map(|record| columns.iter().map(|column| render_cell(record.get(column))).collect())
            .collect();

        Self { columns, rows }
    }

    /// Header-only table (priority columns, no rows).
    #[must_use]
    pub fn empty() -> Self {
        Self::from_matches(&[])
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
