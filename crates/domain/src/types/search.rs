//! Risk-entity search payloads
//!
//! Only the filters the client actually sends are modelled; the remaining
//! catalogue is passed with its defaults.

use serde::{Deserialize, Serialize};

/// Keyword matching strictness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchType {
    #[default]
    Broad,
    Near,
    Precise,
    Exact,
}

/// Free-text name search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSearch {
    pub name: String,
    #[serde(default = "default_record_types")]
    pub record_types: Vec<String>,
    #[serde(default = "default_content_set")]
    pub content_set: Vec<String>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search_type: SearchType,
}

impl NameSearch {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_types: default_record_types(),
            content_set: default_content_set(),
            offset: 0,
            limit: default_limit(),
            search_type: SearchType::default(),
        }
    }

    #[must_use]
    pub fn to_request(&self) -> RiskEntitySearch {
        RiskEntitySearch::new(
            Paging { offset: self.offset, limit: self.limit },
            self.content_set.clone(),
            self.record_types.clone(),
            SearchKeyword {
                scope: vec!["Name".to_string()],
                text: self.name.clone(),
                search_type: self.search_type,
            },
            None,
        )
    }
}

/// Person search by name parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonNameSearch {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(default)]
    pub search_type: SearchType,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl PersonNameSearch {
    #[must_use]
    pub fn full_name(&self) -> String {
        [Some(self.first_name.as_str()), self.middle_name.as_deref(), Some(self.last_name.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[must_use]
    pub fn to_request(&self) -> RiskEntitySearch {
        RiskEntitySearch::new(
            Paging { offset: 0, limit: self.limit },
            default_content_set(),
            vec!["Person".to_string()],
            SearchKeyword {
                scope: vec!["Name".to_string()],
                text: self.full_name(),
                search_type: self.search_type,
            },
            None,
        )
    }
}

/// Organisation search by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNameSearch {
    pub entity_name: String,
    #[serde(default)]
    pub search_type: SearchType,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl EntityNameSearch {
    #[must_use]
    pub fn to_request(&self) -> RiskEntitySearch {
        RiskEntitySearch::new(
            Paging { offset: 0, limit: self.limit },
            default_content_set(),
            vec!["Entity".to_string()],
            SearchKeyword {
                scope: vec!["Name".to_string()],
                text: self.entity_name.clone(),
                search_type: self.search_type,
            },
            None,
        )
    }
}

/// Exact lookup by identification number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSearch {
    pub id_number: String,
    /// Restrict to one identifier type (e.g. `"National Tax No."`)
    #[serde(default)]
    pub id_type: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl IdSearch {
    #[must_use]
    pub fn to_request(&self) -> RiskEntitySearch {
        RiskEntitySearch::new(
            Paging { offset: 0, limit: self.limit },
            default_content_set(),
            default_record_types(),
            SearchKeyword {
                scope: vec!["IDNumber".to_string()],
                text: self.id_number.clone(),
                search_type: SearchType::Exact,
            },
            self.id_type.clone().map(|id_type| vec![id_type]),
        )
    }
}

// ---------------------------------------------------------------------------
// Wire envelope
// ---------------------------------------------------------------------------

/// `{"data": {"type": "RiskEntitySearch", "attributes": {...}}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEntitySearch {
    pub data: SearchData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchData {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: SearchAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAttributes {
    pub paging: Paging,
    pub sort: Option<String>,
    pub filter_group_and: FilterGroupAnd,
    pub filter_group_or: FilterGroupOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroupAnd {
    pub filters: AndFilters,
    pub group_operator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndFilters {
    pub content_set: Vec<String>,
    pub record_types: Vec<String>,
    pub search_keyword: SearchKeyword,
    pub country_territory: CountryTerritory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchKeyword {
    pub scope: Vec<String>,
    pub text: String,
    #[serde(rename = "type")]
    pub search_type: SearchType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTerritory {
    pub country_territory_types: CountryTerritoryTypes,
    pub countries_territories: CountriesTerritories,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTerritoryTypes {
    pub country_territory_types: Vec<String>,
    pub operator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountriesTerritories {
    pub codes: Vec<String>,
    pub exclude_codes: Vec<String>,
    pub operator: String,
}

impl Default for CountryTerritory {
    fn default() -> Self {
        Self {
            country_territory_types: CountryTerritoryTypes {
                country_territory_types: Vec::new(),
                operator: "OR".to_string(),
            },
            countries_territories: CountriesTerritories {
                codes: Vec::new(),
                exclude_codes: Vec::new(),
                operator: "OR".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroupOr {
    pub filters: OrFilters,
    pub group_operator: String,
}

/// Exclusion groups; every one is included by default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrFilters {
    pub sanctions_list: Exclusion,
    pub content_category: ContentCategory,
    pub other_official_list: Exclusion,
    pub other_exclusion_list: Exclusion,
    pub state_ownership: Exclusion,
    pub occupation_category: Exclusion,
    pub hrf_category: Exclusion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCategory {
    pub special_interest: Exclusion,
    pub adverse_media: Exclusion,
    pub location: Exclusion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    pub is_all_excluded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

impl Exclusion {
    fn included(operator: &str) -> Self {
        Self { is_all_excluded: false, operator: Some(operator.to_string()) }
    }
}

impl Default for FilterGroupOr {
    fn default() -> Self {
        Self {
            filters: OrFilters {
                sanctions_list: Exclusion::included("OR"),
                content_category: ContentCategory {
                    special_interest: Exclusion::included("OR"),
                    adverse_media: Exclusion::included("OR"),
                    location: Exclusion::included("OR"),
                },
                other_official_list: Exclusion::included("OR"),
                other_exclusion_list: Exclusion::included("OR"),
                state_ownership: Exclusion { is_all_excluded: false, operator: None },
                occupation_category: Exclusion::included("Or"),
                hrf_category: Exclusion::included("OR"),
            },
            group_operator: "Or".to_string(),
        }
    }
}

impl RiskEntitySearch {
    fn new(
        paging: Paging,
        content_set: Vec<String>,
        record_types: Vec<String>,
        search_keyword: SearchKeyword,
        id_number_types: Option<Vec<String>>,
    ) -> Self {
        Self {
            data: SearchData {
                kind: "RiskEntitySearch".to_string(),
                attributes: SearchAttributes {
                    paging,
                    sort: None,
                    filter_group_and: FilterGroupAnd {
                        filters: AndFilters {
                            content_set,
                            record_types,
                            search_keyword,
                            country_territory: CountryTerritory::default(),
                            id_number_types,
                        },
                        group_operator: "And".to_string(),
                    },
                    filter_group_or: FilterGroupOr::default(),
                },
            },
        }
    }
}

fn default_record_types() -> Vec<String> {
    vec!["Person".to_string(), "Entity".to_string()]
}

fn default_content_set() -> Vec<String> {
    vec!["WatchList".to_string()]
}

fn default_limit() -> u32 {
    20
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn name_search_serializes_vendor_envelope() {
        let body = serde_json::to_value(NameSearch::new("Acme Corp").to_request()).unwrap();

        assert_eq!(body["data"]["type"], "RiskEntitySearch");
        assert_eq!(body["data"]["attributes"]["paging"], json!({"offset": 0, "limit": 20}));
        assert!(body["data"]["attributes"]["sort"].is_null());

        let and = &body["data"]["attributes"]["filter_group_and"];
        assert_eq!(and["group_operator"], "And");
        assert_eq!(and["filters"]["record_types"], json!(["Person", "Entity"]));
        assert_eq!(and["filters"]["content_set"], json!(["WatchList"]));
        assert_eq!(
            and["filters"]["search_keyword"],
            json!({"scope": ["Name"], "text": "Acme Corp", "type": "BROAD"})
        );
        assert!(and["filters"].get("id_number_types").is_none());

        let or = &body["data"]["attributes"]["filter_group_or"];
        assert_eq!(or["group_operator"], "Or");
        assert_eq!(or["filters"]["state_ownership"], json!({"is_all_excluded": false}));
        assert_eq!(or["filters"]["occupation_category"]["operator"], "Or");
    }

    #[test]
    fn person_search_joins_name_parts() {
        let search = PersonNameSearch {
            first_name: "Jane".into(),
            middle_name: Some(" ".into()),
            last_name: "Doe".into(),
            search_type: SearchType::Near,
            limit: 5,
        };
        let body = serde_json::to_value(search.to_request()).unwrap();
        let filters = &body["data"]["attributes"]["filter_group_and"]["filters"];
        assert_eq!(filters["search_keyword"]["text"], "Jane Doe");
        assert_eq!(filters["search_keyword"]["type"], "NEAR");
        assert_eq!(filters["record_types"], json!(["Person"]));
    }

    #[test]
    fn id_search_uses_exact_id_scope() {
        let search = IdSearch { id_number: "123-45".into(), id_type: Some("Passport No.".into()), limit: 20 };
        let body = serde_json::to_value(search.to_request()).unwrap();
        let filters = &body["data"]["attributes"]["filter_group_and"]["filters"];
        assert_eq!(filters["search_keyword"]["scope"], json!(["IDNumber"]));
        assert_eq!(filters["search_keyword"]["type"], "EXACT");
        assert_eq!(filters["id_number_types"], json!(["Passport No."]));
    }
}
