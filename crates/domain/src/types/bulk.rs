//! Bulk-association case creation payload

use serde::{Deserialize, Serialize};

use super::search::SearchType;
use crate::constants::BULK_ASSOCIATIONS_TYPE;
use crate::errors::{Result, ScreeningError};

/// Case metadata that is not derived from the name list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDetails {
    pub case_name: String,
    pub external_id: String,
    pub owner_id: String,
}

impl Default for CaseDetails {
    fn default() -> Self {
        Self {
            case_name: "screening_case".to_string(),
            external_id: "external_id_123".to_string(),
            owner_id: "DJ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NameType {
    Primary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    Unknown,
    Person,
    Entity,
}

/// Request body for `POST /risk-entity-screening-cases/bulk-associations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssociationRequest {
    pub data: BulkAssociationData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssociationData {
    pub attributes: BulkAssociationAttributes,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssociationAttributes {
    pub case_info: CaseInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInfo {
    pub associations: Vec<Association>,
    pub case_name: String,
    pub external_id: String,
    pub owner_id: String,
    pub has_alerts: bool,
    pub options: CaseOptions,
    pub score_preferences: ScorePreferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub names: Vec<AssociationName>,
    pub record_type: RecordType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationName {
    pub single_string_name: String,
    pub name_type: NameType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOptions {
    pub filter_content_category: Vec<String>,
    pub has_to_match_low_quality_alias: bool,
    pub is_indexed: bool,
    pub search_type: SearchType,
}

impl Default for CaseOptions {
    fn default() -> Self {
        Self {
            filter_content_category: vec!["WL".to_string()],
            has_to_match_low_quality_alias: true,
            is_indexed: false,
            search_type: SearchType::Broad,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScorePreference {
    pub has_exclusions: bool,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScorePreferences {
    pub country: ScorePreference,
    pub gender: ScorePreference,
    pub identification_details: ScorePreference,
    pub industry_sector: ScorePreference,
    pub year_of_birth: ScorePreference,
}

impl Association {
    /// A single primary alias with unknown record type
    #[must_use]
    pub fn primary_name(name: impl Into<String>) -> Self {
        Self {
            names: vec![AssociationName { single_string_name: name.into(), name_type: NameType::Primary }],
            record_type: RecordType::Unknown,
        }
    }
}

impl BulkAssociationRequest {
    /// Build a case payload screening every name in `names`.
    ///
    /// Blank entries are dropped.
    ///
    /// # Errors
    ///
    /// [`ScreeningError::InvalidInput`] when no usable name remains.
    pub fn from_names<S: AsRef<str>>(names: &[S], details: CaseDetails) -> Result<Self> {
        let associations: Vec<Association> = names
            .iter()
            .map(|name| name.as_ref().trim())
            .filter(|name| !name.is_empty())
            .map(Association::primary_name)
            .collect();

        if associations.is_empty() {
            return Err(ScreeningError::InvalidInput("name list is empty".to_string()));
        }

        Ok(Self {
            data: BulkAssociationData {
                attributes: BulkAssociationAttributes {
                    case_info: CaseInfo {
                        associations,
                        case_name: details.case_name,
                        external_id: details.external_id,
                        owner_id: details.owner_id,
                        has_alerts: true,
                        options: CaseOptions::default(),
                        score_preferences: ScorePreferences::default(),
                    },
                },
                kind: BULK_ASSOCIATIONS_TYPE.to_string(),
            },
        })
    }

    #[must_use]
    pub fn association_count(&self) -> usize {
        self.data.attributes.case_info.associations.len()
    }
}
