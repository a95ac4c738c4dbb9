use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scan_types::{ListedUnit, ScanError};

/// Equipment entry as returned by the recreation.gov campsite search
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecGovEquipment {
    /// Raw equipment description
    pub equipment_name: Option<String>,
    /// Maximum length in feet
    pub max_length: Option<f64>,
}

/// Per-campsite descriptor from the recreation.gov campsite search
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecGovCampsite {
    /// Campsite ID
    pub campsite_id: String,
    /// Facility the campsite belongs to
    pub asset_id: String,
    /// Site label
    pub name: String,
    /// Loop the site sits in
    #[serde(rename = "loop")]
    pub campsite_loop: Option<String>,
    /// Site type
    #[serde(rename = "type")]
    pub campsite_type: Option<String>,
    /// Overnight or day use
    pub type_of_use: Option<String>,
    /// Equipment the site accepts
    #[serde(default)]
    pub permitted_equipment: Vec<RecGovEquipment>,
}

/// Per-result descriptor from the generic recreation.gov search, used for
/// facilities that have no campsites (tours, timed entries)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecGovSearchResult {
    /// ID of the bookable entity
    pub entity_id: String,
    /// Facility the entity belongs to
    pub parent_id: String,
    /// Display name
    pub name: String,
    /// Kind of entity, e.g. "tour"
    pub entity_type: Option<String>,
}

/// Unit listing in one of the two shapes recreation.gov answers with
#[derive(Debug, Clone, PartialEq)]
pub enum UnitListing {
    /// Campsite search results
    Campsites(Vec<RecGovCampsite>),
    /// Generic search results
    SearchResults(Vec<RecGovSearchResult>),
}

impl UnitListing {
    /// Decode a JSON array of units, picking the shape from its first element
    pub fn from_value(value: Value) -> Result<Self, ScanError> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(ScanError::UnsupportedType(json_type_name(&other).to_string())),
        };

        let Some(first) = items.first() else {
            return Ok(UnitListing::Campsites(Vec::new()));
        };

        let parse_error = |e: serde_json::Error| ScanError::DataFormat(e.to_string());

        if first.get("campsite_id").is_some() {
            let campsites = serde_json::from_value(Value::Array(items)).map_err(parse_error)?;
            Ok(UnitListing::Campsites(campsites))
        } else if first.get("entity_id").is_some() {
            let results = serde_json::from_value(Value::Array(items)).map_err(parse_error)?;
            Ok(UnitListing::SearchResults(results))
        } else {
            Err(ScanError::UnsupportedType(json_type_name(first).to_string()))
        }
    }

    /// Number of units in the listing
    pub fn len(&self) -> usize {
        match self {
            UnitListing::Campsites(items) => items.len(),
            UnitListing::SearchResults(items) => items.len(),
        }
    }

    /// Whether the listing holds no units
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "unrecognized object",
    }
}

/// Normalize a unit listing, keeping input order and duplicates
pub fn list_units(listing: &UnitListing) -> Vec<ListedUnit> {
    match listing {
        UnitListing::Campsites(campsites) => campsites
            .iter()
            .map(|item| ListedUnit {
                id: item.campsite_id.clone(),
                facility_id: item.asset_id.clone(),
                name: item.name.clone(),
            })
            .collect(),
        UnitListing::SearchResults(results) => results
            .iter()
            .map(|item| ListedUnit {
                id: item.entity_id.clone(),
                facility_id: item.parent_id.clone(),
                name: item.name.clone(),
            })
            .collect(),
    }
}
