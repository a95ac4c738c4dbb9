use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A campground, ticketed attraction or timed-entry venue known to recreation.gov
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    /// Recreation.gov facility ID
    pub facility_id: i64,
    /// Display name of the facility
    pub facility_name: String,
    /// Name of the recreation area the facility belongs to
    pub recreation_area: String,
    /// ID of the recreation area the facility belongs to
    pub recreation_area_id: i64,
}

// Facility identity is the facility ID alone
impl PartialEq for Facility {
    fn eq(&self, other: &Self) -> bool {
        self.facility_id == other.facility_id
    }
}

impl Eq for Facility {}

impl Hash for Facility {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.facility_id.hash(state);
    }
}

/// Piece of equipment a campsite permits, as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermittedEquipment {
    /// Raw provider description, e.g. "Large Tent Over 9X12" or "RV/Motorhome"
    pub equipment_name: Option<String>,
    /// Maximum equipment length in feet, when the provider lists one
    pub max_length: Option<f64>,
}

impl PermittedEquipment {
    /// Named equipment with an optional maximum length
    pub fn new(equipment_name: &str, max_length: Option<f64>) -> Self {
        Self {
            equipment_name: Some(equipment_name.to_string()),
            max_length,
        }
    }
}

/// One available campsite booking, either a single night straight from the
/// provider or a multi-night window after consolidation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableCampsite {
    /// Physical campsite ID, unique across a search
    pub campsite_id: i64,
    /// First night of the booking
    pub booking_date: NaiveDate,
    /// Checkout date
    pub booking_end_date: NaiveDate,
    /// Number of nights between booking_date and booking_end_date
    pub booking_nights: u32,
    /// Site label shown on recreation.gov, e.g. "A005"
    pub campsite_site_name: String,
    /// Loop the site sits in
    pub campsite_loop_name: Option<String>,
    /// Provider site type, e.g. "STANDARD NONELECTRIC"
    pub campsite_type: Option<String>,
    /// Overnight or day use
    pub campsite_use_type: Option<String>,
    /// Minimum and maximum number of people
    pub campsite_occupancy: Option<(u32, u32)>,
    /// Raw provider status of the first night
    pub availability_status: String,
    /// Name of the owning recreation area
    pub recreation_area: String,
    /// ID of the owning recreation area
    pub recreation_area_id: i64,
    /// Name of the owning facility
    pub facility_name: String,
    /// ID of the owning facility
    pub facility_id: i64,
    /// Link to the campsite's booking page
    pub booking_url: String,
    /// Equipment the campsite accepts
    #[serde(default)]
    pub permitted_equipment: Option<Vec<PermittedEquipment>>,
}

/// A single entry of a caller's equipment request: a category name (or HHMM
/// timestamp for timed-entry searches) and an optional minimum length in feet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedEquipment {
    /// Category name or HHMM timestamp
    pub name: String,
    /// Minimum length in feet the campsite must allow
    #[serde(default)]
    pub max_length: Option<f64>,
}

impl RequestedEquipment {
    /// Requested equipment with an optional minimum length
    pub fn new(name: &str, max_length: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            max_length,
        }
    }
}

/// Normalized bookable unit, independent of the upstream response it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedUnit {
    /// Campsite or entity ID
    pub id: String,
    /// Owning facility ID
    pub facility_id: String,
    /// Display name
    pub name: String,
}

/// What a search should look for. The first non-empty list wins, in the order
/// campsites, campgrounds, recreation areas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchTarget {
    /// Individual campsite IDs
    #[serde(default)]
    pub campsites: Vec<i64>,
    /// Campground (facility) IDs
    #[serde(default)]
    pub campgrounds: Vec<i64>,
    /// Recreation area IDs
    #[serde(default)]
    pub recreation_areas: Vec<i64>,
}

impl SearchTarget {
    /// Whether no campsite, campground or recreation area was given
    pub fn is_empty(&self) -> bool {
        self.campsites.is_empty() && self.campgrounds.is_empty() && self.recreation_areas.is_empty()
    }
}

/// Booking product searched on recreation.gov
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchVariant {
    /// Overnight campsites
    #[default]
    Campsites,
    /// Tickets and tours
    Ticket,
    /// Timed entries
    TimedEntry,
    /// Tickets and tours, searched per day and time slot
    DailyTicket,
    /// Timed entries, searched per day and time slot
    DailyTimedEntry,
}

impl SearchVariant {
    /// Request name of the variant
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchVariant::Campsites => "campsites",
            SearchVariant::Ticket => "ticket",
            SearchVariant::TimedEntry => "timed_entry",
            SearchVariant::DailyTicket => "daily_ticket",
            SearchVariant::DailyTimedEntry => "daily_timed_entry",
        }
    }

    /// Vocabulary that equipment requests are checked against for this variant
    pub fn vocabulary_mode(&self) -> crate::equipment::VocabularyMode {
        use crate::equipment::VocabularyMode;

        match self {
            SearchVariant::DailyTicket | SearchVariant::DailyTimedEntry => {
                VocabularyMode::Timestamp
            }
            _ => VocabularyMode::Category,
        }
    }
}

/// Custom error type for scan operations
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// No campsite, campground or recreation area ID was given
    #[error("You must provide a Campsite, Campground or Recreation Area ID")]
    NoSearchTarget,

    /// The resolved facility list is empty
    #[error("No campgrounds found to search")]
    NoCampgrounds,

    /// A unit listing came back in a shape the lister does not know
    #[error("Cannot get listable campsites from type {0}")]
    UnsupportedType(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Resource not found")]
    NotFound,

    /// API error
    #[error("API error: {0}")]
    ApiError(String),

    /// Rate limited by external API
    #[error("Rate limited by external API")]
    RateLimited,

    /// Authentication failed with external service
    #[error("Authentication failed with external service")]
    AuthenticationFailed,

    /// Data format error
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl actix_web::ResponseError for ScanError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            ScanError::NoSearchTarget => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "no_search_target",
                "message": self.to_string()
            })),
            ScanError::NoCampgrounds => HttpResponse::NotFound().json(serde_json::json!({
                "error": "no_campgrounds",
                "message": self.to_string()
            })),
            ScanError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            ScanError::ConfigError(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "configuration_error",
                "message": format!("Configuration error: {}", msg)
            })),
            ScanError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
                "message": "Resource not found"
            })),
            ScanError::ApiError(msg) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "api_error",
                "message": format!("External API error: {}", msg)
            })),
            ScanError::RateLimited => HttpResponse::TooManyRequests().json(serde_json::json!({
                "error": "rate_limited",
                "message": "Rate limited by external service. Please try again later."
            })),
            ScanError::AuthenticationFailed => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "authentication_failed",
                "message": "Failed to authenticate with external service"
            })),
            ScanError::DataFormat(msg) => {
                HttpResponse::BadGateway().json(serde_json::json!({
                    "error": "data_format_error",
                    "message": format!("Data format error: {}", msg)
                }))
            }
            ScanError::UnsupportedType(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                }))
            }
        }
    }
}
