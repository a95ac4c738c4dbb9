use std::sync::Arc;

use actix_web::{HttpResponse, web};
use campground_scan::{
    AvailableCampsite, CampsiteFinder, Facility, ListedUnit, RecGovSearch, RequestedEquipment,
    ScanError, SearchConfig, SearchParameters, SearchTarget, SearchVariant, SearchWindow,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    /// Booking provider used by every search
    pub finder: Arc<dyn CampsiteFinder>,
    /// Configuration applied to every search
    pub search_config: SearchConfig,
}

/// Request structure for searching campsites or listing units
#[derive(Debug, Deserialize, Validate)]
pub struct SearchRequest {
    /// Date ranges to search, end date exclusive
    #[validate(
        length(min = 1, message = "At least one search window is required"),
        custom(function = "validate_search_windows")
    )]
    pub search_windows: Vec<SearchWindow>,

    /// Recreation area IDs to search
    #[serde(default)]
    pub recreation_areas: Vec<i64>,

    /// Campground (facility) IDs to search
    #[serde(default)]
    pub campgrounds: Vec<i64>,

    /// Campsite IDs to search
    #[serde(default)]
    pub campsites: Vec<i64>,

    /// Whether to only search Friday and Saturday nights
    #[serde(default)]
    pub weekends_only: bool,

    /// Minimum number of consecutive nights
    #[serde(default = "default_nights")]
    #[validate(range(min = 1, message = "nights must be at least 1"))]
    pub nights: u32,

    /// Equipment to filter on
    #[serde(default)]
    pub equipment: Vec<RequestedEquipment>,

    /// Booking product to search
    #[serde(default)]
    pub variant: SearchVariant,
}

fn default_nights() -> u32 {
    1
}

/// Custom validation function for search windows
fn validate_search_windows(windows: &[SearchWindow]) -> Result<(), validator::ValidationError> {
    if windows.iter().all(|w| w.start_date < w.end_date) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("empty_search_window"))
    }
}

impl SearchRequest {
    fn into_parameters(self) -> SearchParameters {
        SearchParameters {
            search_windows: self.search_windows,
            target: SearchTarget {
                campsites: self.campsites,
                campgrounds: self.campgrounds,
                recreation_areas: self.recreation_areas,
            },
            weekends_only: self.weekends_only,
            nights: self.nights,
            equipment: self.equipment,
            variant: self.variant,
        }
    }
}

/// Response structure for a campsite search
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Identifier of this search, also found in the server logs
    pub search_id: Uuid,
    /// Facilities that were searched
    pub campgrounds: Vec<Facility>,
    /// Matching availability
    pub campsites: Vec<AvailableCampsite>,
    /// Number of matching availabilities
    pub total: usize,
}

/// Response structure for a unit listing
#[derive(Debug, Serialize)]
pub struct UnitsResponse {
    /// Identifier of this listing, also found in the server logs
    pub search_id: Uuid,
    /// Bookable units at the searched facilities
    pub units: Vec<ListedUnit>,
    /// Number of units
    pub total: usize,
}

async fn build_search(
    state: &AppState,
    request: SearchRequest,
) -> Result<RecGovSearch, ScanError> {
    request
        .validate()
        .map_err(|e| ScanError::Validation(e.to_string()))?;

    RecGovSearch::new(
        state.finder.clone(),
        request.into_parameters(),
        state.search_config,
    )
    .await
}

/// Handler running a campsite search
pub async fn search_campsites(
    state: web::Data<AppState>,
    request: web::Json<SearchRequest>,
) -> Result<HttpResponse, ScanError> {
    let search_id = Uuid::new_v4();
    log::info!("🔍 Search {} started: {:?}", search_id, request);

    let search = build_search(&state, request.into_inner()).await?;
    let campsites = search.get_all_campsites().await?;

    log::info!(
        "🎯 Search {} found {} campsites",
        search_id,
        campsites.len()
    );

    Ok(HttpResponse::Ok().json(SearchResponse {
        search_id,
        campgrounds: search.campgrounds().to_vec(),
        total: campsites.len(),
        campsites,
    }))
}

/// Handler listing every unit at the requested facilities
pub async fn list_units(
    state: web::Data<AppState>,
    request: web::Json<SearchRequest>,
) -> Result<HttpResponse, ScanError> {
    let search_id = Uuid::new_v4();
    log::info!("📋 Unit listing {} started", search_id);

    let search = build_search(&state, request.into_inner()).await?;
    let units = search.list_campsite_units().await?;

    Ok(HttpResponse::Ok().json(UnitsResponse {
        search_id,
        total: units.len(),
        units,
    }))
}

/// Health check handler
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}
