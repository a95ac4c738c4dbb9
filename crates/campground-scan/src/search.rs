use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::{AvailabilityAggregator, RateLimit, Throttle, TokioThrottle};
use crate::consolidation::{ConsecutiveNightConsolidator, Consolidator};
use crate::equipment::VocabularyMode;
use crate::equipment_filter::filter_campsites_to_equipment;
use crate::equipment_validator::validate_equipment;
use crate::provider::CampsiteFinder;
use crate::resolver::resolve_campgrounds;
use crate::scan_types::{
    AvailableCampsite, Facility, ListedUnit, RequestedEquipment, ScanError, SearchTarget,
    SearchVariant,
};
use crate::search_window::{SearchWindow, search_days, search_months};
use crate::unit_lister::list_units;

/// Parameters describing one search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Date ranges to search, end date exclusive
    pub search_windows: Vec<SearchWindow>,
    /// Campsites, campgrounds or recreation areas to search
    #[serde(default)]
    pub target: SearchTarget,
    /// Only search Friday and Saturday nights
    #[serde(default)]
    pub weekends_only: bool,
    /// Minimum number of consecutive nights per campsite
    #[serde(default = "default_nights")]
    pub nights: u32,
    /// Equipment to filter on; empty accepts every campsite
    #[serde(default)]
    pub equipment: Vec<RequestedEquipment>,
    /// Booking product; selects the equipment vocabulary
    #[serde(default)]
    pub variant: SearchVariant,
}

fn default_nights() -> u32 {
    1
}

/// Configuration shared by every search
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchConfig {
    /// Pause drawn between campgrounds
    pub rate_limit: RateLimit,
}

/// A recreation.gov search: resolved campgrounds, validated equipment and
/// the machinery to poll them
pub struct RecGovSearch {
    finder: Arc<dyn CampsiteFinder>,
    aggregator: AvailabilityAggregator,
    consolidator: Arc<dyn Consolidator>,

    campgrounds: Vec<Facility>,
    campsites: Vec<i64>,
    equipment: Vec<RequestedEquipment>,
    vocabulary_mode: VocabularyMode,

    search_windows: Vec<SearchWindow>,
    weekends_only: bool,
    nights: u32,
}

impl RecGovSearch {
    /// Resolve campgrounds and validate equipment for a new search
    pub async fn new(
        finder: Arc<dyn CampsiteFinder>,
        params: SearchParameters,
        config: SearchConfig,
    ) -> Result<Self, ScanError> {
        Self::with_throttle(finder, params, config, Arc::new(TokioThrottle)).await
    }

    /// Same as [`RecGovSearch::new`], pausing between campgrounds with `throttle`
    pub async fn with_throttle(
        finder: Arc<dyn CampsiteFinder>,
        params: SearchParameters,
        config: SearchConfig,
        throttle: Arc<dyn Throttle>,
    ) -> Result<Self, ScanError> {
        if params.target.is_empty() {
            return Err(ScanError::NoSearchTarget);
        }
        if !finder.supports_variant(params.variant) {
            return Err(ScanError::Validation(format!(
                "{} searches are not supported by this provider",
                params.variant.as_str()
            )));
        }
        if params.nights < 1 {
            return Err(ScanError::ConfigError(
                "nights must be at least 1".to_string(),
            ));
        }
        if params.search_windows.is_empty() {
            return Err(ScanError::ConfigError(
                "No search days configured. Exiting".to_string(),
            ));
        }

        let campgrounds = resolve_campgrounds(finder.as_ref(), &params.target).await?;
        let vocabulary_mode = params.variant.vocabulary_mode();
        let equipment = validate_equipment(&params.equipment, vocabulary_mode);

        Ok(Self {
            aggregator: AvailabilityAggregator::new(finder.clone(), throttle, config.rate_limit),
            finder,
            consolidator: Arc::new(ConsecutiveNightConsolidator),
            campgrounds,
            campsites: params.target.campsites,
            equipment,
            vocabulary_mode,
            search_windows: params.search_windows,
            weekends_only: params.weekends_only,
            nights: params.nights,
        })
    }

    /// Replace the multi-night consolidation step
    pub fn with_consolidator(mut self, consolidator: Arc<dyn Consolidator>) -> Self {
        self.consolidator = consolidator;
        self
    }

    /// Facilities this search covers
    pub fn campgrounds(&self) -> &[Facility] {
        &self.campgrounds
    }

    /// Equipment left after validation
    pub fn equipment(&self) -> &[RequestedEquipment] {
        &self.equipment
    }

    /// Nights to search, starting from today
    pub fn search_days(&self) -> Vec<NaiveDate> {
        search_days(
            &self.search_windows,
            Utc::now().date_naive(),
            self.weekends_only,
        )
    }

    /// Perform the search and return every matching availability
    pub async fn get_all_campsites(&self) -> Result<Vec<AvailableCampsite>, ScanError> {
        self.get_all_campsites_from(Utc::now().date_naive()).await
    }

    /// Perform the search as if today were `today`
    pub async fn get_all_campsites_from(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<AvailableCampsite>, ScanError> {
        let days = search_days(&self.search_windows, today, self.weekends_only);
        if days.is_empty() {
            return Err(ScanError::ConfigError(
                "No search days configured. Exiting".to_string(),
            ));
        }
        let months = search_months(&days);

        let found = self
            .aggregator
            .aggregate(&self.campgrounds, &months, &self.campsites)
            .await?;

        let wanted: HashSet<NaiveDate> = days.into_iter().collect();
        let in_window: Vec<AvailableCampsite> = found
            .into_iter()
            .filter(|campsite| wanted.contains(&campsite.booking_date))
            .collect();

        let consolidated = self.consolidator.consolidate(in_window, self.nights);
        let filtered =
            filter_campsites_to_equipment(consolidated, &self.equipment, self.vocabulary_mode);

        info!("{} Reservable Campsites Matching Search", filtered.len());
        Ok(filtered)
    }

    /// List every bookable unit at the searched facilities
    pub async fn list_campsite_units(&self) -> Result<Vec<ListedUnit>, ScanError> {
        let facility_ids: Vec<i64> = self.campgrounds.iter().map(|f| f.facility_id).collect();
        let listings = self.finder.get_campsite_units(&facility_ids).await?;
        let units: Vec<ListedUnit> = listings.iter().flat_map(list_units).collect();
        self.log_listed_units(&units);
        Ok(units)
    }

    fn log_listed_units(&self, units: &[ListedUnit]) {
        let mut by_facility: BTreeMap<&str, Vec<&ListedUnit>> = BTreeMap::new();
        for unit in units {
            by_facility.entry(unit.facility_id.as_str()).or_default().push(unit);
        }

        for facility in &self.campgrounds {
            let facility_key = facility.facility_id.to_string();
            let Some(facility_units) = by_facility.get(facility_key.as_str()) else {
                continue;
            };
            info!(
                "⛺️ {} ({}): {} units",
                facility.facility_name,
                facility.facility_id,
                facility_units.len()
            );
            for unit in facility_units {
                info!("  - {} (#{})", unit.name, unit.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_defaults() {
        let params: SearchParameters = serde_json::from_value(serde_json::json!({
            "search_windows": [{"start_date": "2025-07-01", "end_date": "2025-07-05"}],
            "target": {"campgrounds": [232447]}
        }))
        .unwrap();

        assert_eq!(params.nights, 1);
        assert!(!params.weekends_only);
        assert!(params.equipment.is_empty());
        assert_eq!(params.variant, SearchVariant::Campsites);
        assert_eq!(params.target.campgrounds, vec![232447]);
    }

    #[test]
    fn test_parameters_with_timestamp_variant() {
        let params: SearchParameters = serde_json::from_value(serde_json::json!({
            "search_windows": [{"start_date": "2025-07-01", "end_date": "2025-07-02"}],
            "target": {"campgrounds": [10086745]},
            "equipment": [{"name": "0930"}],
            "variant": "daily_timed_entry"
        }))
        .unwrap();

        assert_eq!(params.variant.vocabulary_mode(), VocabularyMode::Timestamp);
        assert_eq!(params.equipment, vec![RequestedEquipment::new("0930", None)]);
    }
}
