use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rec_gov_client::MonthlyAvailability;
use crate::scan_types::{
    AvailableCampsite, Facility, PermittedEquipment, ScanError, SearchVariant,
};
use crate::unit_lister::UnitListing;

/// Static attributes of a campsite that the monthly availability payload lacks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampsiteMetadata {
    /// Campsite ID
    pub campsite_id: i64,
    /// Site label
    pub site_name: Option<String>,
    /// Loop the site sits in
    pub loop_name: Option<String>,
    /// Site type
    pub campsite_type: Option<String>,
    /// Overnight or day use
    pub use_type: Option<String>,
    /// Equipment the site accepts
    pub permitted_equipment: Vec<PermittedEquipment>,
}

/// Campsite metadata keyed by facility ID, then campsite ID
pub type CampsiteMetadataTable = HashMap<i64, HashMap<i64, CampsiteMetadata>>;

/// Everything the search needs from the booking provider
#[async_trait::async_trait]
pub trait CampsiteFinder: Send + Sync {
    /// Whether this provider can fetch availability for the booking product
    fn supports_variant(&self, variant: SearchVariant) -> bool;

    /// Look up the facilities owning the given campsites, or the given
    /// facilities directly when no campsites are passed
    async fn find_campgrounds(
        &self,
        campsite_ids: &[i64],
        campground_ids: &[i64],
    ) -> Result<Vec<Facility>, ScanError>;

    /// All facilities within a recreation area
    async fn find_facilities_per_recreation_area(
        &self,
        rec_area_id: i64,
    ) -> Result<Vec<Facility>, ScanError>;

    /// Static campsite attributes for every given facility
    async fn get_campsite_metadata(
        &self,
        facility_ids: &[i64],
    ) -> Result<CampsiteMetadataTable, ScanError>;

    /// Raw availability of one facility for the month starting at `month`
    async fn get_monthly_availability(
        &self,
        facility_id: i64,
        month: NaiveDate,
    ) -> Result<MonthlyAvailability, ScanError>;

    /// Turn a raw monthly payload into one row per available night
    fn process_campsite_availability(
        &self,
        availability: MonthlyAvailability,
        facility: &Facility,
        month: NaiveDate,
        metadata: &CampsiteMetadataTable,
    ) -> Vec<AvailableCampsite>;

    /// Every bookable unit at the given facilities, one listing per facility
    async fn get_campsite_units(
        &self,
        facility_ids: &[i64],
    ) -> Result<Vec<UnitListing>, ScanError>;
}
