#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use campground_scan::{
    AvailableCampsite, CampsiteFinder, CampsiteMetadataTable, Facility, MonthlyAvailability,
    PermittedEquipment, ScanError, SearchVariant, Throttle, UnitListing,
};
use chrono::NaiveDate;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn facility(facility_id: i64, name: &str) -> Facility {
    Facility {
        facility_id,
        facility_name: name.to_string(),
        recreation_area: "Rocky Mountain National Park".to_string(),
        recreation_area_id: 2907,
    }
}

pub fn campsite(
    facility: &Facility,
    campsite_id: i64,
    booking_date: NaiveDate,
    equipment: &[(&str, Option<f64>)],
) -> AvailableCampsite {
    AvailableCampsite {
        campsite_id,
        booking_date,
        booking_end_date: booking_date.succ_opt().unwrap(),
        booking_nights: 1,
        campsite_site_name: format!("{:03}", campsite_id % 1000),
        campsite_loop_name: None,
        campsite_type: Some("STANDARD NONELECTRIC".to_string()),
        campsite_use_type: Some("Overnight".to_string()),
        campsite_occupancy: Some((1, 6)),
        availability_status: "Available".to_string(),
        recreation_area: facility.recreation_area.clone(),
        recreation_area_id: facility.recreation_area_id,
        facility_name: facility.facility_name.clone(),
        facility_id: facility.facility_id,
        booking_url: format!(
            "https://www.recreation.gov/camping/campsites/{}",
            campsite_id
        ),
        permitted_equipment: Some(
            equipment
                .iter()
                .map(|(name, length)| PermittedEquipment::new(name, *length))
                .collect(),
        ),
    }
}

/// In-memory provider recording every call it receives
#[derive(Default)]
pub struct MockFinder {
    /// campsite ID -> owning facility
    pub campsite_facilities: HashMap<i64, Facility>,
    pub facilities: HashMap<i64, Facility>,
    pub rec_areas: HashMap<i64, Vec<Facility>>,
    /// (facility ID, month) -> rows produced by conversion
    pub rows: HashMap<(i64, NaiveDate), Vec<AvailableCampsite>>,
    /// facility ID -> raw unit listing; missing facilities list nothing
    pub units: HashMap<i64, serde_json::Value>,
    /// Variants the provider refuses
    pub unsupported_variants: Vec<SearchVariant>,
    pub failing_facility: Option<i64>,

    pub lookups: Mutex<Vec<String>>,
    pub availability_calls: Mutex<Vec<(i64, NaiveDate)>>,
    pub metadata_calls: AtomicUsize,
}

impl MockFinder {
    pub fn with_facilities(facilities: &[Facility]) -> Self {
        Self {
            facilities: facilities
                .iter()
                .map(|f| (f.facility_id, f.clone()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn add_rows(&mut self, facility_id: i64, month: NaiveDate, rows: Vec<AvailableCampsite>) {
        self.rows.entry((facility_id, month)).or_default().extend(rows);
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn availability_calls(&self) -> Vec<(i64, NaiveDate)> {
        self.availability_calls.lock().unwrap().clone()
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CampsiteFinder for MockFinder {
    fn supports_variant(&self, variant: SearchVariant) -> bool {
        !self.unsupported_variants.contains(&variant)
    }

    async fn find_campgrounds(
        &self,
        campsite_ids: &[i64],
        campground_ids: &[i64],
    ) -> Result<Vec<Facility>, ScanError> {
        self.lookups.lock().unwrap().push(format!(
            "find_campgrounds campsites={:?} campgrounds={:?}",
            campsite_ids, campground_ids
        ));

        let mut found = Vec::new();
        for campsite_id in campsite_ids {
            found.push(
                self.campsite_facilities
                    .get(campsite_id)
                    .cloned()
                    .ok_or(ScanError::NotFound)?,
            );
        }
        for campground_id in campground_ids {
            found.push(
                self.facilities
                    .get(campground_id)
                    .cloned()
                    .ok_or(ScanError::NotFound)?,
            );
        }
        Ok(found)
    }

    async fn find_facilities_per_recreation_area(
        &self,
        rec_area_id: i64,
    ) -> Result<Vec<Facility>, ScanError> {
        self.lookups
            .lock()
            .unwrap()
            .push(format!("find_facilities_per_recreation_area {}", rec_area_id));
        Ok(self.rec_areas.get(&rec_area_id).cloned().unwrap_or_default())
    }

    async fn get_campsite_metadata(
        &self,
        _facility_ids: &[i64],
    ) -> Result<CampsiteMetadataTable, ScanError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CampsiteMetadataTable::new())
    }

    async fn get_monthly_availability(
        &self,
        facility_id: i64,
        month: NaiveDate,
    ) -> Result<MonthlyAvailability, ScanError> {
        self.availability_calls
            .lock()
            .unwrap()
            .push((facility_id, month));
        if self.failing_facility == Some(facility_id) {
            return Err(ScanError::ApiError("HTTP 500 Internal Server Error".to_string()));
        }
        Ok(MonthlyAvailability::default())
    }

    fn process_campsite_availability(
        &self,
        _availability: MonthlyAvailability,
        facility: &Facility,
        month: NaiveDate,
        _metadata: &CampsiteMetadataTable,
    ) -> Vec<AvailableCampsite> {
        self.rows
            .get(&(facility.facility_id, month))
            .cloned()
            .unwrap_or_default()
    }

    async fn get_campsite_units(
        &self,
        facility_ids: &[i64],
    ) -> Result<Vec<UnitListing>, ScanError> {
        facility_ids
            .iter()
            .map(|facility_id| {
                UnitListing::from_value(
                    self.units
                        .get(facility_id)
                        .cloned()
                        .unwrap_or(serde_json::json!([])),
                )
            })
            .collect()
    }
}

/// Throttle that records delays instead of sleeping
#[derive(Default)]
pub struct CountingThrottle {
    pub pauses: Mutex<Vec<Duration>>,
}

impl CountingThrottle {
    pub fn count(&self) -> usize {
        self.pauses.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Throttle for CountingThrottle {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().unwrap().push(delay);
    }
}
