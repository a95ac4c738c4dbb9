use chrono::{Datelike, Duration, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::provider::{CampsiteFinder, CampsiteMetadata, CampsiteMetadataTable};
use crate::scan_types::{
    AvailableCampsite, Facility, PermittedEquipment, ScanError, SearchVariant,
};
use crate::unit_lister::{RecGovCampsite, UnitListing};

const BOOKING_URL_BASE: &str = "https://www.recreation.gov/camping/campsites";
const RIDB_PAGE_SIZE: usize = 50;

/// Client for interacting with recreation.gov API
pub struct RecGovClient {
    client: Client,
    ridb_base_url: String,
    internal_base_url: String,
    api_key: Option<String>,
}

/// Facility search response from RIDB
#[derive(Debug, Deserialize)]
pub struct RecGovFacilityResponse {
    /// Facilities on this page
    #[serde(rename = "RECDATA")]
    pub rec_data: Vec<RecGovFacility>,

    /// Paging information
    #[serde(rename = "METADATA", default)]
    pub metadata: Option<RidbMetadata>,
}

/// Paging envelope of RIDB list responses
#[derive(Debug, Deserialize)]
pub struct RidbMetadata {
    /// Result counts
    #[serde(rename = "RESULTS")]
    pub results: RidbResultCounts,
}

/// Result counts of a RIDB list response
#[derive(Debug, Deserialize)]
pub struct RidbResultCounts {
    /// Records matching the query across all pages
    #[serde(rename = "TOTAL_COUNT")]
    pub total_count: usize,
}

/// Facility record from RIDB
#[derive(Debug, Deserialize)]
pub struct RecGovFacility {
    /// Facility ID
    #[serde(rename = "FacilityID")]
    pub facility_id: String,

    /// Facility name
    #[serde(rename = "FacilityName")]
    pub facility_name: String,

    /// Owning recreation area, when RECAREA is absent
    #[serde(rename = "ParentRecAreaID", default)]
    pub parent_rec_area_id: Option<String>,

    /// Whether the facility takes reservations
    #[serde(rename = "Reservable", default)]
    pub reservable: Option<bool>,

    /// Recreation areas the facility belongs to
    #[serde(rename = "RECAREA", default)]
    pub rec_areas: Vec<RecGovRecArea>,
}

/// Recreation area record from RIDB
#[derive(Debug, Deserialize)]
pub struct RecGovRecArea {
    /// Recreation area ID
    #[serde(rename = "RecAreaID")]
    pub rec_area_id: String,

    /// Recreation area name
    #[serde(rename = "RecAreaName")]
    pub rec_area_name: String,
}

/// Individual campsite record from RIDB, used to find its facility
#[derive(Debug, Deserialize)]
pub struct RidbCampsite {
    /// Campsite ID
    #[serde(rename = "CampsiteID")]
    pub campsite_id: String,

    /// Owning facility ID
    #[serde(rename = "FacilityID")]
    pub facility_id: String,
}

/// Response structure from recreation.gov internal availability API
#[derive(Debug, Default, Deserialize)]
pub struct MonthlyAvailability {
    /// Availability keyed by campsite ID
    pub campsites: HashMap<String, CampsiteAvailabilityData>,
}

/// Campsite availability data from internal API
#[derive(Debug, Default, Deserialize)]
pub struct CampsiteAvailabilityData {
    /// Status keyed by ISO timestamp of the night
    pub availabilities: HashMap<String, String>,
    /// Campsite ID
    pub campsite_id: Option<String>,
    /// Site type
    pub campsite_type: Option<String>,
    /// Loop the site sits in
    #[serde(rename = "loop")]
    pub campsite_loop: Option<String>,
    /// Site label
    pub site: Option<String>,
    /// Overnight or day use
    pub type_of_use: Option<String>,
    /// Minimum party size
    pub min_num_people: Option<u32>,
    /// Maximum party size
    pub max_num_people: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CampsiteSearchResponse {
    #[serde(default)]
    campsites: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenericSearchResponse {
    #[serde(default)]
    results: serde_json::Value,
}

impl RecGovClient {
    /// Create a new recreation.gov API client
    pub fn new(api_key: Option<String>) -> Result<Self, ScanError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ScanError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            ridb_base_url: "https://ridb.recreation.gov/api/v1".to_string(),
            internal_base_url: "https://www.recreation.gov/api".to_string(),
            api_key,
        })
    }

    /// GET a URL and decode its JSON body, mapping HTTP failures to scan errors
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        mut params: Vec<(&str, String)>,
        ridb: bool,
    ) -> Result<T, ScanError> {
        if ridb {
            if let Some(ref api_key) = self.api_key {
                params.push(("apikey", api_key.clone()));
            }
        }

        debug!("Making request to: {}", url);

        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ScanError::ApiError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            warn!("API request failed with status {}: {}", status, body);

            return Err(match status.as_u16() {
                429 => ScanError::RateLimited,
                401 | 403 => ScanError::AuthenticationFailed,
                404 => ScanError::NotFound,
                _ => ScanError::ApiError(format!("HTTP {} - {}", status, body)),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ScanError::ApiError(format!("Failed to parse response: {}", e)))
    }

    /// Get detailed information about a specific facility
    pub async fn get_facility_details(&self, facility_id: i64) -> Result<Facility, ScanError> {
        debug!("Getting facility details for {}", facility_id);

        let url = format!("{}/facilities/{}", self.ridb_base_url, facility_id);
        let facility: RecGovFacility = self
            .get_json(&url, vec![("full", "true".to_string())], true)
            .await?;

        to_facility(facility, None)
    }

    /// Get the name of a recreation area
    async fn get_rec_area_name(&self, rec_area_id: i64) -> Result<String, ScanError> {
        let url = format!("{}/recareas/{}", self.ridb_base_url, rec_area_id);
        let rec_area: RecGovRecArea = self.get_json(&url, Vec::new(), true).await?;
        Ok(rec_area.rec_area_name)
    }

    /// Look up the facility a campsite belongs to
    async fn get_campsite_facility_id(&self, campsite_id: i64) -> Result<i64, ScanError> {
        let url = format!("{}/campsites/{}", self.ridb_base_url, campsite_id);
        let campsites: Vec<RidbCampsite> = self.get_json(&url, Vec::new(), true).await?;

        let campsite = campsites.into_iter().next().ok_or(ScanError::NotFound)?;
        debug!(
            "Campsite {} belongs to facility {}",
            campsite.campsite_id, campsite.facility_id
        );
        parse_id(&campsite.facility_id)
    }

    /// Campsite search results for one facility, as raw JSON
    async fn search_campsites(&self, facility_id: i64) -> Result<serde_json::Value, ScanError> {
        let url = format!("{}/search/campsites", self.internal_base_url);
        let params = vec![
            ("fq", format!("asset_id:{}", facility_id)),
            ("size", "1000".to_string()),
        ];
        let response: CampsiteSearchResponse = self.get_json(&url, params, false).await?;
        Ok(match response.campsites {
            serde_json::Value::Null => serde_json::Value::Array(Vec::new()),
            campsites => campsites,
        })
    }

    /// Generic search results whose parent is the facility, as raw JSON
    async fn search_children(&self, facility_id: i64) -> Result<serde_json::Value, ScanError> {
        let url = format!("{}/search", self.internal_base_url);
        let params = vec![
            ("fq", format!("parent_asset_id:{}", facility_id)),
            ("size", "1000".to_string()),
        ];
        let response: GenericSearchResponse = self.get_json(&url, params, false).await?;
        Ok(match response.results {
            serde_json::Value::Null => serde_json::Value::Array(Vec::new()),
            results => results,
        })
    }

    /// Parse availability status from recreation.gov internal API format
    fn parse_availability_status(&self, status: &str) -> (bool, Option<f64>) {
        match status {
            "Available" => (true, None),
            "Reserved" => (false, None),
            "Not Available" => (false, None),
            "Not Reservable" => (false, None),
            "Walk-up" => (false, None),
            // Legacy RIDB format support
            "A" => (true, None),
            "R" | "X" | "W" | "N" => (false, None),
            s if s.starts_with('$') => {
                // Price string, means available
                let price = s[1..].parse::<f64>().ok();
                (true, price)
            }
            _ => {
                debug!("Unknown availability status: {}", status);
                (false, None)
            }
        }
    }
}

/// Offset of the next RIDB page, or `None` once every record has been read
fn next_page_offset(offset: usize, page_len: usize, total_count: Option<usize>) -> Option<usize> {
    let next = offset + page_len;
    match total_count {
        _ if page_len == 0 => None,
        Some(total) if next >= total => None,
        None if page_len < RIDB_PAGE_SIZE => None,
        _ => Some(next),
    }
}

fn parse_id(raw: &str) -> Result<i64, ScanError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| ScanError::DataFormat(format!("Invalid ID {:?}: {}", raw, e)))
}

fn to_facility(facility: RecGovFacility, rec_area: Option<(i64, &str)>) -> Result<Facility, ScanError> {
    let (recreation_area_id, recreation_area) = match (rec_area, facility.rec_areas.first()) {
        (Some((id, name)), _) => (id, name.to_string()),
        (None, Some(area)) => (parse_id(&area.rec_area_id)?, area.rec_area_name.clone()),
        (None, None) => match facility.parent_rec_area_id.as_deref().map(str::trim) {
            Some(parent) if !parent.is_empty() => (parse_id(parent)?, String::new()),
            _ => (0, String::new()),
        },
    };

    Ok(Facility {
        facility_id: parse_id(&facility.facility_id)?,
        facility_name: facility.facility_name,
        recreation_area,
        recreation_area_id,
    })
}

fn to_metadata(campsite: &RecGovCampsite) -> Result<CampsiteMetadata, ScanError> {
    Ok(CampsiteMetadata {
        campsite_id: parse_id(&campsite.campsite_id)?,
        site_name: Some(campsite.name.clone()),
        loop_name: campsite.campsite_loop.clone(),
        campsite_type: campsite.campsite_type.clone(),
        use_type: campsite.type_of_use.clone(),
        permitted_equipment: campsite
            .permitted_equipment
            .iter()
            .map(|item| PermittedEquipment {
                equipment_name: item.equipment_name.clone(),
                max_length: item.max_length,
            })
            .collect(),
    })
}

#[async_trait::async_trait]
impl CampsiteFinder for RecGovClient {
    // Only the campground month endpoint is wired up
    fn supports_variant(&self, variant: SearchVariant) -> bool {
        variant == SearchVariant::Campsites
    }

    async fn find_campgrounds(
        &self,
        campsite_ids: &[i64],
        campground_ids: &[i64],
    ) -> Result<Vec<Facility>, ScanError> {
        let mut facility_ids = Vec::new();
        for campsite_id in campsite_ids {
            facility_ids.push(self.get_campsite_facility_id(*campsite_id).await?);
        }
        facility_ids.extend_from_slice(campground_ids);

        let mut facilities = Vec::with_capacity(facility_ids.len());
        for facility_id in facility_ids {
            facilities.push(self.get_facility_details(facility_id).await?);
        }
        Ok(facilities)
    }

    async fn find_facilities_per_recreation_area(
        &self,
        rec_area_id: i64,
    ) -> Result<Vec<Facility>, ScanError> {
        debug!("Searching facilities in recreation area {}", rec_area_id);

        let rec_area_name = self.get_rec_area_name(rec_area_id).await?;
        let url = format!("{}/recareas/{}/facilities", self.ridb_base_url, rec_area_id);

        let mut facilities = Vec::new();
        let mut offset = 0;
        loop {
            let params = vec![
                ("full", "true".to_string()),
                ("limit", RIDB_PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ];
            let response: RecGovFacilityResponse = self.get_json(&url, params, true).await?;
            let page_len = response.rec_data.len();
            let total_count = response.metadata.map(|m| m.results.total_count);

            for facility in response.rec_data {
                if facility.reservable.unwrap_or(true) {
                    facilities.push(to_facility(
                        facility,
                        Some((rec_area_id, rec_area_name.as_str())),
                    )?);
                }
            }

            match next_page_offset(offset, page_len, total_count) {
                Some(next) => offset = next,
                None => break,
            }
        }

        debug!(
            "Found {} reservable facilities in recreation area {}",
            facilities.len(),
            rec_area_id
        );
        Ok(facilities)
    }

    async fn get_campsite_metadata(
        &self,
        facility_ids: &[i64],
    ) -> Result<CampsiteMetadataTable, ScanError> {
        let mut table = CampsiteMetadataTable::new();

        for facility_id in facility_ids {
            let campsites: Vec<RecGovCampsite> =
                serde_json::from_value(self.search_campsites(*facility_id).await?)
                    .map_err(|e| ScanError::DataFormat(e.to_string()))?;

            let mut sites = HashMap::with_capacity(campsites.len());
            for campsite in &campsites {
                let metadata = to_metadata(campsite)?;
                sites.insert(metadata.campsite_id, metadata);
            }
            table.insert(*facility_id, sites);
        }

        Ok(table)
    }

    async fn get_monthly_availability(
        &self,
        facility_id: i64,
        month: NaiveDate,
    ) -> Result<MonthlyAvailability, ScanError> {
        debug!(
            "Fetching internal availability for facility {} in {}",
            facility_id,
            month.format("%Y-%m")
        );

        let url = format!(
            "{}/camps/availability/campground/{}/month",
            self.internal_base_url, facility_id
        );

        let month_start = NaiveDate::from_ymd_opt(month.year(), month.month(), 1)
            .ok_or_else(|| ScanError::DataFormat("Invalid date".to_string()))?;
        let params = vec![(
            "start_date",
            format!("{}T00:00:00.000Z", month_start.format("%Y-%m-%d")),
        )];

        self.get_json(&url, params, false).await
    }

    fn process_campsite_availability(
        &self,
        availability: MonthlyAvailability,
        facility: &Facility,
        month: NaiveDate,
        metadata: &CampsiteMetadataTable,
    ) -> Vec<AvailableCampsite> {
        let facility_metadata = metadata.get(&facility.facility_id);
        let mut sites = Vec::new();

        for (campsite_key, data) in availability.campsites {
            let raw_id = data.campsite_id.as_deref().unwrap_or(&campsite_key);
            let campsite_id = match parse_id(raw_id) {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping campsite: {}", e);
                    continue;
                }
            };
            let campsite_metadata = facility_metadata.and_then(|sites| sites.get(&campsite_id));

            for (date_str, status) in &data.availabilities {
                // Dates arrive as "2024-01-15T00:00:00Z"
                let date = match date_str
                    .get(..10)
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                {
                    Some(date) => date,
                    None => {
                        warn!("Failed to parse date: {}", date_str);
                        continue;
                    }
                };

                if date.year() != month.year() || date.month() != month.month() {
                    continue;
                }

                let (available, _price) = self.parse_availability_status(status);
                if !available {
                    continue;
                }

                sites.push(AvailableCampsite {
                    campsite_id,
                    booking_date: date,
                    booking_end_date: date + Duration::days(1),
                    booking_nights: 1,
                    campsite_site_name: data
                        .site
                        .clone()
                        .or_else(|| campsite_metadata.and_then(|m| m.site_name.clone()))
                        .unwrap_or_else(|| campsite_id.to_string()),
                    campsite_loop_name: data
                        .campsite_loop
                        .clone()
                        .or_else(|| campsite_metadata.and_then(|m| m.loop_name.clone())),
                    campsite_type: data
                        .campsite_type
                        .clone()
                        .or_else(|| campsite_metadata.and_then(|m| m.campsite_type.clone())),
                    campsite_use_type: data
                        .type_of_use
                        .clone()
                        .or_else(|| campsite_metadata.and_then(|m| m.use_type.clone())),
                    campsite_occupancy: data.min_num_people.zip(data.max_num_people),
                    availability_status: status.clone(),
                    recreation_area: facility.recreation_area.clone(),
                    recreation_area_id: facility.recreation_area_id,
                    facility_name: facility.facility_name.clone(),
                    facility_id: facility.facility_id,
                    booking_url: format!("{}/{}", BOOKING_URL_BASE, campsite_id),
                    permitted_equipment: campsite_metadata.map(|m| m.permitted_equipment.clone()),
                });
            }
        }

        sites.sort_by_key(|site| (site.campsite_id, site.booking_date));
        sites
    }

    async fn get_campsite_units(
        &self,
        facility_ids: &[i64],
    ) -> Result<Vec<UnitListing>, ScanError> {
        let mut listings = Vec::with_capacity(facility_ids.len());

        for facility_id in facility_ids {
            let listing = match UnitListing::from_value(self.search_campsites(*facility_id).await?)? {
                listing if listing.is_empty() => {
                    debug!("No campsites at facility {}, trying generic search", facility_id);
                    UnitListing::from_value(self.search_children(*facility_id).await?)?
                }
                listing => listing,
            };

            listings.push(listing);
        }

        Ok(listings)
    }
}
