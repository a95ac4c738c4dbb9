use std::collections::HashSet;

use tracing::debug;

use crate::provider::CampsiteFinder;
use crate::scan_types::{Facility, ScanError, SearchTarget};

/// Resolve a search target into the facilities to search.
///
/// Campsites take precedence over campgrounds, which take precedence over
/// recreation areas. The result is deduplicated on facility ID.
pub async fn resolve_campgrounds(
    finder: &dyn CampsiteFinder,
    target: &SearchTarget,
) -> Result<Vec<Facility>, ScanError> {
    let facilities = if !target.campsites.is_empty() {
        debug!("Resolving campgrounds from {} campsites", target.campsites.len());
        finder.find_campgrounds(&target.campsites, &[]).await?
    } else if !target.campgrounds.is_empty() {
        debug!("Resolving {} campgrounds", target.campgrounds.len());
        finder.find_campgrounds(&[], &target.campgrounds).await?
    } else if !target.recreation_areas.is_empty() {
        let mut facilities = Vec::new();
        for rec_area_id in &target.recreation_areas {
            debug!("Resolving campgrounds in recreation area {}", rec_area_id);
            facilities.extend(finder.find_facilities_per_recreation_area(*rec_area_id).await?);
        }
        facilities
    } else {
        return Err(ScanError::NoSearchTarget);
    };

    Ok(dedup_facilities(facilities))
}

fn dedup_facilities(facilities: Vec<Facility>) -> Vec<Facility> {
    let mut seen = HashSet::new();
    facilities
        .into_iter()
        .filter(|facility| seen.insert(facility.facility_id))
        .collect()
}
