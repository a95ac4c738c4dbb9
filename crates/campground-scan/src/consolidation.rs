use std::collections::BTreeMap;

use chrono::Duration;

use crate::scan_types::AvailableCampsite;

/// Merges single-night availability into bookable multi-night windows
pub trait Consolidator: Send + Sync {
    /// Turn nightly rows into bookings of `nights` consecutive nights
    fn consolidate(&self, campsites: Vec<AvailableCampsite>, nights: u32) -> Vec<AvailableCampsite>;
}

/// Emits every window of exactly `nights` consecutive available nights per
/// campsite. Single-night searches pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsecutiveNightConsolidator;

impl Consolidator for ConsecutiveNightConsolidator {
    fn consolidate(&self, campsites: Vec<AvailableCampsite>, nights: u32) -> Vec<AvailableCampsite> {
        if nights <= 1 {
            return campsites;
        }

        let mut by_campsite: BTreeMap<i64, Vec<AvailableCampsite>> = BTreeMap::new();
        for campsite in campsites {
            by_campsite
                .entry(campsite.campsite_id)
                .or_default()
                .push(campsite);
        }

        let window = nights as usize;
        let mut consolidated = Vec::new();

        for (_, mut rows) in by_campsite {
            rows.sort_by_key(|row| row.booking_date);
            rows.dedup_by_key(|row| row.booking_date);

            for run in consecutive_runs(&rows) {
                for start in run.windows(window) {
                    let mut merged = start[0].clone();
                    merged.booking_end_date = merged.booking_date + Duration::days(nights as i64);
                    merged.booking_nights = nights;
                    consolidated.push(merged);
                }
            }
        }

        consolidated
    }
}

/// Split date-sorted rows into runs of back-to-back nights
fn consecutive_runs(rows: &[AvailableCampsite]) -> Vec<&[AvailableCampsite]> {
    let mut runs = Vec::new();
    let mut run_start = 0;

    for index in 1..=rows.len() {
        let breaks = index == rows.len()
            || rows[index].booking_date != rows[index - 1].booking_date + Duration::days(1);
        if breaks {
            runs.push(&rows[run_start..index]);
            run_start = index;
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn night(campsite_id: i64, day: u32) -> AvailableCampsite {
        let booking_date = NaiveDate::from_ymd_opt(2025, 8, day).unwrap();
        AvailableCampsite {
            campsite_id,
            booking_date,
            booking_end_date: booking_date + Duration::days(1),
            booking_nights: 1,
            campsite_site_name: "012".to_string(),
            campsite_loop_name: None,
            campsite_type: None,
            campsite_use_type: None,
            campsite_occupancy: None,
            availability_status: "Available".to_string(),
            recreation_area: "Olympic National Park".to_string(),
            recreation_area_id: 2881,
            facility_name: "Kalaloch".to_string(),
            facility_id: 232464,
            booking_url: String::new(),
            permitted_equipment: None,
        }
    }

    #[test]
    fn test_single_night_passes_through() {
        let rows = vec![night(1, 3), night(1, 1)];
        let consolidated = ConsecutiveNightConsolidator.consolidate(rows.clone(), 1);
        assert_eq!(consolidated, rows);
    }

    #[test]
    fn test_sliding_windows_within_a_run() {
        let rows = vec![night(1, 3), night(1, 1), night(1, 2)];
        let consolidated = ConsecutiveNightConsolidator.consolidate(rows, 2);

        let starts: Vec<u32> = consolidated
            .iter()
            .map(|row| chrono::Datelike::day(&row.booking_date))
            .collect();
        assert_eq!(starts, vec![1, 2]);
        assert!(consolidated.iter().all(|row| row.booking_nights == 2));
        assert_eq!(
            consolidated[0].booking_end_date,
            NaiveDate::from_ymd_opt(2025, 8, 3).unwrap()
        );
    }

    #[test]
    fn test_gaps_break_runs() {
        let rows = vec![night(1, 1), night(1, 2), night(1, 4), night(2, 4)];
        let consolidated = ConsecutiveNightConsolidator.consolidate(rows, 2);
        assert_eq!(consolidated.len(), 1);
        assert_eq!(consolidated[0].campsite_id, 1);
    }

    #[test]
    fn test_runs_shorter_than_nights_are_dropped() {
        let rows = vec![night(5, 10), night(5, 11)];
        assert!(ConsecutiveNightConsolidator.consolidate(rows, 3).is_empty());
    }
}
