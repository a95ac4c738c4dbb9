use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Range of nights to search, `end_date` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    /// First night
    pub start_date: NaiveDate,
    /// Checkout date, not searched
    pub end_date: NaiveDate,
}

impl SearchWindow {
    /// Window from `start_date` up to, but excluding, `end_date`
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Every night in the window
    pub fn nights(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |date| *date < self.end_date)
    }
}

/// Collect the nights to search across all windows.
///
/// Nights before `today` are dropped. With `weekends_only`, only Friday and
/// Saturday nights are kept.
pub fn search_days(windows: &[SearchWindow], today: NaiveDate, weekends_only: bool) -> Vec<NaiveDate> {
    let days: BTreeSet<NaiveDate> = windows
        .iter()
        .flat_map(|window| window.nights())
        .filter(|date| *date >= today)
        .filter(|date| !weekends_only || matches!(date.weekday(), Weekday::Fri | Weekday::Sat))
        .collect();

    days.into_iter().collect()
}

/// First day of every month that contains a search day, in order
pub fn search_months(days: &[NaiveDate]) -> Vec<NaiveDate> {
    let months: BTreeSet<NaiveDate> = days
        .iter()
        .filter_map(|date| date.with_day(1))
        .collect();

    months.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_window_end_is_exclusive() {
        let window = SearchWindow::new(date(2025, 6, 1), date(2025, 6, 4));
        let nights: Vec<_> = window.nights().collect();
        assert_eq!(nights, vec![date(2025, 6, 1), date(2025, 6, 2), date(2025, 6, 3)]);
    }

    #[test]
    fn test_overlapping_windows_are_merged() {
        let windows = vec![
            SearchWindow::new(date(2025, 6, 3), date(2025, 6, 5)),
            SearchWindow::new(date(2025, 6, 1), date(2025, 6, 4)),
        ];
        let days = search_days(&windows, date(2025, 1, 1), false);
        assert_eq!(
            days,
            vec![date(2025, 6, 1), date(2025, 6, 2), date(2025, 6, 3), date(2025, 6, 4)]
        );
    }

    #[test]
    fn test_past_days_are_dropped() {
        let windows = vec![SearchWindow::new(date(2025, 6, 1), date(2025, 6, 5))];
        let days = search_days(&windows, date(2025, 6, 3), false);
        assert_eq!(days, vec![date(2025, 6, 3), date(2025, 6, 4)]);
    }

    #[test]
    fn test_weekends_only() {
        // 2025-06-06 is a Friday
        let windows = vec![SearchWindow::new(date(2025, 6, 2), date(2025, 6, 10))];
        let days = search_days(&windows, date(2025, 1, 1), true);
        assert_eq!(days, vec![date(2025, 6, 6), date(2025, 6, 7)]);
    }

    #[test]
    fn test_months_are_chronological_and_unique() {
        let windows = vec![
            SearchWindow::new(date(2025, 9, 28), date(2025, 10, 2)),
            SearchWindow::new(date(2025, 6, 30), date(2025, 7, 2)),
        ];
        let days = search_days(&windows, date(2025, 1, 1), false);
        assert_eq!(
            search_months(&days),
            vec![date(2025, 6, 1), date(2025, 7, 1), date(2025, 9, 1), date(2025, 10, 1)]
        );
    }
}
