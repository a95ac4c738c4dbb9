use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rand::Rng;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::provider::{CampsiteFinder, CampsiteMetadataTable};
use crate::scan_types::{AvailableCampsite, Facility, ScanError};

/// Longest pause allowed between campgrounds, in seconds
pub const MAX_PAUSE_SECS: f64 = 3600.0;

/// Interval, in seconds, from which the pause between campgrounds is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimit {
    /// Shortest pause
    pub min_secs: f64,
    /// Longest pause
    pub max_secs: f64,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            min_secs: 1.01,
            max_secs: 1.51,
        }
    }
}

impl RateLimit {
    /// Build an interval, rejecting negative, inverted, non-finite or
    /// overlong bounds
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self, ScanError> {
        let in_bounds = |secs: f64| secs.is_finite() && (0.0..=MAX_PAUSE_SECS).contains(&secs);
        if !(in_bounds(min_secs) && in_bounds(max_secs) && min_secs <= max_secs) {
            return Err(ScanError::ConfigError(format!(
                "Invalid rate limit interval [{}, {}], bounds must lie within [0, {}]",
                min_secs, max_secs, MAX_PAUSE_SECS
            )));
        }
        Ok(Self { min_secs, max_secs })
    }

    /// Uniformly drawn delay, rounded to hundredths of a second
    pub fn next_delay(&self) -> Duration {
        // Struct literals bypass `new`
        let max_secs = clamp_secs(self.max_secs);
        let min_secs = clamp_secs(self.min_secs).min(max_secs);

        let secs = if max_secs > min_secs {
            rand::rng().random_range(min_secs..=max_secs)
        } else {
            min_secs
        };
        let rounded = (secs * 100.0).round() / 100.0;
        Duration::from_secs_f64(clamp_secs(rounded))
    }
}

fn clamp_secs(secs: f64) -> f64 {
    if secs.is_nan() {
        0.0
    } else {
        secs.clamp(0.0, MAX_PAUSE_SECS)
    }
}

/// Suspends the search between campgrounds
#[async_trait::async_trait]
pub trait Throttle: Send + Sync {
    /// Wait for `delay`
    async fn pause(&self, delay: Duration);
}

/// Throttle backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioThrottle;

#[async_trait::async_trait]
impl Throttle for TokioThrottle {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Drives the campground × month polling loop
pub struct AvailabilityAggregator {
    finder: Arc<dyn CampsiteFinder>,
    throttle: Arc<dyn Throttle>,
    rate_limit: RateLimit,

    /// Fetched on the first aggregation, never refreshed afterwards
    campsite_metadata: OnceCell<CampsiteMetadataTable>,
}

impl AvailabilityAggregator {
    /// Create an aggregator with an empty metadata cache
    pub fn new(
        finder: Arc<dyn CampsiteFinder>,
        throttle: Arc<dyn Throttle>,
        rate_limit: RateLimit,
    ) -> Self {
        Self {
            finder,
            throttle,
            rate_limit,
            campsite_metadata: OnceCell::new(),
        }
    }

    /// Fetch every month of every facility, in order, pausing between
    /// facilities. When `campsite_allowlist` is non-empty only those
    /// campsites are kept.
    pub async fn aggregate(
        &self,
        facilities: &[Facility],
        months: &[NaiveDate],
        campsite_allowlist: &[i64],
    ) -> Result<Vec<AvailableCampsite>, ScanError> {
        if facilities.is_empty() {
            error!("{}", ScanError::NoCampgrounds);
            return Err(ScanError::NoCampgrounds);
        }
        info!("Searching across {} campgrounds", facilities.len());

        let metadata = self.load_campsite_metadata(facilities).await?;
        let mut found_campsites = Vec::new();

        for (index, facility) in facilities.iter().enumerate() {
            for month in months {
                info!(
                    "Searching {}, {} ({}) for availability: {}",
                    facility.facility_name,
                    facility.recreation_area,
                    facility.facility_id,
                    month.format("%B, %Y")
                );

                let availability = self
                    .finder
                    .get_monthly_availability(facility.facility_id, *month)
                    .await?;
                let mut campsites = self.finder.process_campsite_availability(
                    availability,
                    facility,
                    *month,
                    metadata,
                );

                info!(
                    "\t{}\t{} total sites found in month of {}",
                    if campsites.is_empty() { "❌" } else { "🏕" },
                    campsites.len(),
                    month.format("%B")
                );

                if !campsite_allowlist.is_empty() {
                    campsites.retain(|campsite| campsite_allowlist.contains(&campsite.campsite_id));
                }
                found_campsites.extend(campsites);
            }

            if index + 1 < facilities.len() {
                let delay = self.rate_limit.next_delay();
                debug!("Rate limiting for {:?} before the next campground", delay);
                self.throttle.pause(delay).await;
            }
        }

        Ok(found_campsites)
    }

    async fn load_campsite_metadata(
        &self,
        facilities: &[Facility],
    ) -> Result<&CampsiteMetadataTable, ScanError> {
        self.campsite_metadata
            .get_or_try_init(|| async move {
                let facility_ids: Vec<i64> = facilities.iter().map(|f| f.facility_id).collect();
                let metadata = self.finder.get_campsite_metadata(&facility_ids).await?;
                info!(
                    "Metadata fetched for {} campsites",
                    metadata.values().map(|sites| sites.len()).sum::<usize>()
                );
                Ok::<_, ScanError>(metadata)
            })
            .await
    }
}
