//! # Campground Scan
//!
//! This crate resolves a search target (recreation areas, campgrounds or
//! individual campsites) into recreation.gov facilities, polls their monthly
//! availability and reduces the result to the campsites that fit the
//! requested equipment.

/// Types for campground scan operations
mod scan_types;
pub use scan_types::*;

/// Equipment categories, raw provider names and timestamp slots
pub mod equipment;
pub use equipment::{EquipmentCategory, VocabularyMode};

/// Validation of caller-supplied equipment requests
mod equipment_validator;
pub use equipment_validator::*;

/// Filtering of campsites down to requested equipment
mod equipment_filter;
pub use equipment_filter::*;

/// Search windows and the months they span
mod search_window;
pub use search_window::*;

/// Multi-night consolidation of single-night availability
mod consolidation;
pub use consolidation::*;

/// Capabilities required from the booking provider
mod provider;
pub use provider::*;

/// Resolution of search targets into facilities
mod resolver;
pub use resolver::*;

/// The campground × month polling loop
mod aggregator;
pub use aggregator::*;

/// Normalization of unit listings
mod unit_lister;
pub use unit_lister::*;

/// Client for the recreation.gov APIs
mod rec_gov_client;
pub use rec_gov_client::*;

/// The search orchestrator
mod search;
pub use search::*;
