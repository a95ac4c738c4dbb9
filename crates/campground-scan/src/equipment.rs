use std::collections::{HashMap, HashSet};
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Canonical bucket that provider equipment descriptions normalize into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentCategory {
    /// Tents of any size
    Tent,
    /// Motorhomes, campers and fifth wheels
    Rv,
    /// Towed trailers
    Trailer,
    /// Cars and pickup campers
    Vehicle,
    /// Internal bucket only, never an accepted request value
    Other,
}

impl EquipmentCategory {
    /// Categories a caller may request
    pub const ACCEPTED: [EquipmentCategory; 4] = [
        EquipmentCategory::Tent,
        EquipmentCategory::Rv,
        EquipmentCategory::Trailer,
        EquipmentCategory::Vehicle,
    ];

    /// Lowercase request name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentCategory::Tent => "tent",
            EquipmentCategory::Rv => "rv",
            EquipmentCategory::Trailer => "trailer",
            EquipmentCategory::Vehicle => "vehicle",
            EquipmentCategory::Other => "other",
        }
    }

    /// Case-insensitive lookup among the accepted categories
    pub fn from_request_name(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase();
        Self::ACCEPTED
            .into_iter()
            .find(|category| category.as_str() == lowered)
    }
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw recreation.gov equipment descriptions accepted for each category
pub const EQUIPMENT_MAPPING: [(EquipmentCategory, &[&str]); 5] = [
    (
        EquipmentCategory::Tent,
        &[
            "Tent",
            "Large Tent Over 9X12",
            "Large Tent Over 9X12`",
            "Small Tent",
        ],
    ),
    (
        EquipmentCategory::Rv,
        &[
            "RV",
            "Pop up",
            "Caravan/Camper Van",
            "RV/Motorhome",
            "Fifth Wheel",
        ],
    ),
    (EquipmentCategory::Trailer, &["Trailer"]),
    (
        EquipmentCategory::Vehicle,
        &["Pickup Camper", "Vehicle", "Car"],
    ),
    // The empty string is what a missing equipment name normalizes through
    (EquipmentCategory::Other, &["Hammock", "Horse", "Boat", ""]),
];

lazy_static! {
    /// Raw equipment description -> canonical category
    pub static ref EQUIPMENT_REVERSE_MAPPING: HashMap<&'static str, EquipmentCategory> = {
        let mut reverse = HashMap::new();
        for (category, raw_names) in EQUIPMENT_MAPPING.iter() {
            for raw_name in raw_names.iter() {
                reverse.insert(*raw_name, *category);
            }
        }
        reverse
    };

    /// Every valid HHMM time slot, 0000 through 2359
    pub static ref TIMESTAMP_EQUIPMENT: HashSet<String> = {
        let mut timestamps = HashSet::with_capacity(24 * 60);
        for hour in 0..24 {
            for minute in 0..60 {
                timestamps.insert(format!("{:02}{:02}", hour, minute));
            }
        }
        timestamps
    };
}

/// Which vocabulary equipment names are checked against and normalized through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyMode {
    /// tent, rv, trailer, vehicle
    #[default]
    Category,
    /// 4-digit HHMM time-of-day slots
    Timestamp,
}

impl VocabularyMode {
    /// Whether a caller-supplied equipment name is valid in this vocabulary
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            VocabularyMode::Category => EquipmentCategory::from_request_name(name).is_some(),
            VocabularyMode::Timestamp => TIMESTAMP_EQUIPMENT.contains(name),
        }
    }

    /// Map a raw provider equipment name to the key requests are compared to.
    ///
    /// In category mode a missing name is treated as the empty string and
    /// lands in `other`; unknown names normalize to the empty string, which no
    /// request can match. Timestamps are already canonical.
    pub fn normalize(&self, raw_name: Option<&str>) -> String {
        let raw_name = raw_name.unwrap_or("");
        match self {
            VocabularyMode::Category => EQUIPMENT_REVERSE_MAPPING
                .get(raw_name)
                .map(|category| category.as_str().to_string())
                .unwrap_or_default(),
            VocabularyMode::Timestamp => raw_name.to_string(),
        }
    }

    /// Human readable list of acceptable request values, used in warnings
    pub fn describe_accepted(&self) -> String {
        match self {
            VocabularyMode::Category => EquipmentCategory::ACCEPTED
                .iter()
                .map(|category| category.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            VocabularyMode::Timestamp => "HHMM timestamps from 0000 to 2359".to_string(),
        }
    }
}
