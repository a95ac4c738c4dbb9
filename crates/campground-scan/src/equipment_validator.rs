use tracing::{info, warn};

use crate::equipment::VocabularyMode;
use crate::scan_types::RequestedEquipment;

/// Sort through a caller's equipment request and keep only entries the
/// vocabulary recognizes.
///
/// Never fails: unrecognized entries are logged and dropped. An empty result
/// means no equipment filtering will be applied.
pub fn validate_equipment(
    requested: &[RequestedEquipment],
    mode: VocabularyMode,
) -> Vec<RequestedEquipment> {
    let mut validated = Vec::with_capacity(requested.len());

    for equipment in requested {
        if mode.accepts(&equipment.name) {
            validated.push(equipment.clone());
            continue;
        }

        match mode {
            VocabularyMode::Category => warn!(
                "Equipment name not recognized: {}. This won't be used for filtering. \
                 Acceptable options are: {}",
                equipment.name,
                mode.describe_accepted()
            ),
            VocabularyMode::Timestamp => warn!(
                "Invalid Timestamp supplied, \"{}\". This won't be used for filtering",
                equipment.name
            ),
        }
    }

    if !validated.is_empty() {
        let names: Vec<&str> = validated.iter().map(|e| e.name.as_str()).collect();
        info!(
            "Filtering Campsites based on Equipment: {}",
            names.join(" | ")
        );
    }

    validated
}
