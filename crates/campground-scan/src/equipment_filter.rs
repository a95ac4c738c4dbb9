use std::collections::HashSet;

use crate::equipment::VocabularyMode;
use crate::scan_types::{AvailableCampsite, RequestedEquipment};

/// One permitted-equipment entry of a campsite, normalized for matching
#[derive(Debug)]
struct EquipmentEntry {
    campsite_id: i64,
    normalized_name: String,
    max_length: Option<f64>,
}

/// Expand every campsite into one entry per piece of permitted equipment.
///
/// A campsite without any listed equipment still yields a single nameless
/// entry, which lands in the `other` bucket in category mode.
fn expand_equipment(campsites: &[AvailableCampsite], mode: VocabularyMode) -> Vec<EquipmentEntry> {
    let mut entries = Vec::new();

    for campsite in campsites {
        match campsite.permitted_equipment.as_deref() {
            Some(equipment) if !equipment.is_empty() => {
                for item in equipment {
                    entries.push(EquipmentEntry {
                        campsite_id: campsite.campsite_id,
                        normalized_name: mode.normalize(item.equipment_name.as_deref()),
                        max_length: item.max_length,
                    });
                }
            }
            _ => entries.push(EquipmentEntry {
                campsite_id: campsite.campsite_id,
                normalized_name: mode.normalize(None),
                max_length: None,
            }),
        }
    }

    entries
}

/// Filter campsites down to the requested equipment.
///
/// An empty request accepts everything and returns `campsites` untouched.
/// Otherwise a campsite is kept when any of its permitted equipment matches
/// any requested entry (logical OR); a requested length only matches
/// equipment rated for at least that length. Order and row shape are
/// preserved.
pub fn filter_campsites_to_equipment(
    campsites: Vec<AvailableCampsite>,
    requested: &[RequestedEquipment],
    mode: VocabularyMode,
) -> Vec<AvailableCampsite> {
    if requested.is_empty() || campsites.is_empty() {
        return campsites;
    }

    let entries = expand_equipment(&campsites, mode);
    let mut matching_ids: HashSet<i64> = HashSet::new();

    for equipment in requested {
        let requested_name = equipment.name.to_lowercase();
        let matches = entries
            .iter()
            .filter(|entry| entry.normalized_name == requested_name)
            .filter(|entry| match equipment.max_length {
                Some(min_length) => entry
                    .max_length
                    .is_some_and(|max_length| max_length >= min_length),
                None => true,
            })
            .map(|entry| entry.campsite_id);
        matching_ids.extend(matches);
    }

    campsites
        .into_iter()
        .filter(|campsite| matching_ids.contains(&campsite.campsite_id))
        .collect()
}
