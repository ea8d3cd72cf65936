use crate::model::Observation;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Keeps, per location, the observation with the greatest date.
/// On equal dates the one seen first wins, so the result is stable for a given input order.
/// Output is ordered by location ascending.
pub fn latest_per_location(observations: Vec<Observation>) -> Vec<Observation> {
    let mut latest: BTreeMap<String, Observation> = BTreeMap::new();

    for observation in observations {
        match latest.entry(observation.location.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(observation);
            }
            Entry::Occupied(mut slot) => {
                if observation.date > slot.get().date {
                    slot.insert(observation);
                }
            }
        }
    }

    latest.into_values().collect()
}
