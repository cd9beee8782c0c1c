//! Identity reconciliation between two itinerary versions.

use std::collections::{HashMap, HashSet};

use crate::error::ReconcileError;
use crate::sequence::dense_indices;
use crate::traits::{Id, ItineraryPoint};

/// Where every old point ended up after an itinerary edit.
///
/// Survivors map to their dense index in the edited version; identities the
/// edit dropped land in the removed set. The two are disjoint and together
/// cover exactly the old version's identities, which lets migration tell
/// "point removed by this edit" apart from "point unknown to either
/// version" (corruption).
///
/// Newly inserted points have no prior records to migrate and are not
/// tracked here. Moving a point changes only its dense index, never its
/// identity, so record-to-point association survives moves untouched.
#[derive(Debug, Clone)]
pub struct ReconciliationMap<P: Id> {
    survivors: HashMap<P, u32>,
    removed: HashSet<P>,
}

impl<P: Id> ReconciliationMap<P> {
    /// Compare the old itinerary's points against the edited version's.
    ///
    /// The two slices may be different concrete types (say, a persisted row
    /// and an editor payload) as long as they share one identity type.
    /// Both sides are validated for duplicate identities.
    pub fn build<A, B>(old: &[A], new: &[B]) -> Result<Self, ReconcileError>
    where
        A: ItineraryPoint<Id = P>,
        B: ItineraryPoint<Id = P>,
    {
        let new_indices = dense_indices(new)?;
        // The old side's dense indices are not needed, but running the same
        // assignment validates it for duplicate identities.
        let old_indices = dense_indices(old)?;

        let mut survivors = HashMap::new();
        let mut removed = HashSet::new();
        for id in old_indices.into_keys() {
            match new_indices.get(&id) {
                Some(&dense) => {
                    survivors.insert(id, dense);
                }
                None => {
                    removed.insert(id);
                }
            }
        }

        Ok(Self { survivors, removed })
    }

    /// Dense index of a surviving point in the edited itinerary.
    pub fn dense_index_of(&self, id: &P) -> Option<u32> {
        self.survivors.get(id).copied()
    }

    /// Whether the edit dropped this point.
    pub fn was_removed(&self, id: &P) -> bool {
        self.removed.contains(id)
    }

    pub fn survivor_count(&self) -> usize {
        self.survivors.len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}
