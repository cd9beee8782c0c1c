//! In-memory visit record store (reference implementation).
//!
//! Keeps whole trip fleets per itinerary behind one lock so a migration
//! batch commits in a single swap. Useful for tests and local development;
//! production deployments implement [`VisitRecordStore`] over their own
//! storage.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::migrate::MigrationPlan;
use crate::traits::{Id, Trip, VisitRecord, VisitRecordStore};

/// One recorded visit as held by [`MemoryStore`].
///
/// Arrival and departure are payload: reconciliation rewrites `position`
/// and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVisitRecord<R, P> {
    pub id: R,
    pub point_id: P,
    pub position: u32,
    /// Seconds since midnight.
    pub arrival: i32,
    pub departure: i32,
}

impl<R: Id, P: Id> VisitRecord for StoredVisitRecord<R, P> {
    type Id = R;
    type PointId = P;

    fn id(&self) -> &R {
        &self.id
    }

    fn point_id(&self) -> &P {
        &self.point_id
    }

    fn position(&self) -> u32 {
        self.position
    }
}

/// A trip and its records, ordered by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTrip<T, R, P> {
    pub id: T,
    pub records: Vec<StoredVisitRecord<R, P>>,
}

impl<T: Id, R: Id, P: Id> Trip for StoredTrip<T, R, P> {
    type Id = T;
    type Record = StoredVisitRecord<R, P>;

    fn id(&self) -> &T {
        &self.id
    }

    fn records(&self) -> &[Self::Record] {
        &self.records
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("trip {0} not in store")]
    UnknownTrip(String),

    #[error("record {0} not in store")]
    UnknownRecord(String),
}

/// In-memory [`VisitRecordStore`] keyed by itinerary identity.
pub struct MemoryStore<I, T, R, P> {
    fleets: RwLock<HashMap<I, Vec<StoredTrip<T, R, P>>>>,
}

impl<I: Id, T: Id, R: Id, P: Id> MemoryStore<I, T, R, P> {
    pub fn new() -> Self {
        Self {
            fleets: RwLock::new(HashMap::new()),
        }
    }

    /// Bind a trip to an itinerary template.
    pub fn insert_trip(&self, itinerary: I, trip: StoredTrip<T, R, P>) {
        self.fleets.write().entry(itinerary).or_default().push(trip);
    }

    /// Total record count across every trip in the store.
    pub fn record_count(&self) -> usize {
        self.fleets
            .read()
            .values()
            .flatten()
            .map(|trip| trip.records.len())
            .sum()
    }

    fn trip_mut<'a>(
        fleets: &'a mut HashMap<I, Vec<StoredTrip<T, R, P>>>,
        id: &T,
    ) -> Result<&'a mut StoredTrip<T, R, P>, MemoryStoreError> {
        fleets
            .values_mut()
            .flatten()
            .find(|trip| &trip.id == id)
            .ok_or_else(|| MemoryStoreError::UnknownTrip(format!("{id:?}")))
    }
}

impl<I: Id, T: Id, R: Id, P: Id> Default for MemoryStore<I, T, R, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Id, T: Id, R: Id, P: Id> VisitRecordStore for MemoryStore<I, T, R, P> {
    type ItineraryId = I;
    type Trip = StoredTrip<T, R, P>;
    type Error = MemoryStoreError;

    fn trips_for_itinerary(&self, itinerary: &I) -> Result<Vec<StoredTrip<T, R, P>>, Self::Error> {
        Ok(self
            .fleets
            .read()
            .get(itinerary)
            .cloned()
            .unwrap_or_default())
    }

    fn apply(&self, plan: &MigrationPlan<T, R>) -> Result<(), Self::Error> {
        let mut fleets = self.fleets.write();
        // Stage against a copy; a failed batch must leave nothing applied.
        let mut staged = fleets.clone();

        for delete in &plan.deletes {
            let trip = Self::trip_mut(&mut staged, &delete.trip_id)?;
            let before = trip.records.len();
            trip.records.retain(|record| record.id != delete.record_id);
            if trip.records.len() == before {
                return Err(MemoryStoreError::UnknownRecord(format!(
                    "{:?}",
                    delete.record_id
                )));
            }
        }

        for update in &plan.updates {
            let trip = Self::trip_mut(&mut staged, &update.trip_id)?;
            let record = trip
                .records
                .iter_mut()
                .find(|record| record.id == update.record_id)
                .ok_or_else(|| {
                    MemoryStoreError::UnknownRecord(format!("{:?}", update.record_id))
                })?;
            record.position = update.position;
        }

        // Trips keep their records ordered by position.
        let touched: HashSet<&T> = plan
            .updates
            .iter()
            .map(|update| &update.trip_id)
            .chain(plan.deletes.iter().map(|delete| &delete.trip_id))
            .collect();
        for trip in staged.values_mut().flatten() {
            if touched.contains(&trip.id) {
                trip.records.sort_by_key(|record| record.position);
            }
        }

        debug!(
            updated = plan.updates.len(),
            deleted = plan.deletes.len(),
            "memory store batch committed"
        );
        *fleets = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::{PositionUpdate, RecordDelete};

    type Store = MemoryStore<&'static str, &'static str, &'static str, &'static str>;

    fn record(
        id: &'static str,
        point_id: &'static str,
        position: u32,
    ) -> StoredVisitRecord<&'static str, &'static str> {
        StoredVisitRecord {
            id,
            point_id,
            position,
            arrival: 6 * 3600 + position as i32 * 120,
            departure: 6 * 3600 + position as i32 * 120,
        }
    }

    fn seeded_store() -> Store {
        let store = Store::new();
        store.insert_trip(
            "weekday",
            StoredTrip {
                id: "trip-1",
                records: vec![record("r0", "p0", 0), record("r1", "p1", 1), record("r2", "p2", 2)],
            },
        );
        store
    }

    #[test]
    fn test_apply_updates_and_deletes() {
        let store = seeded_store();
        let plan = MigrationPlan {
            updates: vec![PositionUpdate {
                trip_id: "trip-1",
                record_id: "r2",
                position: 1,
            }],
            deletes: vec![RecordDelete {
                trip_id: "trip-1",
                record_id: "r1",
            }],
        };

        store.apply(&plan).unwrap();

        let trips = store.trips_for_itinerary(&"weekday").unwrap();
        let ids: Vec<_> = trips[0].records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["r0", "r2"], "records stay ordered by position");
        assert_eq!(trips[0].records[1].position, 1);
        assert_eq!(store.record_count(), 2);
    }

    #[test]
    fn test_failed_batch_applies_nothing() {
        let store = seeded_store();
        let plan = MigrationPlan {
            updates: vec![PositionUpdate {
                trip_id: "trip-1",
                record_id: "r0",
                position: 7,
            }],
            deletes: vec![RecordDelete {
                trip_id: "trip-1",
                record_id: "no-such-record",
            }],
        };

        let err = store.apply(&plan).unwrap_err();
        assert!(matches!(err, MemoryStoreError::UnknownRecord(_)));

        let trips = store.trips_for_itinerary(&"weekday").unwrap();
        assert_eq!(
            trips[0].records[0].position, 0,
            "update staged alongside the failing delete must not stick"
        );
        assert_eq!(store.record_count(), 3);
    }

    #[test]
    fn test_payload_untouched_by_position_rewrite() {
        let store = seeded_store();
        let before = store.trips_for_itinerary(&"weekday").unwrap()[0].records[2].arrival;

        let plan = MigrationPlan {
            updates: vec![PositionUpdate {
                trip_id: "trip-1",
                record_id: "r2",
                position: 5,
            }],
            deletes: Vec::new(),
        };
        store.apply(&plan).unwrap();

        let after = store.trips_for_itinerary(&"weekday").unwrap();
        let moved = after[0].records.iter().find(|r| r.id == "r2").unwrap();
        assert_eq!(moved.arrival, before);
        assert_eq!(moved.position, 5);
    }
}
