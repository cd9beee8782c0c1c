//! Visit record migration planning.
//!
//! Turns a [`ReconciliationMap`] and a fleet of affected trips into the
//! full batch of record mutations an itinerary edit requires. Planning is
//! pure; applying the batch belongs to the store collaborator.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::reconcile::ReconciliationMap;
use crate::traits::{Id, PointIdOf, RecordIdOf, Trip, VisitRecord};

/// Tuning knobs for migration planning.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Trip count at which planning fans out across threads. The map is
    /// read-only once built, so trips plan independently in any order.
    pub parallel_threshold: usize,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: 64,
        }
    }
}

/// Rewrite one record's position field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionUpdate<TripId, RecordId> {
    pub trip_id: TripId,
    pub record_id: RecordId,
    /// Dense index of the record's point in the edited itinerary.
    pub position: u32,
}

/// Delete one record whose point no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDelete<TripId, RecordId> {
    pub trip_id: TripId,
    pub record_id: RecordId,
}

/// Every mutation one itinerary edit requires, across all affected trips.
///
/// A plan only ever deletes records or rewrites their position field. It
/// never creates records and never touches recorded times, so applying it
/// cannot grow any trip's record count.
#[derive(Debug, Clone)]
pub struct MigrationPlan<TripId, RecordId> {
    pub updates: Vec<PositionUpdate<TripId, RecordId>>,
    pub deletes: Vec<RecordDelete<TripId, RecordId>>,
}

impl<T, R> Default for MigrationPlan<T, R> {
    fn default() -> Self {
        Self {
            updates: Vec::new(),
            deletes: Vec::new(),
        }
    }
}

impl<T, R> MigrationPlan<T, R> {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.deletes.is_empty()
    }
}

impl<T: Id, R> MigrationPlan<T, R> {
    /// Counts for the caller's auditing.
    pub fn summary(&self) -> MigrationSummary {
        let mut touched = HashSet::new();
        for update in &self.updates {
            touched.insert(&update.trip_id);
        }
        for delete in &self.deletes {
            touched.insert(&delete.trip_id);
        }

        MigrationSummary {
            records_updated: self.updates.len(),
            records_deleted: self.deletes.len(),
            trips_touched: touched.len(),
        }
    }
}

/// What an applied migration did, for auditing and UI feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationSummary {
    /// Records whose position field was rewritten (including rewrites to
    /// the value already held; the rewrite is idempotent).
    pub records_updated: usize,
    /// Records deleted because their point left the itinerary.
    pub records_deleted: usize,
    /// Trips with at least one record in the batch.
    pub trips_touched: usize,
}

/// Plan the migration of every trip's records onto the edited itinerary.
///
/// Per record: a surviving point yields a position rewrite to its new dense
/// index (issued even when the value is unchanged), a removed point yields
/// a deletion, and a point unknown to both versions aborts the whole plan
/// with [`ReconcileError::OrphanVisitRecord`].
///
/// Records a trip never had stay absent; each record resolves through its
/// own point identity, so skipped stops need no gap bookkeeping.
///
/// Large fleets plan in parallel (see [`MigrateOptions`]); the resulting
/// plan is identical to the sequential one.
pub fn plan_migration<T>(
    trips: &[T],
    map: &ReconciliationMap<PointIdOf<T>>,
    options: &MigrateOptions,
) -> Result<MigrationPlan<T::Id, RecordIdOf<T>>, ReconcileError>
where
    T: Trip + Sync,
    T::Id: Send,
    RecordIdOf<T>: Send,
    PointIdOf<T>: Sync,
{
    let per_trip: Vec<TripPlan<T::Id, RecordIdOf<T>>> =
        if trips.len() >= options.parallel_threshold {
            trips
                .par_iter()
                .map(|trip| plan_trip(trip, map))
                .collect::<Result<_, _>>()?
        } else {
            trips
                .iter()
                .map(|trip| plan_trip(trip, map))
                .collect::<Result<_, _>>()?
        };

    let mut plan = MigrationPlan::default();
    for (mut updates, mut deletes) in per_trip {
        plan.updates.append(&mut updates);
        plan.deletes.append(&mut deletes);
    }

    Ok(plan)
}

type TripPlan<T, R> = (Vec<PositionUpdate<T, R>>, Vec<RecordDelete<T, R>>);

fn plan_trip<T: Trip>(
    trip: &T,
    map: &ReconciliationMap<PointIdOf<T>>,
) -> Result<TripPlan<T::Id, RecordIdOf<T>>, ReconcileError> {
    let mut updates = Vec::new();
    let mut deletes = Vec::new();

    for record in trip.records() {
        match map.dense_index_of(record.point_id()) {
            Some(position) => updates.push(PositionUpdate {
                trip_id: trip.id().clone(),
                record_id: record.id().clone(),
                position,
            }),
            None if map.was_removed(record.point_id()) => deletes.push(RecordDelete {
                trip_id: trip.id().clone(),
                record_id: record.id().clone(),
            }),
            None => {
                return Err(ReconcileError::orphan_record(
                    trip.id(),
                    record.id(),
                    record.point_id(),
                ));
            }
        }
    }

    Ok((updates, deletes))
}
