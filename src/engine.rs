//! Reconciliation entry point over a visit record store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::EngineError;
use crate::migrate::{plan_migration, MigrateOptions, MigrationSummary};
use crate::reconcile::ReconciliationMap;
use crate::traits::{ItineraryPoint, PointIdOf, RecordIdOf, Trip, VisitRecordStore};

/// Orchestrates one itinerary edit end to end: build the identity map, plan
/// every affected trip's migration, then hand the whole batch to the store
/// in one atomic apply.
///
/// Edits to the same itinerary are serialized through a per-itinerary lock,
/// since each run plans from a snapshot of the old and new point lists.
/// Edits to different itineraries proceed independently.
pub struct ReconciliationEngine<S: VisitRecordStore> {
    store: S,
    options: MigrateOptions,
    locks: Mutex<HashMap<S::ItineraryId, Arc<Mutex<()>>>>,
}

impl<S: VisitRecordStore> ReconciliationEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, MigrateOptions::default())
    }

    pub fn with_options(store: S, options: MigrateOptions) -> Self {
        Self {
            store,
            options,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn lock_slot(&self, itinerary: &S::ItineraryId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks.entry(itinerary.clone()).or_default().clone()
    }

    /// Migrate every trip bound to `itinerary` from the `old` point list to
    /// the edited `new` one.
    ///
    /// Deterministic over its inputs and free of partial effect: any
    /// failure surfaces either before the store sees a single mutation or
    /// from the store's own all-or-nothing apply. Nothing is retried here;
    /// retrying against a fresh snapshot is the caller's decision.
    pub fn run<P>(
        &self,
        itinerary: &S::ItineraryId,
        old: &[P],
        new: &[P],
    ) -> Result<MigrationSummary, EngineError<S::Error>>
    where
        P: ItineraryPoint<Id = PointIdOf<S::Trip>>,
        S::Trip: Sync,
        <S::Trip as Trip>::Id: Send,
        RecordIdOf<S::Trip>: Send,
        PointIdOf<S::Trip>: Sync,
    {
        let slot = self.lock_slot(itinerary);
        let _held = slot.lock();

        let trips = self
            .store
            .trips_for_itinerary(itinerary)
            .map_err(EngineError::Store)?;

        self.run_with_trips(old, new, &trips)
    }

    /// Same pipeline for a caller-supplied trip snapshot.
    ///
    /// Does not take the per-itinerary lock; callers enumerating trips
    /// themselves own the serialization of overlapping edits.
    pub fn run_with_trips<P>(
        &self,
        old: &[P],
        new: &[P],
        trips: &[S::Trip],
    ) -> Result<MigrationSummary, EngineError<S::Error>>
    where
        P: ItineraryPoint<Id = PointIdOf<S::Trip>>,
        S::Trip: Sync,
        <S::Trip as Trip>::Id: Send,
        RecordIdOf<S::Trip>: Send,
        PointIdOf<S::Trip>: Sync,
    {
        let map = ReconciliationMap::build(old, new)?;
        debug!(
            survivors = map.survivor_count(),
            removed = map.removed_count(),
            trips = trips.len(),
            "reconciling itinerary edit"
        );

        let plan = plan_migration(trips, &map, &self.options)?;
        let summary = plan.summary();

        if plan.is_empty() {
            trace!("no record mutations needed");
            return Ok(summary);
        }

        self.store.apply(&plan).map_err(EngineError::Store)?;
        debug!(
            updated = summary.records_updated,
            deleted = summary.records_deleted,
            trips = summary.trips_touched,
            "migration applied"
        );

        Ok(summary)
    }
}
