//! Core domain traits for itinerary reconciliation.
//!
//! These are intentionally minimal and domain-agnostic. Concrete apps should
//! implement them for their own data models.

use std::fmt::Debug;
use std::hash::Hash;

use crate::migrate::MigrationPlan;

/// Unique identifier for reconciliation entities.
///
/// Equality and hashing define identity; payload fields never do.
pub trait Id: Clone + Eq + Hash + Debug {}

impl<T> Id for T where T: Clone + Eq + Hash + Debug {}

/// One stop entry within an itinerary template.
pub trait ItineraryPoint {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// User-editable ordering number.
    ///
    /// Raw values need not be contiguous or unique; the canonical traversal
    /// order is ascending position, ties broken by list order.
    fn position(&self) -> i32;
}

/// A trip's recorded visit (times) at one itinerary point.
pub trait VisitRecord {
    type Id: Id;
    type PointId: Id;

    fn id(&self) -> &Self::Id;

    /// Identity of the itinerary point this record was taken at.
    fn point_id(&self) -> &Self::PointId;

    /// Current dense position within the trip's itinerary.
    fn position(&self) -> u32;
}

/// A scheduled trip owning an ordered set of visit records.
///
/// A trip need not carry a record for every itinerary point; a missing
/// record is a skipped stop, not an error.
pub trait Trip {
    type Id: Id;
    type Record: VisitRecord;

    fn id(&self) -> &Self::Id;

    fn records(&self) -> &[Self::Record];
}

/// Record id type of a trip's records.
pub type RecordIdOf<T> = <<T as Trip>::Record as VisitRecord>::Id;

/// Point id type referenced by a trip's records.
pub type PointIdOf<T> = <<T as Trip>::Record as VisitRecord>::PointId;

/// External storage for trips and their visit records.
///
/// Implementations must apply a whole [`MigrationPlan`] as one atomic unit:
/// a concurrent reader observes either none or all of its mutations, and a
/// failed batch leaves nothing applied.
pub trait VisitRecordStore {
    type ItineraryId: Id;
    type Trip: Trip;
    type Error: std::error::Error;

    /// All trips bound to the given itinerary template, with their records.
    fn trips_for_itinerary(
        &self,
        itinerary: &Self::ItineraryId,
    ) -> Result<Vec<Self::Trip>, Self::Error>;

    /// Apply every deletion and position rewrite in `plan` atomically.
    fn apply(
        &self,
        plan: &MigrationPlan<<Self::Trip as Trip>::Id, RecordIdOf<Self::Trip>>,
    ) -> Result<(), Self::Error>;
}
