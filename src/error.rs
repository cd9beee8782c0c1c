//! Error types for reconciliation.

use std::fmt::Debug;

use thiserror::Error;

/// Failures in the pure reconciliation pipeline.
///
/// Both kinds are terminal for the current run and surface before any
/// mutation reaches the store; the caller may retry the whole pipeline
/// against a fresh snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// An itinerary version holds two points sharing one identity.
    #[error("duplicate itinerary point identity {identity}")]
    DuplicateIdentity { identity: String },

    /// A visit record references a point unknown to both the old and the
    /// new itinerary. The record predates the old version entirely, which
    /// signals corruption upstream; the whole batch is abandoned rather
    /// than the record silently deleted.
    #[error("visit record {record} on trip {trip} references point {point} absent from both itineraries")]
    OrphanVisitRecord {
        trip: String,
        record: String,
        point: String,
    },
}

impl ReconcileError {
    pub(crate) fn duplicate_identity(identity: &impl Debug) -> Self {
        Self::DuplicateIdentity {
            identity: format!("{identity:?}"),
        }
    }

    pub(crate) fn orphan_record(
        trip: &impl Debug,
        record: &impl Debug,
        point: &impl Debug,
    ) -> Self {
        Self::OrphanVisitRecord {
            trip: format!("{trip:?}"),
            record: format!("{record:?}"),
            point: format!("{point:?}"),
        }
    }
}

/// Failures of a full engine run: either the pure pipeline rejected the
/// input, or the store collaborator failed. Store failures propagate as-is;
/// the store's transactional boundary guarantees no partial mutation is
/// left visible.
#[derive(Debug, Error)]
pub enum EngineError<E: std::error::Error> {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("visit record store failed: {0}")]
    Store(#[source] E),
}
