//! Dense index assignment for itinerary points.

use std::collections::HashMap;

use crate::error::ReconcileError;
use crate::traits::ItineraryPoint;

/// Assign each point a dense zero-based index.
///
/// Points are ordered by ascending raw `position`, ties keeping their
/// original list order, and numbered 0..N in that order. Raw position
/// values may be non-contiguous or duplicated; the output indices never
/// are.
///
/// Fails if two points share one identity.
pub fn dense_indices<P: ItineraryPoint>(
    points: &[P],
) -> Result<HashMap<P::Id, u32>, ReconcileError> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    // Stable sort, so equal positions fall back to list order.
    order.sort_by_key(|&i| points[i].position());

    let mut indices = HashMap::with_capacity(points.len());
    for (dense, &original) in order.iter().enumerate() {
        let point = &points[original];
        if indices.insert(point.id().clone(), dense as u32).is_some() {
            return Err(ReconcileError::duplicate_identity(point.id()));
        }
    }

    Ok(indices)
}
