//! Stop locations along North Avenue, Chicago, for realistic fixtures.
//!
//! Proceeding east along W North Ave through Humboldt Park toward Wicker
//! Park, one cross street per stop. Locations are payload only; nothing in
//! reconciliation reads them.

/// A named stop location with coordinates.
#[derive(Debug, Clone)]
pub struct StopLocation {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl StopLocation {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

pub const NORTH_AVENUE_STOPS: &[StopLocation] = &[
    StopLocation::new("North & Springfield", 41.9100, -87.7130),
    StopLocation::new("North & Avers", 41.9100, -87.7120),
    StopLocation::new("North & Hamlin", 41.9100, -87.7110),
    StopLocation::new("North & Ridgeway", 41.9100, -87.7100),
    StopLocation::new("North & Lawndale", 41.9100, -87.7090),
    StopLocation::new("North & Monticello", 41.9100, -87.7080),
    StopLocation::new("North & Central Park", 41.9100, -87.7070),
    StopLocation::new("North & Drake", 41.9100, -87.7060),
    StopLocation::new("North & St Louis", 41.9100, -87.7050),
    StopLocation::new("North & Kimball", 41.9100, -87.7040),
    StopLocation::new("North & Spaulding", 41.9100, -87.7030),
    StopLocation::new("North & Sawyer", 41.9100, -87.7020),
    StopLocation::new("North & Kedzie", 41.9100, -87.7010),
    StopLocation::new("North & Albany", 41.9100, -87.7000),
    StopLocation::new("North & Whipple", 41.9100, -87.6990),
    StopLocation::new("North & California", 41.9100, -87.6980),
    StopLocation::new("North & Mozart", 41.9100, -87.6970),
    StopLocation::new("North & Francisco", 41.9100, -87.6960),
    StopLocation::new("North & Richmond", 41.9100, -87.6950),
    StopLocation::new("North & Sacramento", 41.9100, -87.6940),
];
