//! Test fixtures for itinerary-reconciler.
//!
//! Provides realistic test data: named stop locations along North Avenue,
//! Chicago, used as itinerary point payload the core must ignore.

pub mod north_avenue;

pub use north_avenue::*;
