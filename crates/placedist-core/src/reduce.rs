//! Reduction of one category's search results to a single distance.

use crate::geo::haversine_km;
use crate::types::{Category, CategoryOutcome, Coordinate, PlaceResult};

/// Smallest distance in metres from `origin` to any result with a location.
///
/// Results without a location and non-finite distances (malformed API data)
/// never win the minimum. Returns `f64::INFINITY` when nothing qualifies,
/// including for an empty slice.
#[must_use]
pub fn min_distance_meters(results: &[PlaceResult], origin: Coordinate) -> f64 {
    results
        .iter()
        .filter_map(|result| result.location)
        .map(|location| haversine_km(origin, location) * 1000.0)
        .filter(|meters| meters.is_finite())
        .fold(f64::INFINITY, f64::min)
}

/// Wraps [`min_distance_meters`] into a [`CategoryOutcome`].
#[must_use]
pub fn category_outcome(
    category: Category,
    results: &[PlaceResult],
    origin: Coordinate,
) -> CategoryOutcome {
    CategoryOutcome {
        category,
        min_distance_meters: min_distance_meters(results, origin),
    }
}
