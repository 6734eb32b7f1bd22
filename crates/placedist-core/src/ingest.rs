//! Turns raw newline-separated input into validated coordinate records.

use crate::types::{Coordinate, CoordinateRecord};

/// Pairs latitude and longitude lines by position and builds one record per
/// usable pair.
///
/// Pairing stops at the shorter of the two coordinate lists. A pair is
/// skipped when either side is blank or not a finite number. Ids are taken
/// from the same line position in `ids`; missing or blank ids fall back to
/// `ID-<line+1>`.
#[must_use]
pub fn parse_coordinate_lines(
    latitudes: &str,
    longitudes: &str,
    ids: &str,
) -> Vec<CoordinateRecord> {
    let ids: Vec<&str> = ids.lines().collect();

    latitudes
        .lines()
        .zip(longitudes.lines())
        .enumerate()
        .filter_map(|(index, (lat, lng))| {
            let Some(coordinate) = parse_pair(lat, lng) else {
                tracing::debug!(
                    line = index + 1,
                    lat,
                    lng,
                    "skipping unusable coordinate pair"
                );
                return None;
            };
            let id = ids.get(index).copied().unwrap_or_default();
            Some(CoordinateRecord::new(index, id, coordinate).with_text(lat, lng))
        })
        .collect()
}

fn parse_pair(lat: &str, lng: &str) -> Option<Coordinate> {
    let latitude = parse_component(lat)?;
    let longitude = parse_component(lng)?;
    Some(Coordinate::new(latitude, longitude)).filter(Coordinate::is_finite)
}

fn parse_component(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok()
}
