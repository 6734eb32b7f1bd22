//! Wire types for the text-search endpoint.
//!
//! Every nested field is optional: a result without `geometry.location` is
//! kept and later treated as "no usable location". Results are decoded one
//! at a time so a single malformed place never discards its page.

use placedist_core::{Coordinate, PlaceResult};
use serde::Deserialize;
use serde_json::Value;

/// Top-level text-search response envelope.
#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    /// `"OK"`, `"ZERO_RESULTS"`, or an error code such as `"INVALID_REQUEST"`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Raw result objects; see [`decode_place`].
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceItem {
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl From<PlaceItem> for PlaceResult {
    fn from(item: PlaceItem) -> Self {
        let location = item
            .geometry
            .and_then(|g| g.location)
            .and_then(|loc| Some(Coordinate::new(loc.lat?, loc.lng?)));
        PlaceResult { location }
    }
}

/// Decodes one raw result. Anything that does not match the expected shape
/// (a string latitude, a non-object geometry) becomes a place without a
/// location instead of an error.
#[must_use]
pub fn decode_place(raw: Value) -> PlaceResult {
    match serde_json::from_value::<PlaceItem>(raw) {
        Ok(item) => item.into(),
        Err(e) => {
            tracing::debug!(error = %e, "malformed place result; treating as no location");
            PlaceResult::default()
        }
    }
}

/// One decoded page: its places plus the token for the next page, if any.
#[derive(Debug, Default)]
pub struct SearchPage {
    pub results: Vec<PlaceResult>,
    pub next_page_token: Option<String>,
}
