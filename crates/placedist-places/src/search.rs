//! The seam between the engine and whatever answers category searches.

use std::future::Future;

use placedist_core::{Category, Coordinate, PlaceResult};

use crate::client::PlacesClient;
use crate::error::PlacesError;

/// Something that can return every place matching a category near a point.
///
/// Implementations resolve all pagination internally and return one flat list.
pub trait PlaceSearch {
    fn search_all(
        &self,
        category: Category,
        at: Coordinate,
    ) -> impl Future<Output = Result<Vec<PlaceResult>, PlacesError>>;
}

impl PlaceSearch for PlacesClient {
    async fn search_all(
        &self,
        category: Category,
        at: Coordinate,
    ) -> Result<Vec<PlaceResult>, PlacesError> {
        self.fetch_all(category.query(), at).await
    }
}
