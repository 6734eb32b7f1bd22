//! Client for a places text-search API: single pages, full paginated
//! searches, and the [`PlaceSearch`] seam the engine is generic over.

pub mod client;
pub mod error;
pub mod search;
pub mod types;

mod retry;

pub use client::{PlacesClient, SearchSettings};
pub use error::PlacesError;
pub use search::PlaceSearch;
pub use types::SearchPage;
