//! Multi-page text-search loop for `PlacesClient`.

use std::collections::HashSet;
use std::time::Duration;

use placedist_core::{Coordinate, PlaceResult};

use crate::error::PlacesError;
use crate::types::SearchPage;

use super::PlacesClient;

impl PlacesClient {
    /// Fetches every page of a text search near `at` and concatenates the
    /// results in page order.
    ///
    /// Continuation tokens are followed until a page carries none, at most
    /// [`SearchSettings::max_pages`](super::SearchSettings::max_pages) pages
    /// are requested, and a token seen twice ends the loop. Before each
    /// continuation request the client waits `page_token_delay_ms`; a token
    /// rejected as not yet valid is retried once after the same pause.
    ///
    /// **All-or-nothing**: if any page fails, results from earlier pages are
    /// discarded and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_page`], including a second
    /// [`PlacesError::TokenNotReady`] for the same token.
    pub async fn fetch_all(
        &self,
        query: &str,
        at: Coordinate,
    ) -> Result<Vec<PlaceResult>, PlacesError> {
        let max_pages = self.settings.max_pages.max(1);
        let mut all_results: Vec<PlaceResult> = Vec::new();
        let mut seen_tokens: HashSet<String> = HashSet::new();
        let mut cursor: Option<String> = None;

        for page_number in 1..=max_pages {
            let page = match cursor.as_deref() {
                None => self.fetch_page(query, at, None).await?,
                Some(token) => self.fetch_continuation(query, at, token).await?,
            };
            all_results.extend(page.results);

            let Some(next) = page.next_page_token else {
                return Ok(all_results);
            };
            if !seen_tokens.insert(next.clone()) {
                tracing::warn!(
                    query,
                    location = %at,
                    "continuation token repeated; stopping pagination"
                );
                return Ok(all_results);
            }
            if page_number == max_pages {
                tracing::warn!(
                    query,
                    location = %at,
                    max_pages,
                    "page cap reached with results remaining"
                );
                return Ok(all_results);
            }
            cursor = Some(next);
        }

        Ok(all_results)
    }

    /// Requests the page behind `token`, tolerating one "not ready yet" reply.
    async fn fetch_continuation(
        &self,
        query: &str,
        at: Coordinate,
        token: &str,
    ) -> Result<SearchPage, PlacesError> {
        let delay = Duration::from_millis(self.settings.page_token_delay_ms);
        tokio::time::sleep(delay).await;

        match self.fetch_page(query, at, Some(token)).await {
            Err(PlacesError::TokenNotReady) => {
                tracing::debug!(
                    query,
                    location = %at,
                    "continuation token not ready; retrying once"
                );
                tokio::time::sleep(delay).await;
                self.fetch_page(query, at, Some(token)).await
            }
            other => other,
        }
    }
}
