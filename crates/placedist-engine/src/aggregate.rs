//! Per-coordinate fan-out across every category.

use futures::future::join_all;
use placedist_core::{
    category_outcome, Category, CategoryOutcome, CoordinateRecord, FailedRow, ResultRow,
    RowOutcome,
};
use placedist_places::PlaceSearch;

/// Searches all categories for one record concurrently and joins the
/// results into a row.
///
/// Every category search starts at once; the row is assembled in
/// [`Category::ALL`] order regardless of completion order. A failed category
/// is logged and recorded as infinite. Only when every category fails is a
/// [`RowOutcome::Failed`] returned.
pub async fn aggregate_coordinate<S>(search: &S, record: &CoordinateRecord) -> RowOutcome
where
    S: PlaceSearch,
{
    let origin = record.coordinate;
    let searches = Category::ALL.map(|category| async move {
        (category, search.search_all(category, origin).await)
    });

    let mut outcomes: Vec<CategoryOutcome> = Vec::with_capacity(Category::ALL.len());
    let mut failures = 0usize;
    let mut last_error: Option<String> = None;

    for (category, result) in join_all(searches).await {
        match result {
            Ok(results) => outcomes.push(category_outcome(category, &results, origin)),
            Err(e) => {
                tracing::warn!(
                    id = %record.id,
                    %category,
                    error = %e,
                    "category search failed; recording no result"
                );
                failures += 1;
                last_error = Some(e.to_string());
                outcomes.push(CategoryOutcome::not_found(category));
            }
        }
    }

    if failures == Category::ALL.len() {
        return RowOutcome::Failed(FailedRow {
            id: record.id.clone(),
            coordinate: origin,
            text: record.text.clone(),
            reason: last_error.unwrap_or_else(|| "all category searches failed".to_owned()),
        });
    }

    tracing::debug!(
        id = %record.id,
        failed_categories = failures,
        "coordinate aggregated"
    );

    RowOutcome::Complete(ResultRow {
        id: record.id.clone(),
        coordinate: origin,
        text: record.text.clone(),
        outcomes,
    })
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
