//! Batch orchestration: every coordinate through the aggregator, rows out in
//! input order.

use std::pin::pin;

use futures::stream::{self, StreamExt};
use placedist_core::{CoordinateRecord, RowOutcome};
use placedist_places::PlaceSearch;

use crate::aggregate::aggregate_coordinate;
use crate::delivery::OrderedDelivery;

/// The rendering boundary. Receives each row exactly once, in input order.
pub trait RowSink {
    /// `first_of_batch` is `true` for exactly one row per batch: the first
    /// one delivered. Renderers use it to clear any previous table.
    fn deliver(&mut self, row: RowOutcome, first_of_batch: bool);
}

/// Counts reported once a batch has been fully delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub failed_rows: usize,
    /// Category cells with no usable result, across complete rows only.
    pub categories_without_results: usize,
}

impl BatchSummary {
    fn record(&mut self, row: &RowOutcome) {
        self.rows += 1;
        match row {
            RowOutcome::Complete(row) => {
                self.categories_without_results +=
                    row.outcomes.iter().filter(|o| !o.is_found()).count();
            }
            RowOutcome::Failed(_) => self.failed_rows += 1,
        }
    }
}

/// Runs every record through [`aggregate_coordinate`] and hands rows to
/// `sink` in the order of `records`.
///
/// At most `max_concurrent` coordinates are in flight at once (minimum 1).
/// Completions arrive in any order and are gated through an
/// [`OrderedDelivery`] queue keyed by position in `records`, so row `k` is
/// never delivered before row `k - 1`. Row count always equals input count;
/// failed coordinates are delivered as [`RowOutcome::Failed`].
pub async fn run_batch<S, K>(
    search: &S,
    records: &[CoordinateRecord],
    max_concurrent: usize,
    sink: &mut K,
) -> BatchSummary
where
    S: PlaceSearch,
    K: RowSink + ?Sized,
{
    let mut summary = BatchSummary::default();
    if records.is_empty() {
        tracing::info!("no coordinates to process");
        return summary;
    }

    let max_concurrent = max_concurrent.max(1);
    tracing::info!(
        coordinates = records.len(),
        max_concurrent,
        "starting batch"
    );

    let mut completions = pin!(stream::iter(records.iter().enumerate())
        .map(|(slot, record)| async move { (slot, aggregate_coordinate(search, record).await) })
        .buffer_unordered(max_concurrent));

    let mut queue = OrderedDelivery::new();
    let mut first_of_batch = true;

    while let Some((slot, outcome)) = completions.next().await {
        if let RowOutcome::Failed(failed) = &outcome {
            tracing::error!(
                id = %failed.id,
                reason = %failed.reason,
                "every category search failed for coordinate"
            );
        }
        for row in queue.push(slot, outcome) {
            summary.record(&row);
            sink.deliver(row, std::mem::replace(&mut first_of_batch, false));
        }
    }

    if queue.released() < records.len() {
        tracing::error!(
            released = queue.released(),
            pending = queue.pending(),
            expected = records.len(),
            "batch ended with undelivered rows"
        );
    }

    tracing::info!(
        rows = summary.rows,
        failed_rows = summary.failed_rows,
        categories_without_results = summary.categories_without_results,
        "batch complete"
    );
    summary
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
