//! Plain-text table rendering of delivered rows.

use std::io::Write;

use placedist_core::{Category, RowOutcome};
use placedist_engine::RowSink;

/// Cell text for a category with no usable place.
pub(crate) const NO_PLACE_MARKER: &str = "Infinity";
/// Cell text for every category of a coordinate whose searches all failed.
pub(crate) const FAILED_MARKER: &str = "N/A";

pub(crate) fn header() -> Vec<String> {
    ["Unique ID", "Latitude", "Longitude"]
        .into_iter()
        .map(str::to_owned)
        .chain(Category::ALL.iter().map(|c| c.label().to_owned()))
        .collect()
}

pub(crate) fn format_distance(meters: f64) -> String {
    if meters.is_finite() {
        format!("{meters:.4}")
    } else {
        NO_PLACE_MARKER.to_owned()
    }
}

pub(crate) fn row_cells(row: &RowOutcome) -> Vec<String> {
    let text = row.text();
    let mut cells = vec![
        row.id().to_owned(),
        text.latitude.clone(),
        text.longitude.clone(),
    ];
    match row {
        RowOutcome::Complete(row) => cells.extend(
            row.outcomes
                .iter()
                .map(|o| format_distance(o.min_distance_meters)),
        ),
        RowOutcome::Failed(_) => {
            cells.extend(Category::ALL.iter().map(|_| FAILED_MARKER.to_owned()));
        }
    }
    cells
}

/// Prints rows as they arrive and keeps the rendered table for export.
///
/// After the first write error (a closed pipe, say) printing stops, but rows
/// are still kept for export.
pub(crate) struct TableRenderer<W: Write> {
    out: W,
    rendered: Vec<Vec<String>>,
    output_broken: bool,
}

impl<W: Write> TableRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            rendered: Vec::new(),
            output_broken: false,
        }
    }

    /// Rows rendered since the last batch start, header excluded.
    pub(crate) fn rows(&self) -> &[Vec<String>] {
        &self.rendered
    }

    fn write_line(&mut self, cells: &[String]) {
        if self.output_broken {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", cells.join("\t")) {
            tracing::error!(error = %e, "table output failed; no further rows will be printed");
            self.output_broken = true;
        }
    }
}

impl<W: Write> RowSink for TableRenderer<W> {
    fn deliver(&mut self, row: RowOutcome, first_of_batch: bool) {
        if first_of_batch {
            self.rendered.clear();
            self.write_line(&header());
        }
        let cells = row_cells(&row);
        self.write_line(&cells);
        self.rendered.push(cells);
    }
}
