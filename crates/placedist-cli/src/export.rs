//! Spreadsheet export of the rendered table.

use std::path::Path;

use anyhow::Context;

use crate::render::header;

/// Writes the header and every rendered row to `path` as CSV.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a record cannot be written.
pub(crate) fn export_csv(path: &Path, rows: &[Vec<String>]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failure opening output file {}", path.display()))?;

    writer.write_record(header())?;
    for (idx, row) in rows.iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("failure writing CSV output row {idx}"))?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), rows = rows.len(), "exported results");
    Ok(())
}
