//! Delimited-text export of the output dataset
//!
//! One row per record, in output order. Unavailable fields are written as the
//! literal sentinel so every row has the same shape.

use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::records::{DetailField, EnrichedRecord};

/// Export failures
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Column headers, in output order
#[must_use]
pub fn headers() -> Vec<&'static str> {
    let mut headers = vec!["Business Name", "Place URL"];
    headers.extend(DetailField::ALL.iter().map(DetailField::column));
    headers
}

fn row(record: &EnrichedRecord) -> Vec<&str> {
    let mut row = vec![record.name(), record.place_url()];
    row.extend(DetailField::ALL.iter().map(|f| record.field(*f).as_str()));
    row
}

/// Write `records` as CSV (header first) to any writer
pub fn write_csv<'a, W, I>(records: I, writer: W) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a EnrichedRecord>,
{
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(headers())?;

    let mut rows = 0;
    for record in records {
        csv.write_record(row(record))?;
        rows += 1;
    }
    csv.flush()?;
    Ok(rows)
}

/// Write `records` to a CSV file at `path`, replacing any existing file
pub fn save_csv<'a, I>(records: I, path: &Path) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
{
    let file = std::fs::File::create(path)?;
    let rows = write_csv(records, std::io::BufWriter::new(file))?;
    info!("Saved {} rows to {}", rows, path.display());
    Ok(rows)
}
