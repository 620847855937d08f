//! CSV export for billing-period trends.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::tariff::usage::TrendPoint;

/// Column header for CSV trend export.
const HEADER: &str = "day,regular_kwh,smart_kwh,regular_slab,smart_slab";

/// Exports a billing-period trend to a CSV file at the given path.
///
/// Writes a header row followed by one data row per day. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(trend: &[TrendPoint], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(trend, buf)
}

/// Writes a billing-period trend as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(trend: &[TrendPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for p in trend {
        wtr.write_record(&[
            p.day.to_string(),
            format!("{:.4}", p.regular_kwh),
            format!("{:.4}", p.smart_kwh),
            p.regular_slab.to_string(),
            p.smart_slab.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
