// FortiRep - report/export.rs
//
// CSV export of a daily summary's detail slice, for operators who want
// the notable events in a spreadsheet instead of the HTML page.
// Writes to any Write trait object.

use std::io::Write;
use std::path::Path;

use crate::core::model::DailySummary;
use crate::util::constants;
use crate::util::error::ExportError;

/// Export the detail slice to CSV.
///
/// Columns: time, then the module's detail columns in report order.
/// Returns the number of data rows written.
pub fn export_detail_csv<W: Write>(
    summary: &DailySummary,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let spec = summary.module.spec();
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(1 + spec.detail_columns.len());
    header.push("Time");
    header.extend(spec.detail_columns.iter().map(|c| c.header));
    csv_writer
        .write_record(&header)
        .map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    let mut count = 0;
    for row in &summary.detail {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(
            row.timestamp
                .format(constants::LOG_TIMESTAMP_FORMAT)
                .to_string(),
        );
        record.extend(row.values.iter().cloned());
        csv_writer
            .write_record(&record)
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}
