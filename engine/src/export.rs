//! CSV export of list-view rows.

use crate::{error::Result, value, ColumnDef, Error, FieldType, Row};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// UTF-8 byte order mark written at the start of every export.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Content type of an export.
pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8;";

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Render rows as a CSV document.
///
/// The header row holds the column labels. Timestamp columns are written as
/// `DD/MM/YYYY, HH:MM:SS` in UTC, missing and null values as empty cells.
pub fn export_csv<R: Row>(rows: &[&R], columns: &[&ColumnDef]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(UTF8_BOM.to_vec());

    writer
        .write_record(columns.iter().map(|c| c.label.as_str()))
        .map_err(|e| Error::Export(e.to_string()))?;

    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| render_cell(row.field(&column.key), column.field_type))
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| Error::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(e.to_string()))?;
    tracing::debug!(rows = rows.len(), bytes = bytes.len(), "csv export rendered");
    Ok(bytes)
}

fn render_cell(value: Option<Value>, field_type: FieldType) -> String {
    let Some(value) = value else {
        return String::new();
    };
    if field_type == FieldType::Timestamp {
        let formatted = value::to_timestamp_millis(&value)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string());
        if let Some(formatted) = formatted {
            return formatted;
        }
    }
    value::to_text(&value).unwrap_or_default()
}

/// Download file name for a view export, e.g. `demands-export.csv`.
pub fn export_filename(view_name: &str) -> String {
    format!("{}-export.csv", view_name)
}
