//! Excel export of table data.
//!
//! # Design
//! Export is split in two: [`SheetData::from_records`] turns records and a
//! column mapping into plain strings, and [`write_workbook`] hands those
//! strings to `rust_xlsxwriter`. Every cell is written as text, taken
//! verbatim from the record's field, except `is_date` fields which are
//! rendered as a locale date-time string.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::table::cell_text;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("record could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] XlsxError),

    #[error("too many {0} for one sheet")]
    TooLarge(&'static str),
}

/// One exported column: header label, source field and date flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportColumn {
    pub label: String,
    pub field: String,
    pub is_date: bool,
}

impl ExportColumn {
    pub fn new(label: &str, field: &str) -> Self {
        Self {
            label: label.to_string(),
            field: field.to_string(),
            is_date: false,
        }
    }

    pub fn date(label: &str, field: &str) -> Self {
        Self {
            is_date: true,
            ..Self::new(label, field)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    /// Render in the machine's local time zone.
    pub fn from_records<T: Serialize>(records: &[T], columns: &[ExportColumn]) -> Result<Self, ExportError> {
        Self::from_records_in(records, columns, &Local)
    }

    pub fn from_records_in<T, Tz>(records: &[T], columns: &[ExportColumn], tz: &Tz) -> Result<Self, ExportError>
    where
        T: Serialize,
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let json = serde_json::to_value(record)?;
            let row = columns
                .iter()
                .map(|column| {
                    let value = json.get(&column.field);
                    match value {
                        Some(Value::String(raw)) if column.is_date => locale_datetime(raw, tz),
                        _ => cell_text(value),
                    }
                })
                .collect();
            rows.push(row);
        }
        Ok(Self {
            headers: columns.iter().map(|c| c.label.clone()).collect(),
            rows,
        })
    }
}

/// Render an ISO-8601 timestamp like `toLocaleString()` in en-US:
/// `10/19/2026, 2:05:09 PM`. Unparsable input is returned unchanged.
pub fn locale_datetime<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(tz))
        .ok()
        .or_else(|| {
            // Zone-less timestamps are taken as UTC.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc().with_timezone(tz))
        });
    match parsed {
        Some(dt) => dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => raw.to_string(),
    }
}

/// Build a one-sheet workbook: header row of labels, then the data rows.
pub fn write_workbook(name: &str, sheet: &SheetData) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(name))?;

    for (col, header) in sheet.headers.iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| ExportError::TooLarge("columns"))?;
        worksheet.write_string_with_format(0, col, header, &header_format)?;
    }
    for (row_index, row) in sheet.rows.iter().enumerate() {
        let row_number = u32::try_from(row_index + 1).map_err(|_| ExportError::TooLarge("rows"))?;
        for (col, cell) in row.iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| ExportError::TooLarge("columns"))?;
            worksheet.write_string(row_number, col, cell)?;
        }
    }
    Ok(workbook)
}

/// Export `records` to `<dir>/<name>.xlsx` and return the written path.
pub fn export_to_file<T: Serialize>(
    dir: &Path,
    name: &str,
    records: &[T],
    columns: &[ExportColumn],
) -> Result<PathBuf, ExportError> {
    let sheet = SheetData::from_records(records, columns)?;
    let mut workbook = write_workbook(name, &sheet)?;
    let path = dir.join(format!("{}.xlsx", file_stem(name)));
    workbook.save(&path)?;
    tracing::info!(path = %path.display(), rows = sheet.rows.len(), "exported workbook");
    Ok(path)
}

/// Export `records` to in-memory `.xlsx` bytes.
pub fn export_to_buffer<T: Serialize>(name: &str, records: &[T], columns: &[ExportColumn]) -> Result<Vec<u8>, ExportError> {
    let sheet = SheetData::from_records(records, columns)?;
    let mut workbook = write_workbook(name, &sheet)?;
    Ok(workbook.save_to_buffer()?)
}

/// Excel sheet names: at most 31 chars, none of `[]:*?/\`.
fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    let trimmed = cleaned.trim().trim_matches('\'');
    if trimmed.is_empty() {
        "Sheet1".to_string()
    } else {
        trimmed.to_string()
    }
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "export".to_string()
    } else {
        stem
    }
}

pub fn user_export_columns() -> Vec<ExportColumn> {
    vec![
        ExportColumn::new("ID", "id"),
        ExportColumn::new("First Name", "firstName"),
        ExportColumn::new("Last Name", "lastName"),
        ExportColumn::new("Email", "email"),
        ExportColumn::new("Phone", "phoneNumber"),
        ExportColumn::new("Role", "role"),
        ExportColumn::new("Status", "status"),
        ExportColumn::date("Registered", "createdAt"),
    ]
}

pub fn entity_export_columns() -> Vec<ExportColumn> {
    vec![
        ExportColumn::new("ID", "id"),
        ExportColumn::new("Name", "name"),
        ExportColumn::new("TIN", "tinNumber"),
        ExportColumn::new("Email", "email"),
        ExportColumn::new("Phone", "phoneNumber"),
        ExportColumn::new("Address", "address"),
        ExportColumn::new("Type", "entityType"),
        ExportColumn::new("Status", "status"),
        ExportColumn::date("Registered", "createdAt"),
    ]
}

pub fn system_error_export_columns() -> Vec<ExportColumn> {
    vec![
        ExportColumn::new("ID", "id"),
        ExportColumn::new("Method", "method"),
        ExportColumn::new("Path", "path"),
        ExportColumn::new("Status", "statusCode"),
        ExportColumn::new("Message", "message"),
        ExportColumn::date("Date", "createdAt"),
    ]
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn records() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Abay", "createdAt": "2026-03-05T14:07:09Z", "active": true}),
            json!({"id": 2, "createdAt": null}),
            json!({"id": 3, "name": "Tana", "createdAt": "not a date"}),
        ]
    }

    fn columns() -> Vec<ExportColumn> {
        vec![
            ExportColumn::new("Name", "name"),
            ExportColumn::new("ID", "id"),
            ExportColumn::date("Created", "createdAt"),
            ExportColumn::new("Active", "active"),
        ]
    }

    #[test]
    fn sheet_has_n_rows_and_k_columns_in_order() {
        let sheet = SheetData::from_records_in(&records(), &columns(), &Utc).unwrap();
        assert_eq!(sheet.headers, vec!["Name", "ID", "Created", "Active"]);
        assert_eq!(sheet.rows.len(), 3);
        assert!(sheet.rows.iter().all(|r| r.len() == 4));
        assert_eq!(sheet.rows[0], vec!["Abay", "1", "3/5/2026, 2:07:09 PM", "true"]);
    }

    #[test]
    fn missing_and_null_fields_are_empty() {
        let sheet = SheetData::from_records_in(&records(), &columns(), &Utc).unwrap();
        assert_eq!(sheet.rows[1], vec!["", "2", "", ""]);
    }

    #[test]
    fn unparsable_date_is_verbatim() {
        let sheet = SheetData::from_records_in(&records(), &columns(), &Utc).unwrap();
        assert_eq!(sheet.rows[2][2], "not a date");
    }

    #[test]
    fn date_rendering_respects_zone() {
        let eat = chrono::FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(locale_datetime("2026-03-05T22:30:00Z", &eat), "3/6/2026, 1:30:00 AM");
        assert_eq!(locale_datetime("2026-03-05T00:00:05.123", &Utc), "3/5/2026, 12:00:05 AM");
    }

    #[test]
    fn date_flag_off_keeps_iso_string() {
        let sheet = SheetData::from_records_in(
            &records(),
            &[ExportColumn::new("Created", "createdAt")],
            &Utc,
        )
        .unwrap();
        assert_eq!(sheet.rows[0][0], "2026-03-05T14:07:09Z");
    }

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(sheet_name("Users [2026/03]"), "Users 202603");
        assert_eq!(sheet_name("???"), "Sheet1");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }

    #[test]
    fn buffer_is_a_zip_container() {
        let bytes = export_to_buffer("Entities", &records(), &columns()).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn file_export_uses_sanitized_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_to_file(dir.path(), "system errors", &records(), &columns()).unwrap();
        assert_eq!(path.file_name().unwrap(), "system_errors.xlsx");
        assert!(path.exists());
    }
}
