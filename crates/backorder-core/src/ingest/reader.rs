use std::io::Cursor;
use std::path::Path;

use calamine::{Reader, Xlsx};

use crate::error::BackorderError;
use crate::ingest::{RawRow, RawValue};

/// Read an input file into raw rows, dispatching on extension:
/// `.xlsx`/`.xls` via calamine, `.json` as a pre-parsed row-set,
/// anything else as CSV.
pub fn read_table(path: &Path) -> Result<Vec<RawRow>, BackorderError> {
    let bytes = std::fs::read(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xls" => read_xlsx(&bytes),
        "json" => Ok(serde_json::from_slice(&bytes)?),
        _ => read_csv(&bytes),
    }
}

/// Parse the first worksheet of an xlsx workbook. Row 1 is the header;
/// each following row becomes one RawRow keyed by header name.
pub fn read_xlsx(bytes: &[u8]) -> Result<Vec<RawRow>, BackorderError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| BackorderError::ParseError(format!("failed to open xlsx: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| BackorderError::ParseError("workbook has no worksheets".into()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| BackorderError::ParseError(format!("sheet '{sheet_name}' unreadable: {e}")))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row.iter().map(header_cell).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for sheet_row in rows_iter {
        let mut row = RawRow::new();
        for (header, cell) in headers.iter().zip(sheet_row.iter()) {
            if header.is_empty() {
                continue;
            }
            row.insert(header.clone(), cell_to_raw(cell));
        }
        // Fully empty rows carry no signal
        if row.values().any(|v| *v != RawValue::Empty) {
            rows.push(row);
        }
    }

    Ok(rows)
}

fn header_cell(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::String(s) => s.trim().to_string(),
        calamine::Data::Empty => String::new(),
        other => format!("{other}").trim().to_string(),
    }
}

fn cell_to_raw(cell: &calamine::Data) -> RawValue {
    match cell {
        calamine::Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                RawValue::Empty
            } else {
                RawValue::Text(trimmed.to_string())
            }
        }
        calamine::Data::Float(f) => RawValue::Number(*f),
        calamine::Data::Int(i) => RawValue::Number(*i as f64),
        calamine::Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => RawValue::Date(naive.date()),
            None => RawValue::Empty,
        },
        calamine::Data::DateTimeIso(s) | calamine::Data::DurationIso(s) => {
            RawValue::Text(s.clone())
        }
        calamine::Data::Bool(b) => RawValue::Text(b.to_string()),
        calamine::Data::Empty | calamine::Data::Error(_) => RawValue::Empty,
    }
}

/// Parse CSV bytes. Every cell arrives as text; type coercion happens in
/// the normalizer, matching how xlsx numeric cells are handled.
pub fn read_csv(bytes: &[u8]) -> Result<Vec<RawRow>, BackorderError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RawRow::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            if header.is_empty() {
                continue;
            }
            let trimmed = field.trim();
            let value = if trimmed.is_empty() {
                RawValue::Empty
            } else {
                RawValue::Text(trimmed.to_string())
            };
            row.insert(header.clone(), value);
        }
        if row.values().any(|v| *v != RawValue::Empty) {
            rows.push(row);
        }
    }

    Ok(rows)
}
