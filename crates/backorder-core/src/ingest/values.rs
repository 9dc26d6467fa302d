use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::ingest::RawValue;

/// Coerce a raw cell to a decimal. A value that cannot be coerced is
/// "missing" for that field, never an error; the normalizer decides whether
/// the row survives.
///
/// Text handling accepts currency formatting as it appears in order exports:
/// - "1250" -> 1250
/// - "$1,250.50" -> 1250.50
/// - "" / "-" / "nan" / "N/A" -> missing
pub fn coerce_decimal(value: &RawValue) -> Option<Decimal> {
    match value {
        RawValue::Number(f) => Some(f64_to_decimal(*f)),
        RawValue::Text(s) => parse_decimal_text(s),
        RawValue::Date(_) | RawValue::Empty => None,
    }
}

fn parse_decimal_text(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() || s == "-" || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("n/a") {
        return None;
    }
    let stripped: String = s
        .strip_prefix('$')
        .unwrap_or(s)
        .chars()
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(stripped.trim()).ok()
}

/// Coerce a raw cell to a calendar date. Unparsable values become missing;
/// rows are never dropped solely for a bad delivery date.
pub fn coerce_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Date(d) => Some(*d),
        RawValue::Text(s) => parse_date_text(s),
        RawValue::Number(_) | RawValue::Empty => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // Exports sometimes carry a full timestamp in the date column
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Coerce a raw cell to trimmed text. Empty cells and whitespace-only
/// strings are missing.
pub fn coerce_text(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        RawValue::Number(f) => Some(f.to_string()),
        RawValue::Date(d) => Some(d.to_string()),
        RawValue::Empty => None,
    }
}

/// Convert f64 to Decimal through a string round-trip to avoid
/// floating-point artifacts (e.g., 1250.55_f64 becoming 1250.54999...).
pub fn f64_to_decimal(f: f64) -> Decimal {
    let s = format!("{f}");
    s.parse::<Decimal>()
        .unwrap_or_else(|_| Decimal::try_from(f).unwrap_or_default())
}
