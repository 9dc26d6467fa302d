pub mod reader;
pub mod values;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::BackorderError;
use crate::model::{columns, OrderLine};
use rust_decimal::Decimal;
use values::{coerce_date, coerce_decimal, coerce_text};

/// One raw cell as handed over by an ingestion source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

/// One raw row: column name -> scalar value.
pub type RawRow = BTreeMap<String, RawValue>;

/// Why a row was excluded during normalization. Per-row outcomes, not
/// errors; rows are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    InvalidCustomerName,
    MissingQuantityOnHand,
    MissingOutstandingAmount,
    MissingManufacturingLead,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::InvalidCustomerName => write!(f, "invalid customer name"),
            DropReason::MissingQuantityOnHand => write!(f, "missing quantity on hand"),
            DropReason::MissingOutstandingAmount => write!(f, "missing outstanding amount"),
            DropReason::MissingManufacturingLead => write!(f, "missing manufacturing lead"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppedRow {
    /// Zero-based index of the row in the raw input.
    pub row_index: usize,
    pub reason: DropReason,
}

/// Result of normalizing a raw row-set: the canonical lines plus
/// diagnostics for every row that did not survive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedSet {
    pub lines: Vec<OrderLine>,
    pub dropped: Vec<DroppedRow>,
}

impl NormalizedSet {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Normalize a raw row-set into canonical order lines.
///
/// Fails only when a required column is absent from the input schema
/// entirely (the union of column names across all rows). Per-row problems
/// drop the row and record a reason. Input order is preserved, so repeated
/// runs over the same input are deterministic.
///
/// Negative on-hand quantities are clamped to zero.
pub fn normalize_rows(rows: &[RawRow]) -> Result<NormalizedSet, BackorderError> {
    if rows.is_empty() {
        return Ok(NormalizedSet::default());
    }

    check_schema(rows)?;

    let mut set = NormalizedSet::default();
    for (row_index, row) in rows.iter().enumerate() {
        match normalize_row(row) {
            Ok(line) => set.lines.push(line),
            Err(reason) => set.dropped.push(DroppedRow { row_index, reason }),
        }
    }

    Ok(set)
}

/// Verify every required column appears somewhere in the input schema.
fn check_schema(rows: &[RawRow]) -> Result<(), BackorderError> {
    let present: BTreeSet<&str> = rows
        .iter()
        .flat_map(|r| r.keys().map(|k| k.as_str()))
        .collect();

    let missing: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|c| !present.contains(**c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(BackorderError::MissingColumns { missing })
    }
}

fn normalize_row(row: &RawRow) -> Result<OrderLine, DropReason> {
    let customer_name = row
        .get(columns::CUSTOMER_NAME)
        .and_then(coerce_text)
        .filter(|name| is_valid_customer_name(name))
        .ok_or(DropReason::InvalidCustomerName)?;

    let quantity_on_hand = row
        .get(columns::QOH)
        .and_then(coerce_decimal)
        .ok_or(DropReason::MissingQuantityOnHand)?
        .max(Decimal::ZERO);

    let outstanding_amount = row
        .get(columns::OUTSTANDING_AMOUNT)
        .and_then(coerce_decimal)
        .ok_or(DropReason::MissingOutstandingAmount)?;

    let manufacturing_lead = row
        .get(columns::MFG_LEAD)
        .and_then(coerce_text)
        .ok_or(DropReason::MissingManufacturingLead)?;

    let quantity_outstanding = row
        .get(columns::OUTSTANDING_QUANTITY)
        .and_then(coerce_decimal)
        .map(|q| q.max(Decimal::ZERO));

    let requested_delivery_date = row.get(columns::REQUESTED_DELIVERY_DATE).and_then(coerce_date);

    Ok(OrderLine {
        sales_order_id: row
            .get(columns::SALES_ORDER_NO)
            .and_then(coerce_text)
            .unwrap_or_default(),
        item_id: row
            .get(columns::ITEM_NO)
            .and_then(coerce_text)
            .unwrap_or_default(),
        description: row
            .get(columns::DESC)
            .and_then(coerce_text)
            .unwrap_or_default(),
        customer_name,
        quantity_on_hand,
        quantity_outstanding,
        outstanding_amount,
        manufacturing_lead,
        requested_delivery_date,
    })
}

/// A customer name is valid when, after trimming, it is non-empty, not the
/// literal "nan" (any case) and not purely numeric.
fn is_valid_customer_name(name: &str) -> bool {
    if name.is_empty() || name.eq_ignore_ascii_case("nan") {
        return false;
    }
    !name.chars().all(|c| c.is_ascii_digit())
}
