use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names of the source export. Required columns must exist in the
/// input schema; the optional ones enrich classification and exports.
pub mod columns {
    pub const QOH: &str = "QOH";
    pub const CUSTOMER_NAME: &str = "Sell-to Customer Name";
    pub const OUTSTANDING_AMOUNT: &str = "Outstanding Amount";
    pub const MFG_LEAD: &str = "Mfg. Lead Name";
    pub const OUTSTANDING_QUANTITY: &str = "Outstanding Quantity";
    pub const REQUESTED_DELIVERY_DATE: &str = "Requested Delivery Date";
    pub const SALES_ORDER_NO: &str = "Sales Order No";
    pub const ITEM_NO: &str = "Item No";
    pub const DESC: &str = "Desc";

    pub const REQUIRED: [&str; 4] = [QOH, CUSTOMER_NAME, OUTSTANDING_AMOUNT, MFG_LEAD];
}

/// One sales-order line after normalization.
///
/// Created once per ingested row and never mutated; downstream stages only
/// filter and copy lines into subsets. Every surviving line has a valid
/// customer name, quantity on hand, outstanding amount and manufacturing lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub sales_order_id: String,
    pub item_id: String,
    pub description: String,
    pub customer_name: String,
    pub quantity_on_hand: Decimal,
    /// Units still owed on the line. Absent in some exports; rows without it
    /// fall back to Strict classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_outstanding: Option<Decimal>,
    pub outstanding_amount: Decimal,
    pub manufacturing_lead: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_delivery_date: Option<NaiveDate>,
}

impl OrderLine {
    /// Unit gap between what is owed and what is on hand, clamped at zero.
    /// None when the line carries no outstanding quantity.
    pub fn shortage_qty(&self) -> Option<Decimal> {
        self.quantity_outstanding
            .map(|outstanding| (outstanding - self.quantity_on_hand).max(Decimal::ZERO))
    }

    /// Whether the line can currently ship in full. With no outstanding
    /// quantity, any positive on-hand stock counts as fulfillable.
    pub fn can_fulfill(&self) -> bool {
        match self.quantity_outstanding {
            Some(outstanding) => self.quantity_on_hand >= outstanding,
            None => self.quantity_on_hand > Decimal::ZERO,
        }
    }
}

/// Stock classification of a line under a policy. Computed on demand by the
/// classifier, never stored on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockCategory {
    FullBackOrder,
    PartialShortage,
    Fulfillable,
}

impl fmt::Display for StockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockCategory::FullBackOrder => write!(f, "BACK ORDER"),
            StockCategory::PartialShortage => write!(f, "PARTIAL SHORTAGE"),
            StockCategory::Fulfillable => write!(f, "IN STOCK"),
        }
    }
}

/// Back-order policy. A pure parameter to the classifier: both policies can
/// be evaluated over the same row-set for side-by-side comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackorderPolicy {
    /// QOH = 0 is a back order, QOH > 0 is fulfillable. Used when the source
    /// has no reliable outstanding-quantity column.
    #[default]
    Strict,
    /// Compares QOH against the outstanding quantity, surfacing partial
    /// shortages. Rows without an outstanding quantity use Strict.
    ShortageAware,
}

impl fmt::Display for BackorderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackorderPolicy::Strict => write!(f, "strict"),
            BackorderPolicy::ShortageAware => write!(f, "shortage-aware"),
        }
    }
}

impl BackorderPolicy {
    pub fn from_str_loose(s: &str) -> Option<BackorderPolicy> {
        let lower = s.trim().to_lowercase();
        if lower == "strict" {
            Some(BackorderPolicy::Strict)
        } else if lower.contains("shortage") {
            Some(BackorderPolicy::ShortageAware)
        } else {
            None
        }
    }
}
