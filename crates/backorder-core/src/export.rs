use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::CustomerRollup;
use crate::annotations::AnnotationStore;
use crate::classify::category_of;
use crate::model::{BackorderPolicy, OrderLine};

/// One row of the detail export: one line item with its derived stock
/// status. Field names are the serialized column headers.
#[derive(Debug, Clone, Serialize)]
pub struct DetailRow {
    #[serde(rename = "Order #")]
    pub order_no: String,
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Item #")]
    pub item_no: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Outstanding $")]
    pub outstanding_amount: Decimal,
    #[serde(rename = "QOH")]
    pub quantity_on_hand: Decimal,
    #[serde(rename = "Delivery Date")]
    pub delivery_date: String,
    #[serde(rename = "Mfg Lead")]
    pub mfg_lead: String,
    #[serde(rename = "Stock Status")]
    pub stock_status: String,
}

impl DetailRow {
    pub fn from_line(line: &OrderLine, policy: BackorderPolicy) -> DetailRow {
        DetailRow {
            order_no: line.sales_order_id.clone(),
            customer: line.customer_name.clone(),
            item_no: line.item_id.clone(),
            description: line.description.clone(),
            outstanding_amount: line.outstanding_amount,
            quantity_on_hand: line.quantity_on_hand,
            delivery_date: line
                .requested_delivery_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            mfg_lead: line.manufacturing_lead.clone(),
            stock_status: category_of(line, policy).to_string(),
        }
    }
}

pub fn detail_rows(lines: &[OrderLine], policy: BackorderPolicy) -> Vec<DetailRow> {
    lines
        .iter()
        .map(|line| DetailRow::from_line(line, policy))
        .collect()
}

/// One row of the customer summary export.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Total Outstanding $")]
    pub total_outstanding: Decimal,
    #[serde(rename = "Total Items")]
    pub total_items: usize,
    #[serde(rename = "Back Order Items")]
    pub back_order_items: usize,
    #[serde(rename = "Back Order $")]
    pub back_order_value: Decimal,
    #[serde(rename = "In-Stock Items")]
    pub in_stock_items: usize,
    #[serde(rename = "In-Stock $")]
    pub in_stock_value: Decimal,
    #[serde(rename = "Mfg Leads")]
    pub mfg_leads: String,
}

impl SummaryRow {
    pub fn from_rollup(rollup: &CustomerRollup) -> SummaryRow {
        SummaryRow {
            customer: rollup.customer_name.clone(),
            total_outstanding: rollup.total_outstanding,
            total_items: rollup.item_count,
            back_order_items: rollup.back_order_item_count,
            back_order_value: rollup.back_order_value,
            in_stock_items: rollup.in_stock_item_count,
            in_stock_value: rollup.in_stock_value,
            mfg_leads: rollup
                .manufacturing_leads
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

pub fn summary_rows(rollups: &[CustomerRollup]) -> Vec<SummaryRow> {
    rollups.iter().map(SummaryRow::from_rollup).collect()
}

/// One row of the annotation export. The snapshot fields come from the
/// record, not the current row-set; `recorded_at` is split into separate
/// date and time columns.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationRow {
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Sales Order")]
    pub sales_order: String,
    #[serde(rename = "Item No")]
    pub item_no: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Comments")]
    pub comments: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
    #[serde(rename = "Stock Status")]
    pub stock_status: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
}

pub fn annotation_rows(store: &AnnotationStore) -> Vec<AnnotationRow> {
    store
        .iter()
        .map(|(key, record)| AnnotationRow {
            customer: record.customer_name.clone(),
            sales_order: key.sales_order_id.clone(),
            item_no: key.item_id.clone(),
            description: record.description.clone(),
            reason: record.reason.clone(),
            comments: record.comments.clone().unwrap_or_default(),
            amount: record.outstanding_amount,
            stock_status: record.stock_status.to_string(),
            date: record.recorded_at.format("%Y-%m-%d").to_string(),
            time: record.recorded_at.format("%H:%M:%S").to_string(),
        })
        .collect()
}
