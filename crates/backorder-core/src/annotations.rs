use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classify::category_of;
use crate::model::{BackorderPolicy, OrderLine, StockCategory};

/// Composite key of an annotation: one record per (sales order, item) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationKey {
    pub sales_order_id: String,
    pub item_id: String,
}

impl AnnotationKey {
    pub fn new(sales_order_id: impl Into<String>, item_id: impl Into<String>) -> AnnotationKey {
        AnnotationKey {
            sales_order_id: sales_order_id.into(),
            item_id: item_id.into(),
        }
    }
}

/// One reason/comment entry, carrying a denormalized snapshot of the order
/// line as it looked when the reason was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub recorded_at: NaiveDateTime,
    pub customer_name: String,
    pub description: String,
    pub outstanding_amount: Decimal,
    pub stock_status: StockCategory,
}

impl AnnotationRecord {
    /// Build a record for an order line, snapshotting its current fields
    /// and stock status under the given policy.
    pub fn snapshot(
        line: &OrderLine,
        policy: BackorderPolicy,
        reason: impl Into<String>,
        comments: Option<String>,
        recorded_at: NaiveDateTime,
    ) -> AnnotationRecord {
        AnnotationRecord {
            reason: reason.into(),
            comments,
            recorded_at,
            customer_name: line.customer_name.clone(),
            description: line.description.clone(),
            outstanding_amount: line.outstanding_amount,
            stock_status: category_of(line, policy),
        }
    }
}

/// Flattened (key, record) pair used for JSON persistence of a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationEntry {
    pub sales_order_id: String,
    pub item_id: String,
    #[serde(flatten)]
    pub record: AnnotationRecord,
}

/// In-memory keyed store of reason/comment records, scoped to one session.
///
/// Upserts are last-write-wins with no merge: at most one record per key.
/// Iteration follows first-insertion order of each key, which keeps exports
/// deterministic within a session.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    order: Vec<AnnotationKey>,
    records: HashMap<AnnotationKey, AnnotationRecord>,
}

impl AnnotationStore {
    pub fn new() -> AnnotationStore {
        AnnotationStore::default()
    }

    /// Replace any existing record at `key` unconditionally. Never fails.
    pub fn upsert(&mut self, key: AnnotationKey, record: AnnotationRecord) {
        if !self.records.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.records.insert(key, record);
    }

    pub fn get(&self, key: &AnnotationKey) -> Option<&AnnotationRecord> {
        self.records.get(key)
    }

    /// All records in first-insertion order of their keys.
    pub fn iter(&self) -> impl Iterator<Item = (&AnnotationKey, &AnnotationRecord)> {
        self.order.iter().map(|key| (key, &self.records[key]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn to_entries(&self) -> Vec<AnnotationEntry> {
        self.iter()
            .map(|(key, record)| AnnotationEntry {
                sales_order_id: key.sales_order_id.clone(),
                item_id: key.item_id.clone(),
                record: record.clone(),
            })
            .collect()
    }

    pub fn from_entries(entries: Vec<AnnotationEntry>) -> AnnotationStore {
        let mut store = AnnotationStore::new();
        for entry in entries {
            store.upsert(
                AnnotationKey::new(entry.sales_order_id, entry.item_id),
                entry.record,
            );
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn record(reason: &str, hour: u32) -> AnnotationRecord {
        AnnotationRecord {
            reason: reason.into(),
            comments: None,
            recorded_at: at(hour),
            customer_name: "Acme".into(),
            description: "Widget".into(),
            outstanding_amount: dec!(100),
            stock_status: StockCategory::FullBackOrder,
        }
    }

    #[test]
    fn upsert_replaces_entire_record() {
        let mut store = AnnotationStore::new();
        let key = AnnotationKey::new("SO-1", "IT-1");
        store.upsert(key.clone(), record("Manufacturing in progress", 9));
        store.upsert(key.clone(), record("Supply chain delay", 10));

        assert_eq!(store.len(), 1);
        let r = store.get(&key).unwrap();
        assert_eq!(r.reason, "Supply chain delay");
        assert_eq!(r.recorded_at, at(10));
    }

    #[test]
    fn get_unknown_key_is_absent() {
        let store = AnnotationStore::new();
        assert!(store.get(&AnnotationKey::new("SO-9", "IT-9")).is_none());
    }

    #[test]
    fn iteration_preserves_first_insertion_order() {
        let mut store = AnnotationStore::new();
        store.upsert(AnnotationKey::new("SO-2", "IT-1"), record("a", 9));
        store.upsert(AnnotationKey::new("SO-1", "IT-1"), record("b", 9));
        // Re-upserting SO-2 must not move it to the back
        store.upsert(AnnotationKey::new("SO-2", "IT-1"), record("c", 10));

        let orders: Vec<&str> = store
            .iter()
            .map(|(k, _)| k.sales_order_id.as_str())
            .collect();
        assert_eq!(orders, vec!["SO-2", "SO-1"]);
    }

    #[test]
    fn same_order_different_item_is_distinct_key() {
        let mut store = AnnotationStore::new();
        store.upsert(AnnotationKey::new("SO-1", "IT-1"), record("a", 9));
        store.upsert(AnnotationKey::new("SO-1", "IT-2"), record("b", 9));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn entries_round_trip_through_json() {
        let mut store = AnnotationStore::new();
        store.upsert(AnnotationKey::new("SO-1", "IT-1"), record("a", 9));
        store.upsert(AnnotationKey::new("SO-2", "IT-1"), record("b", 10));

        let json = serde_json::to_string(&store.to_entries()).unwrap();
        let reloaded = AnnotationStore::from_entries(serde_json::from_str(&json).unwrap());

        assert_eq!(reloaded.len(), 2);
        let orders: Vec<&str> = reloaded
            .iter()
            .map(|(k, _)| k.sales_order_id.as_str())
            .collect();
        assert_eq!(orders, vec!["SO-1", "SO-2"]);
        assert_eq!(
            reloaded.get(&AnnotationKey::new("SO-2", "IT-1")).unwrap().reason,
            "b"
        );
    }

    #[test]
    fn snapshot_captures_stock_status_under_policy() {
        let line = OrderLine {
            sales_order_id: "SO-1".into(),
            item_id: "IT-1".into(),
            description: "Widget".into(),
            customer_name: "Acme".into(),
            quantity_on_hand: dec!(2),
            quantity_outstanding: Some(dec!(10)),
            outstanding_amount: dec!(450),
            manufacturing_lead: "Lead A".into(),
            requested_delivery_date: None,
        };

        let r = AnnotationRecord::snapshot(
            &line,
            BackorderPolicy::ShortageAware,
            "Quality check pending",
            Some("batch 7".into()),
            at(9),
        );
        assert_eq!(r.stock_status, StockCategory::PartialShortage);
        assert_eq!(r.customer_name, "Acme");
        assert_eq!(r.outstanding_amount, dec!(450));
        assert_eq!(r.comments.as_deref(), Some("batch 7"));
    }
}
