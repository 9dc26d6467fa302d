use serde::{Deserialize, Serialize};

use crate::model::{BackorderPolicy, OrderLine, StockCategory};

/// Three-way partition of a row-set under one policy. The buckets are
/// disjoint and their union is the input set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockPartition {
    pub policy: BackorderPolicy,
    /// QOH = 0: nothing can ship.
    pub full_back_order: Vec<OrderLine>,
    /// 0 < QOH < outstanding quantity: ships short. Always empty under
    /// the Strict policy.
    pub partial_shortage: Vec<OrderLine>,
    /// The line can ship in full.
    pub fulfillable: Vec<OrderLine>,
}

impl StockPartition {
    /// Lines that cannot currently be fully satisfied:
    /// full back order plus partial shortage.
    pub fn back_order(&self) -> impl Iterator<Item = &OrderLine> {
        self.full_back_order.iter().chain(self.partial_shortage.iter())
    }

    pub fn back_order_count(&self) -> usize {
        self.full_back_order.len() + self.partial_shortage.len()
    }

    pub fn total_count(&self) -> usize {
        self.full_back_order.len() + self.partial_shortage.len() + self.fulfillable.len()
    }

    pub fn bucket(&self, category: StockCategory) -> &[OrderLine] {
        match category {
            StockCategory::FullBackOrder => &self.full_back_order,
            StockCategory::PartialShortage => &self.partial_shortage,
            StockCategory::Fulfillable => &self.fulfillable,
        }
    }
}
