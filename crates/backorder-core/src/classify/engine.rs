use crate::classify::outcome::StockPartition;
use crate::model::{BackorderPolicy, OrderLine, StockCategory};
use rust_decimal::Decimal;

/// Classify a single line under a policy. This is the single source of
/// truth for stock status; consumers must call it rather than re-deriving
/// the comparison inline.
pub fn category_of(line: &OrderLine, policy: BackorderPolicy) -> StockCategory {
    if line.quantity_on_hand == Decimal::ZERO {
        return StockCategory::FullBackOrder;
    }

    match policy {
        BackorderPolicy::Strict => StockCategory::Fulfillable,
        BackorderPolicy::ShortageAware => match line.quantity_outstanding {
            // Equal on-hand and outstanding ships in full (>=, not >)
            Some(outstanding) if line.quantity_on_hand < outstanding => {
                StockCategory::PartialShortage
            }
            Some(_) => StockCategory::Fulfillable,
            // No outstanding quantity: Strict fallback for this row alone
            None => StockCategory::Fulfillable,
        },
    }
}

/// Partition a row-set into the three stock buckets under a policy.
/// Stateless and side-effect free, so both policies can be evaluated over
/// the same set for comparison.
pub fn partition(lines: &[OrderLine], policy: BackorderPolicy) -> StockPartition {
    let mut result = StockPartition {
        policy,
        full_back_order: Vec::new(),
        partial_shortage: Vec::new(),
        fulfillable: Vec::new(),
    };

    for line in lines {
        match category_of(line, policy) {
            StockCategory::FullBackOrder => result.full_back_order.push(line.clone()),
            StockCategory::PartialShortage => result.partial_shortage.push(line.clone()),
            StockCategory::Fulfillable => result.fulfillable.push(line.clone()),
        }
    }

    result
}
