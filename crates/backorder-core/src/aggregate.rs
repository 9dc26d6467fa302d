use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::classify::category_of;
use crate::model::{BackorderPolicy, OrderLine, StockCategory};

/// Aggregate over all lines sharing a customer name within one row-set.
/// Recomputed whenever the underlying row-set changes; never persisted
/// independently of its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRollup {
    pub customer_name: String,
    pub total_outstanding: Decimal,
    pub item_count: usize,
    pub back_order_item_count: usize,
    pub in_stock_item_count: usize,
    pub back_order_value: Decimal,
    pub in_stock_value: Decimal,
    /// back_order_value / total_outstanding as a percentage, one decimal
    /// place; 0 when the total is 0.
    pub back_order_pct: Decimal,
    pub in_stock_pct: Decimal,
    pub manufacturing_leads: BTreeSet<String>,
}

/// Rollup over an entire row-set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalRollup {
    pub total_outstanding: Decimal,
    pub item_count: usize,
    pub back_order_item_count: usize,
    pub back_order_value: Decimal,
    pub in_stock_value: Decimal,
    pub back_order_pct: Decimal,
}

/// One rollup per distinct customer in the row-set, sorted by total
/// outstanding descending (customer name breaks ties).
///
/// "Back order" here follows the classifier's BackOrder view: full back
/// orders plus partial shortages. "In stock" is the fulfillable remainder,
/// so the two value columns always sum to the customer total.
pub fn customer_rollups(lines: &[OrderLine], policy: BackorderPolicy) -> Vec<CustomerRollup> {
    let mut by_customer: BTreeMap<&str, Vec<&OrderLine>> = BTreeMap::new();
    for line in lines {
        by_customer
            .entry(line.customer_name.as_str())
            .or_default()
            .push(line);
    }

    let mut rollups: Vec<CustomerRollup> = by_customer
        .into_iter()
        .map(|(customer, group)| rollup_group(customer, &group, policy))
        .collect();

    rollups.sort_by(|a, b| {
        b.total_outstanding
            .cmp(&a.total_outstanding)
            .then_with(|| a.customer_name.cmp(&b.customer_name))
    });
    rollups
}

fn rollup_group(customer: &str, group: &[&OrderLine], policy: BackorderPolicy) -> CustomerRollup {
    let mut total = Decimal::ZERO;
    let mut back_order_value = Decimal::ZERO;
    let mut in_stock_value = Decimal::ZERO;
    let mut back_order_items = 0usize;
    let mut in_stock_items = 0usize;
    let mut leads = BTreeSet::new();

    for line in group {
        total += line.outstanding_amount;
        leads.insert(line.manufacturing_lead.clone());
        match category_of(line, policy) {
            StockCategory::Fulfillable => {
                in_stock_items += 1;
                in_stock_value += line.outstanding_amount;
            }
            StockCategory::FullBackOrder | StockCategory::PartialShortage => {
                back_order_items += 1;
                back_order_value += line.outstanding_amount;
            }
        }
    }

    CustomerRollup {
        customer_name: customer.to_string(),
        total_outstanding: total,
        item_count: group.len(),
        back_order_item_count: back_order_items,
        in_stock_item_count: in_stock_items,
        back_order_value,
        in_stock_value,
        back_order_pct: pct(back_order_value, total),
        in_stock_pct: pct(in_stock_value, total),
        manufacturing_leads: leads,
    }
}

/// Rollup over the whole row-set. Zero-row input produces all-zero sums.
pub fn global_rollup(lines: &[OrderLine], policy: BackorderPolicy) -> GlobalRollup {
    let mut total = Decimal::ZERO;
    let mut back_order_value = Decimal::ZERO;
    let mut in_stock_value = Decimal::ZERO;
    let mut back_order_items = 0usize;

    for line in lines {
        total += line.outstanding_amount;
        match category_of(line, policy) {
            StockCategory::Fulfillable => in_stock_value += line.outstanding_amount,
            StockCategory::FullBackOrder | StockCategory::PartialShortage => {
                back_order_items += 1;
                back_order_value += line.outstanding_amount;
            }
        }
    }

    GlobalRollup {
        total_outstanding: total,
        item_count: lines.len(),
        back_order_item_count: back_order_items,
        back_order_value,
        in_stock_value,
        back_order_pct: pct(back_order_value, total),
    }
}

fn pct(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        Decimal::ZERO
    } else {
        (part * Decimal::ONE_HUNDRED / total).round_dp(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(customer: &str, qoh: Decimal, amount: Decimal, lead: &str) -> OrderLine {
        OrderLine {
            sales_order_id: "SO-1".into(),
            item_id: "IT-1".into(),
            description: String::new(),
            customer_name: customer.into(),
            quantity_on_hand: qoh,
            quantity_outstanding: None,
            outstanding_amount: amount,
            manufacturing_lead: lead.into(),
            requested_delivery_date: None,
        }
    }

    #[test]
    fn rollups_split_values_by_stock_status() {
        let lines = vec![
            line("Acme", dec!(0), dec!(100.25), "Lead A"),
            line("Acme", dec!(3), dec!(899.75), "Lead B"),
        ];

        let rollups = customer_rollups(&lines, BackorderPolicy::Strict);
        assert_eq!(rollups.len(), 1);
        let acme = &rollups[0];
        assert_eq!(acme.total_outstanding, dec!(1000.00));
        assert_eq!(acme.back_order_value, dec!(100.25));
        assert_eq!(acme.in_stock_value, dec!(899.75));
        assert_eq!(acme.back_order_item_count, 1);
        assert_eq!(acme.in_stock_item_count, 1);
        assert_eq!(acme.back_order_pct, dec!(10.0));
        assert_eq!(acme.in_stock_pct, dec!(90.0));
        assert!(acme.manufacturing_leads.contains("Lead A"));
        assert!(acme.manufacturing_leads.contains("Lead B"));
    }

    #[test]
    fn rollups_sorted_by_total_descending() {
        let lines = vec![
            line("Small", dec!(1), dec!(50), "L"),
            line("Big", dec!(1), dec!(5000), "L"),
            line("Mid", dec!(1), dec!(500), "L"),
        ];
        let rollups = customer_rollups(&lines, BackorderPolicy::Strict);
        let names: Vec<&str> = rollups.iter().map(|r| r.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Big", "Mid", "Small"]);
    }

    #[test]
    fn equal_totals_break_ties_by_name() {
        let lines = vec![
            line("Zeta", dec!(1), dec!(100), "L"),
            line("Alpha", dec!(1), dec!(100), "L"),
        ];
        let rollups = customer_rollups(&lines, BackorderPolicy::Strict);
        assert_eq!(rollups[0].customer_name, "Alpha");
        assert_eq!(rollups[1].customer_name, "Zeta");
    }

    #[test]
    fn partial_shortage_counts_as_back_order_value() {
        let mut short = line("Acme", dec!(2), dec!(400), "L");
        short.quantity_outstanding = Some(dec!(10));
        let full = line("Acme", dec!(5), dec!(600), "L");

        let rollups = customer_rollups(&[short, full], BackorderPolicy::ShortageAware);
        assert_eq!(rollups[0].back_order_value, dec!(400));
        assert_eq!(rollups[0].in_stock_value, dec!(600));
    }

    #[test]
    fn zero_total_reports_zero_percentages() {
        let lines = vec![line("Acme", dec!(0), dec!(0), "L")];
        let rollups = customer_rollups(&lines, BackorderPolicy::Strict);
        assert_eq!(rollups[0].back_order_pct, Decimal::ZERO);
        assert_eq!(rollups[0].in_stock_pct, Decimal::ZERO);
    }

    #[test]
    fn empty_input_gives_zero_global_rollup() {
        let g = global_rollup(&[], BackorderPolicy::ShortageAware);
        assert_eq!(g.total_outstanding, Decimal::ZERO);
        assert_eq!(g.item_count, 0);
        assert_eq!(g.back_order_pct, Decimal::ZERO);
    }

    #[test]
    fn global_total_matches_value_split() {
        let lines = vec![
            line("A", dec!(0), dec!(10.10), "L"),
            line("B", dec!(1), dec!(20.20), "L"),
            line("C", dec!(0), dec!(30.30), "L"),
        ];
        let g = global_rollup(&lines, BackorderPolicy::Strict);
        assert_eq!(g.total_outstanding, dec!(60.60));
        assert_eq!(g.back_order_value + g.in_stock_value, g.total_outstanding);
        assert_eq!(g.back_order_item_count, 2);
    }
}
