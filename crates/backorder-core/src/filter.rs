use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::classify::category_of;
use crate::model::{BackorderPolicy, OrderLine, StockCategory};

/// Allowed range for the future-delivery horizon, in weeks. Values outside
/// the range are clamped rather than rejected; filtering is total.
pub const HORIZON_WEEKS_MIN: i64 = 1;
pub const HORIZON_WEEKS_MAX: i64 = 12;
pub const HORIZON_WEEKS_DEFAULT: i64 = 4;

/// Stock-status dimension of a filter. One canonical option set; the UI
/// variants of the original tool all map onto this enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatusFilter {
    #[default]
    All,
    /// Full back order or partial shortage.
    BackOrder,
    FullBackOrder,
    PartialShortage,
    Fulfillable,
    /// Delivery date present and at least the horizon away from today.
    FutureDelivery,
}

impl StockStatusFilter {
    pub fn from_str_loose(s: &str) -> Option<StockStatusFilter> {
        let lower = s.trim().to_lowercase().replace(['-', '_'], " ");
        match lower.as_str() {
            "all" => Some(StockStatusFilter::All),
            "back order" | "backorder" => Some(StockStatusFilter::BackOrder),
            "full back order" | "full backorder" => Some(StockStatusFilter::FullBackOrder),
            "partial shortage" | "partial" => Some(StockStatusFilter::PartialShortage),
            "fulfillable" | "in stock" | "instock" => Some(StockStatusFilter::Fulfillable),
            "future delivery" | "future" => Some(StockStatusFilter::FutureDelivery),
            _ => None,
        }
    }
}

/// A conjunction of independent predicates; every dimension is optional
/// and absence means pass-all.
///
/// The customer-total range is applied after the row-level predicates, to
/// customer totals recomputed over the already-reduced set. This ordering
/// is part of the contract: combined with the amount or category filters,
/// reversing it changes the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Row passes if its manufacturing lead is a member; empty = pass-all.
    pub manufacturing_leads: BTreeSet<String>,
    /// Inclusive bounds on the line's outstanding amount.
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub stock_status: StockStatusFilter,
    /// Inclusive bounds on the customer's total outstanding within the
    /// row-reduced set.
    pub min_customer_total: Option<Decimal>,
    pub max_customer_total: Option<Decimal>,
    pub future_horizon_weeks: i64,
}

impl Default for FilterSpec {
    fn default() -> FilterSpec {
        FilterSpec::new()
    }
}

impl FilterSpec {
    pub fn new() -> FilterSpec {
        FilterSpec {
            manufacturing_leads: BTreeSet::new(),
            min_amount: None,
            max_amount: None,
            stock_status: StockStatusFilter::All,
            min_customer_total: None,
            max_customer_total: None,
            future_horizon_weeks: HORIZON_WEEKS_DEFAULT,
        }
    }

    /// Apply the specification to a row-set, producing a new subset.
    /// Non-mutating and idempotent; empty input yields empty output.
    pub fn apply(
        &self,
        lines: &[OrderLine],
        policy: BackorderPolicy,
        today: NaiveDate,
    ) -> Vec<OrderLine> {
        // Pass 1: row-level predicates
        let reduced: Vec<OrderLine> = lines
            .iter()
            .filter(|line| self.row_passes(line, policy, today))
            .cloned()
            .collect();

        if self.min_customer_total.is_none() && self.max_customer_total.is_none() {
            return reduced;
        }

        // Pass 2: customer totals over the reduced set, then the range
        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        for line in &reduced {
            *totals.entry(line.customer_name.as_str()).or_default() += line.outstanding_amount;
        }

        let keep: BTreeSet<String> = totals
            .iter()
            .filter(|(_, total)| {
                self.min_customer_total.map_or(true, |min| **total >= min)
                    && self.max_customer_total.map_or(true, |max| **total <= max)
            })
            .map(|(customer, _)| (*customer).to_string())
            .collect();

        reduced
            .into_iter()
            .filter(|line| keep.contains(line.customer_name.as_str()))
            .collect()
    }

    fn row_passes(&self, line: &OrderLine, policy: BackorderPolicy, today: NaiveDate) -> bool {
        if !self.manufacturing_leads.is_empty()
            && !self.manufacturing_leads.contains(&line.manufacturing_lead)
        {
            return false;
        }

        if let Some(min) = self.min_amount {
            if line.outstanding_amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if line.outstanding_amount > max {
                return false;
            }
        }

        self.status_passes(line, policy, today)
    }

    fn status_passes(&self, line: &OrderLine, policy: BackorderPolicy, today: NaiveDate) -> bool {
        match self.stock_status {
            StockStatusFilter::All => true,
            StockStatusFilter::BackOrder => {
                category_of(line, policy) != StockCategory::Fulfillable
            }
            StockStatusFilter::FullBackOrder => {
                category_of(line, policy) == StockCategory::FullBackOrder
            }
            StockStatusFilter::PartialShortage => {
                category_of(line, policy) == StockCategory::PartialShortage
            }
            StockStatusFilter::Fulfillable => {
                category_of(line, policy) == StockCategory::Fulfillable
            }
            StockStatusFilter::FutureDelivery => match line.requested_delivery_date {
                Some(date) => date >= today + Duration::weeks(self.effective_horizon_weeks()),
                // Missing delivery date never passes FutureDelivery
                None => false,
            },
        }
    }

    pub fn effective_horizon_weeks(&self) -> i64 {
        self.future_horizon_weeks
            .clamp(HORIZON_WEEKS_MIN, HORIZON_WEEKS_MAX)
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

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn empty_spec_passes_everything() {
        let lines = vec![
            line("A", dec!(0), dec!(10), "L1"),
            line("B", dec!(1), dec!(20), "L2"),
        ];
        let out = FilterSpec::new().apply(&lines, BackorderPolicy::Strict, today());
        assert_eq!(out, lines);
    }

    #[test]
    fn lead_membership_filters_rows() {
        let lines = vec![
            line("A", dec!(1), dec!(10), "L1"),
            line("B", dec!(1), dec!(20), "L2"),
        ];
        let mut spec = FilterSpec::new();
        spec.manufacturing_leads.insert("L2".into());
        let out = spec.apply(&lines, BackorderPolicy::Strict, today());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].customer_name, "B");
    }

    #[test]
    fn amount_range_is_inclusive() {
        let lines = vec![
            line("A", dec!(1), dec!(99.99), "L"),
            line("B", dec!(1), dec!(100), "L"),
            line("C", dec!(1), dec!(500), "L"),
            line("D", dec!(1), dec!(500.01), "L"),
        ];
        let spec = FilterSpec {
            min_amount: Some(dec!(100)),
            max_amount: Some(dec!(500)),
            ..FilterSpec::new()
        };
        let out = spec.apply(&lines, BackorderPolicy::Strict, today());
        let names: Vec<&str> = out.iter().map(|l| l.customer_name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn stock_status_back_order_includes_partial_shortage() {
        let mut partial = line("A", dec!(2), dec!(10), "L");
        partial.quantity_outstanding = Some(dec!(5));
        let lines = vec![
            partial,
            line("B", dec!(0), dec!(20), "L"),
            line("C", dec!(3), dec!(30), "L"),
        ];
        let spec = FilterSpec {
            stock_status: StockStatusFilter::BackOrder,
            ..FilterSpec::new()
        };
        let out = spec.apply(&lines, BackorderPolicy::ShortageAware, today());
        let names: Vec<&str> = out.iter().map(|l| l.customer_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn future_delivery_requires_date_past_horizon() {
        let mut near = line("Near", dec!(1), dec!(10), "L");
        near.requested_delivery_date = Some(today() + Duration::weeks(2));
        let mut far = line("Far", dec!(1), dec!(20), "L");
        far.requested_delivery_date = Some(today() + Duration::weeks(8));
        let dateless = line("None", dec!(1), dec!(30), "L");

        let spec = FilterSpec {
            stock_status: StockStatusFilter::FutureDelivery,
            future_horizon_weeks: 4,
            ..FilterSpec::new()
        };
        let out = spec.apply(
            &[near, far, dateless],
            BackorderPolicy::Strict,
            today(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].customer_name, "Far");
    }

    #[test]
    fn future_delivery_boundary_is_inclusive() {
        let mut exact = line("Exact", dec!(1), dec!(10), "L");
        exact.requested_delivery_date = Some(today() + Duration::weeks(4));
        let spec = FilterSpec {
            stock_status: StockStatusFilter::FutureDelivery,
            future_horizon_weeks: 4,
            ..FilterSpec::new()
        };
        let out = spec.apply(&[exact], BackorderPolicy::Strict, today());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn horizon_clamped_to_valid_range() {
        let spec = FilterSpec {
            future_horizon_weeks: 40,
            ..FilterSpec::new()
        };
        assert_eq!(spec.effective_horizon_weeks(), HORIZON_WEEKS_MAX);
        let spec = FilterSpec {
            future_horizon_weeks: 0,
            ..FilterSpec::new()
        };
        assert_eq!(spec.effective_horizon_weeks(), HORIZON_WEEKS_MIN);
    }

    #[test]
    fn customer_totals_computed_after_row_reduction() {
        // Customer A: $50 and $5,000 lines. With amount >= 100 first, A's
        // reduced total is $5,000 and falls inside [4000, 6000] even though
        // the raw total ($5,050) does not matter.
        let lines = vec![
            line("A", dec!(1), dec!(50), "L"),
            line("A", dec!(1), dec!(5000), "L"),
            line("B", dec!(1), dec!(200), "L"),
        ];
        let spec = FilterSpec {
            min_amount: Some(dec!(100)),
            min_customer_total: Some(dec!(4000)),
            max_customer_total: Some(dec!(6000)),
            ..FilterSpec::new()
        };
        let out = spec.apply(&lines, BackorderPolicy::Strict, today());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].customer_name, "A");
        assert_eq!(out[0].outstanding_amount, dec!(5000));
    }

    #[test]
    fn filtering_is_idempotent() {
        let lines = vec![
            line("A", dec!(0), dec!(50), "L1"),
            line("A", dec!(1), dec!(5000), "L1"),
            line("B", dec!(0), dec!(200), "L2"),
            line("C", dec!(2), dec!(900), "L1"),
        ];
        let spec = FilterSpec {
            min_amount: Some(dec!(100)),
            min_customer_total: Some(dec!(500)),
            stock_status: StockStatusFilter::Fulfillable,
            ..FilterSpec::new()
        };
        let once = spec.apply(&lines, BackorderPolicy::Strict, today());
        let twice = spec.apply(&once, BackorderPolicy::Strict, today());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let spec = FilterSpec {
            min_customer_total: Some(dec!(1)),
            ..FilterSpec::new()
        };
        assert!(spec.apply(&[], BackorderPolicy::Strict, today()).is_empty());
    }

    #[test]
    fn status_filter_from_str_loose() {
        assert_eq!(
            StockStatusFilter::from_str_loose("Back Order"),
            Some(StockStatusFilter::BackOrder)
        );
        assert_eq!(
            StockStatusFilter::from_str_loose("future-delivery"),
            Some(StockStatusFilter::FutureDelivery)
        );
        assert_eq!(StockStatusFilter::from_str_loose("bogus"), None);
    }
}
