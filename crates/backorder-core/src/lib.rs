pub mod aggregate;
pub mod annotations;
pub mod classify;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod model;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use aggregate::{CustomerRollup, GlobalRollup};
use classify::StockPartition;
use error::BackorderError;
use filter::FilterSpec;
use ingest::{DroppedRow, RawRow};
use model::{BackorderPolicy, OrderLine};

/// Parameters for one reporting pass. `today` is injected by the caller so
/// the whole pipeline stays a pure function of its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    pub policy: BackorderPolicy,
    pub filter: FilterSpec,
    pub today: NaiveDate,
}

impl ReportOptions {
    pub fn new(today: NaiveDate) -> ReportOptions {
        ReportOptions {
            policy: BackorderPolicy::default(),
            filter: FilterSpec::new(),
            today,
        }
    }
}

/// Everything one operator interaction needs: the filtered row-set, its
/// stock partition, per-customer and global rollups, and the rows the
/// normalizer dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackorderReport {
    pub lines: Vec<OrderLine>,
    pub partition: StockPartition,
    pub customers: Vec<CustomerRollup>,
    pub global: GlobalRollup,
    pub dropped: Vec<DroppedRow>,
}

/// Main API entry point: normalize a raw row-set, apply the filter
/// specification, and compute the stock partition and rollups.
///
/// Fails only on a schema violation (required column absent from the
/// input); every later stage is total over the normalized row-set.
pub fn build_report(
    rows: &[RawRow],
    options: &ReportOptions,
) -> Result<BackorderReport, BackorderError> {
    let normalized = ingest::normalize_rows(rows)?;

    let lines = options
        .filter
        .apply(&normalized.lines, options.policy, options.today);

    let partition = classify::partition(&lines, options.policy);
    let customers = aggregate::customer_rollups(&lines, options.policy);
    let global = aggregate::global_rollup(&lines, options.policy);

    Ok(BackorderReport {
        lines,
        partition,
        customers,
        global,
        dropped: normalized.dropped,
    })
}
