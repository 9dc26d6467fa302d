pub mod annotate;
pub mod detail;
pub mod export;
pub mod summary;

use backorder_core::error::BackorderError;
use backorder_core::filter::{FilterSpec, StockStatusFilter, HORIZON_WEEKS_DEFAULT};
use backorder_core::ingest::reader;
use backorder_core::model::BackorderPolicy;
use backorder_core::{build_report, BackorderReport, ReportOptions};
use clap::Args;
use rust_decimal::Decimal;
use std::path::Path;

/// Filter and policy flags shared by every subcommand.
#[derive(Args, Clone, Debug)]
pub struct FilterArgs {
    /// Back-order policy: strict or shortage-aware
    #[arg(long, default_value = "strict")]
    pub policy: String,

    /// Manufacturing lead to keep (repeatable; none = all)
    #[arg(long = "lead", value_name = "NAME")]
    pub leads: Vec<String>,

    /// Minimum line outstanding amount (inclusive)
    #[arg(long, value_name = "AMOUNT")]
    pub min_amount: Option<Decimal>,

    /// Maximum line outstanding amount (inclusive)
    #[arg(long, value_name = "AMOUNT")]
    pub max_amount: Option<Decimal>,

    /// Stock status filter (all, back-order, full-back-order, partial-shortage, fulfillable, future-delivery)
    #[arg(long, default_value = "all")]
    pub status: String,

    /// Minimum customer total outstanding (inclusive)
    #[arg(long, value_name = "AMOUNT")]
    pub min_customer_total: Option<Decimal>,

    /// Maximum customer total outstanding (inclusive)
    #[arg(long, value_name = "AMOUNT")]
    pub max_customer_total: Option<Decimal>,

    /// Future-delivery horizon in weeks (1-12)
    #[arg(long, default_value_t = HORIZON_WEEKS_DEFAULT)]
    pub horizon_weeks: i64,
}

impl FilterArgs {
    pub fn to_options(&self) -> Result<ReportOptions, BackorderError> {
        let policy = BackorderPolicy::from_str_loose(&self.policy).ok_or_else(|| {
            BackorderError::ParseError(format!(
                "unknown policy '{}' (expected strict or shortage-aware)",
                self.policy
            ))
        })?;

        let stock_status = StockStatusFilter::from_str_loose(&self.status).ok_or_else(|| {
            BackorderError::ParseError(format!("unknown stock status '{}'", self.status))
        })?;

        let filter = FilterSpec {
            manufacturing_leads: self.leads.iter().cloned().collect(),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            stock_status,
            min_customer_total: self.min_customer_total,
            max_customer_total: self.max_customer_total,
            future_horizon_weeks: self.horizon_weeks,
        };

        let mut options = ReportOptions::new(chrono::Local::now().date_naive());
        options.policy = policy;
        options.filter = filter;
        Ok(options)
    }
}

/// Read the input file and run the full reporting pipeline.
pub fn load_report(
    input_file: &Path,
    filters: &FilterArgs,
) -> Result<(BackorderReport, ReportOptions), BackorderError> {
    let options = filters.to_options()?;
    let rows = reader::read_table(input_file)?;
    let report = build_report(&rows, &options)?;
    Ok((report, options))
}
