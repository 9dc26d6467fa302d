use backorder_core::error::BackorderError;
use backorder_core::export::detail_rows;
use std::path::PathBuf;

use crate::commands::{load_report, FilterArgs};
use crate::output;

pub fn run(
    input_file: PathBuf,
    filters: &FilterArgs,
    output_format: &str,
) -> Result<(), BackorderError> {
    let (report, options) = load_report(&input_file, filters)?;

    match output_format {
        "json" => output::json::print(&detail_rows(&report.lines, options.policy))?,
        _ => output::table::print_detail(&report),
    }

    Ok(())
}
