use backorder_core::error::BackorderError;
use std::path::PathBuf;

use crate::commands::{load_report, FilterArgs};
use crate::output;

pub fn run(
    input_file: PathBuf,
    filters: &FilterArgs,
    output_format: &str,
) -> Result<(), BackorderError> {
    let (report, _) = load_report(&input_file, filters)?;

    match output_format {
        "json" => output::json::print(&report)?,
        _ => output::table::print_summary(&report),
    }

    Ok(())
}
