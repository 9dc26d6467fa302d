mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::FilterArgs;

#[derive(Parser)]
#[command(
    name = "backorder",
    version,
    about = "Back-order reporting for sales-order line items"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Global and per-customer rollups over the filtered row-set
    Summary {
        /// Path to xlsx, CSV or pre-parsed JSON order file
        input_file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Per-customer line listing with derived stock status
    Detail {
        /// Path to xlsx, CSV or pre-parsed JSON order file
        input_file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Write detail/summary/annotation reports as CSV files
    Export {
        /// Path to xlsx, CSV or pre-parsed JSON order file
        input_file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Write the detailed line report to this CSV file
        #[arg(long, value_name = "FILE")]
        detail: Option<PathBuf>,

        /// Write the customer summary to this CSV file
        #[arg(long, value_name = "FILE")]
        summary: Option<PathBuf>,

        /// Annotation store (JSON) recorded with `backorder annotate`
        #[arg(long, value_name = "FILE")]
        annotations: Option<PathBuf>,

        /// Write the annotation report to this CSV file
        #[arg(long, value_name = "FILE", requires = "annotations")]
        annotations_csv: Option<PathBuf>,
    },
    /// Record a reason/comment for one (sales order, item) pair
    Annotate {
        /// Path to xlsx, CSV or pre-parsed JSON order file
        input_file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Annotation store (JSON) to create or update
        #[arg(long, value_name = "FILE")]
        store: PathBuf,

        /// Sales order number
        #[arg(long)]
        order: String,

        /// Item number
        #[arg(long)]
        item: String,

        /// Reason for not shipping
        #[arg(long)]
        reason: String,

        /// Free-form comments
        #[arg(long)]
        comments: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Summary {
            input_file,
            filters,
            output,
        } => commands::summary::run(input_file, &filters, &output),
        Commands::Detail {
            input_file,
            filters,
            output,
        } => commands::detail::run(input_file, &filters, &output),
        Commands::Export {
            input_file,
            filters,
            detail,
            summary,
            annotations,
            annotations_csv,
        } => commands::export::run(
            input_file,
            &filters,
            detail,
            summary,
            annotations,
            annotations_csv,
        ),
        Commands::Annotate {
            input_file,
            filters,
            store,
            order,
            item,
            reason,
            comments,
        } => commands::annotate::run(input_file, &filters, store, order, item, reason, comments),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
