use backorder_core::annotations::{AnnotationEntry, AnnotationStore};
use backorder_core::error::BackorderError;
use backorder_core::export::{annotation_rows, detail_rows, summary_rows};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::commands::{load_report, FilterArgs};

pub fn run(
    input_file: PathBuf,
    filters: &FilterArgs,
    detail: Option<PathBuf>,
    summary: Option<PathBuf>,
    annotations: Option<PathBuf>,
    annotations_csv: Option<PathBuf>,
) -> Result<(), BackorderError> {
    if detail.is_none() && summary.is_none() && annotations_csv.is_none() {
        return Err(BackorderError::ParseError(
            "nothing to export: pass --detail, --summary and/or --annotations-csv".into(),
        ));
    }

    let (report, options) = load_report(&input_file, filters)?;

    if let Some(path) = detail {
        let rows = detail_rows(&report.lines, options.policy);
        write_csv(&path, &rows)?;
        eprintln!("Wrote {} line(s) to {}", rows.len(), path.display());
    }

    if let Some(path) = summary {
        let rows = summary_rows(&report.customers);
        write_csv(&path, &rows)?;
        eprintln!("Wrote {} customer(s) to {}", rows.len(), path.display());
    }

    if let Some(path) = annotations_csv {
        let store_path = annotations.ok_or_else(|| {
            BackorderError::ParseError("--annotations is required with --annotations-csv".into())
        })?;
        let store = load_store(&store_path)?;
        let rows = annotation_rows(&store);
        write_csv(&path, &rows)?;
        eprintln!("Wrote {} annotation(s) to {}", rows.len(), path.display());
    }

    Ok(())
}

pub(crate) fn load_store(path: &Path) -> Result<AnnotationStore, BackorderError> {
    let bytes = std::fs::read(path)?;
    let entries: Vec<AnnotationEntry> = serde_json::from_slice(&bytes)?;
    Ok(AnnotationStore::from_entries(entries))
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), BackorderError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
