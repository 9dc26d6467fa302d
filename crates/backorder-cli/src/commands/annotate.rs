use backorder_core::annotations::{AnnotationKey, AnnotationRecord, AnnotationStore};
use backorder_core::error::BackorderError;
use std::path::PathBuf;

use crate::commands::{export::load_store, load_report, FilterArgs};

pub fn run(
    input_file: PathBuf,
    filters: &FilterArgs,
    store_path: PathBuf,
    order: String,
    item: String,
    reason: String,
    comments: Option<String>,
) -> Result<(), BackorderError> {
    let (report, options) = load_report(&input_file, filters)?;

    let line = report
        .lines
        .iter()
        .find(|l| l.sales_order_id == order && l.item_id == item)
        .ok_or_else(|| {
            BackorderError::ParseError(format!(
                "no order line matching sales order '{order}' and item '{item}'"
            ))
        })?;

    let mut store = if store_path.exists() {
        load_store(&store_path)?
    } else {
        AnnotationStore::new()
    };

    let key = AnnotationKey::new(order.clone(), item.clone());
    let record = AnnotationRecord::snapshot(
        line,
        options.policy,
        reason,
        comments,
        chrono::Local::now().naive_local(),
    );
    store.upsert(key, record);

    let json = serde_json::to_vec_pretty(&store.to_entries())?;
    std::fs::write(&store_path, json)?;
    eprintln!(
        "Saved reason for {order} / {item} ({} annotation(s) in {})",
        store.len(),
        store_path.display()
    );

    Ok(())
}
