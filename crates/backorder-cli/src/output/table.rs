use backorder_core::classify::category_of;
use backorder_core::BackorderReport;

pub fn print_summary(report: &BackorderReport) {
    let g = &report.global;
    println!("=== Summary ({} policy) ===\n", report.partition.policy);
    println!(
        "  Total outstanding: ${}  ({} items across {} customers)",
        g.total_outstanding,
        g.item_count,
        report.customers.len()
    );
    println!(
        "  Back order: ${} ({} items, {}% of value)",
        g.back_order_value, g.back_order_item_count, g.back_order_pct
    );
    println!("  In stock:   ${}", g.in_stock_value);
    if !report.dropped.is_empty() {
        println!("  {} row(s) dropped during normalization", report.dropped.len());
    }
    println!();

    if report.customers.is_empty() {
        println!("  No customers match the selected filters.");
        return;
    }

    let name_width = report
        .customers
        .iter()
        .map(|c| c.customer_name.len())
        .max()
        .unwrap_or(10);

    println!(
        "  {:<name_width$}  {:>14}  {:>6}  {:>9}  {:>14}  {:>14}",
        "Customer", "Total $", "Items", "BO Items", "BO $", "In-Stock $"
    );
    for c in &report.customers {
        println!(
            "  {:<name_width$}  {:>14}  {:>6}  {:>9}  {:>14}  {:>14}",
            c.customer_name,
            c.total_outstanding,
            c.item_count,
            c.back_order_item_count,
            c.back_order_value,
            c.in_stock_value
        );
    }
}

pub fn print_detail(report: &BackorderReport) {
    let policy = report.partition.policy;

    if report.customers.is_empty() {
        println!("No customers match the selected filters.");
        return;
    }

    for (i, customer) in report.customers.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "=== {} | ${} | {} items ===\n",
            customer.customer_name, customer.total_outstanding, customer.item_count
        );
        println!(
            "  Back order ${} ({}%), in stock ${} ({}%)",
            customer.back_order_value,
            customer.back_order_pct,
            customer.in_stock_value,
            customer.in_stock_pct
        );
        println!(
            "  Manufacturing leads: {}\n",
            customer
                .manufacturing_leads
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );

        for line in report
            .lines
            .iter()
            .filter(|l| l.customer_name == customer.customer_name)
        {
            let delivery = line
                .requested_delivery_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into());
            println!(
                "  [{:>16}] {} {}  ${}  QOH {}  lead {}  delivery {}",
                category_of(line, policy).to_string(),
                line.sales_order_id,
                line.item_id,
                line.outstanding_amount,
                line.quantity_on_hand,
                line.manufacturing_lead,
                delivery
            );
            if !line.description.is_empty() {
                println!("      {}", truncate(&line.description, 80));
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
