//! Chart rendering and the console report, using Plotters
//!
//! Everything here is presentation: it consumes the derived views as-is and
//! never re-aggregates. Chart siblings derive their file names from the
//! base output path (`dashboard.png` -> `dashboard_categories.png`, ...).

use plotters::prelude::*;

use crate::aggregate::{CategoryRow, DailyOrdersRow, ProductRow, StateRow};
use crate::data::RfmRecord;
use crate::rfm::RfmSummary;

const LINE_COLOR: RGBColor = RGBColor(3, 169, 244);
const BAR_COLORS: [RGBColor; 4] = [
    RGBColor(76, 175, 80),
    RGBColor(255, 152, 0),
    RGBColor(33, 150, 243),
    RGBColor(156, 39, 176),
];

/// Format a value as a US-style currency string, e.g. `$1,234.56`.
pub fn format_currency(value: f64) -> String {
    let cents = format!("{:.2}", value.abs());
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let mut grouped = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, fraction)
}

/// Print the metric summary and ranked tables to the console.
pub fn print_dashboard_report(
    daily: &[DailyOrdersRow],
    categories: &[CategoryRow],
    products: &[ProductRow],
    states: &[StateRow],
    top: usize,
) {
    let total_orders: usize = daily.iter().map(|d| d.order_count).sum();
    let total_revenue: f64 = daily.iter().map(|d| d.revenue).sum();

    println!("\n=== Daily Orders ===");
    println!("Total orders: {}", total_orders);
    println!("Total revenue: {}", format_currency(total_revenue));
    if daily.is_empty() {
        println!("(no orders in the selected period)");
    } else {
        println!("Days covered: {} ({} to {})", daily.len(), daily[0].date, daily[daily.len() - 1].date);
    }

    println!("\n=== Top Product Categories ===");
    for row in categories.iter().take(top) {
        println!(
            "  {:<40} {:>12}  ({} items)",
            row.category,
            format_currency(row.total_revenue),
            row.total_quantity
        );
    }

    println!("\n=== Top Products ===");
    for row in products.iter().take(top) {
        println!("  {:<40} {:>12}", row.product_id, format_currency(row.revenue));
    }

    println!("\n=== Customers by State ===");
    let mut ranked: Vec<&StateRow> = states.iter().collect();
    ranked.sort_by(|a, b| b.customer_count.cmp(&a.customer_count));
    for row in ranked {
        println!("  {:<4} {:>8} customers", row.state, row.customer_count);
    }
}

/// Print the RFM metric block; `None` means no customers matched.
pub fn print_rfm_report(
    summary: Option<&RfmSummary>,
    by_recency: &[RfmRecord],
    by_frequency: &[RfmRecord],
    by_monetary: &[RfmRecord],
) {
    println!("\n=== RFM Metrics ===");
    match summary {
        Some(s) => {
            println!("Average Recency:   {:.1} days", s.avg_recency);
            println!("Average Frequency: {:.2}", s.avg_frequency);
            println!("Average Monetary:  {}", format_currency(s.avg_monetary));
        }
        None => println!("Average Recency / Frequency / Monetary: n/a (no matching customers)"),
    }

    println!("\nBest customers by Recency:");
    for r in by_recency {
        println!("  {:<36} {:>5} days", r.customer_id, r.recency);
    }
    println!("Best customers by Frequency:");
    for r in by_frequency {
        println!("  {:<36} {:>5} orders", r.customer_id, r.frequency);
    }
    println!("Best customers by Monetary:");
    for r in by_monetary {
        println!("  {:<36} {:>12}", r.customer_id, format_currency(r.monetary));
    }
}

/// Line chart of order counts per day.
pub fn create_daily_orders_chart(daily: &[DailyOrdersRow], output_path: &str) -> crate::Result<()> {
    if daily.is_empty() {
        println!("Skipping daily orders chart: no data");
        return Ok(());
    }

    let max_count = daily.iter().map(|d| d.order_count).max().unwrap_or(1) as f64;

    let root = BitMapBackend::new(output_path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Orders per Day", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..(daily.len() as f64 - 1.0).max(1.0), 0f64..max_count * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Order Count")
        .axis_desc_style(("sans-serif", 15))
        .x_label_formatter(&|x| {
            let i = x.round() as usize;
            daily
                .get(i)
                .map(|row| row.date.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(LineSeries::new(
        daily
            .iter()
            .enumerate()
            .map(|(i, row)| (i as f64, row.order_count as f64)),
        &LINE_COLOR,
    ))?;

    chart.draw_series(daily.iter().enumerate().map(|(i, row)| {
        Circle::new((i as f64, row.order_count as f64), 4, LINE_COLOR.filled())
    }))?;

    root.present()?;
    println!("Daily orders chart saved to: {}", output_path);

    Ok(())
}

/// Horizontal bar chart of labeled values, largest bar at the top.
pub fn create_ranked_bar_chart(
    title: &str,
    value_desc: &str,
    labels: &[String],
    values: &[f64],
    color: RGBColor,
    output_path: &str,
) -> crate::Result<()> {
    if labels.is_empty() {
        println!("Skipping chart '{}': no data", title);
        return Ok(());
    }

    let max_value = values.iter().cloned().fold(f64::MIN, f64::max).max(1.0);
    let rows = labels.len();

    let root = BitMapBackend::new(output_path, (1000, 120 + 50 * rows as u32)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(220)
        .build_cartesian_2d(0f64..max_value * 1.1, 0f64..rows as f64)?;

    chart
        .configure_mesh()
        .x_desc(value_desc)
        .axis_desc_style(("sans-serif", 15))
        .y_labels(rows)
        .y_label_formatter(&|y| {
            // Row i is drawn between y = i and y = i + 1, top row first.
            let i = y.floor() as usize;
            labels
                .get(rows.saturating_sub(1).saturating_sub(i))
                .cloned()
                .unwrap_or_default()
        })
        .draw()?;

    for (i, &value) in values.iter().enumerate() {
        let y = (rows - 1 - i) as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, y + 0.15), (value, y + 0.85)],
            color.filled(),
        )))?;
    }

    root.present()?;
    println!("Chart saved to: {}", output_path);

    Ok(())
}

/// Three-panel chart of the top-5 customers by each RFM metric.
pub fn create_rfm_customers_chart(
    by_recency: &[RfmRecord],
    by_frequency: &[RfmRecord],
    by_monetary: &[RfmRecord],
    output_path: &str,
) -> crate::Result<()> {
    if by_recency.is_empty() {
        println!("Skipping RFM chart: no data");
        return Ok(());
    }

    let root = BitMapBackend::new(output_path, (1800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 3));

    let panel_defs: [(&str, &str, &[RfmRecord], fn(&RfmRecord) -> f64); 3] = [
        ("Top 5 by Recency", "Recency (Days)", by_recency, |r| {
            f64::from(r.recency)
        }),
        ("Top 5 by Frequency", "Frequency", by_frequency, |r| {
            f64::from(r.frequency)
        }),
        ("Top 5 by Monetary", "Monetary (USD)", by_monetary, |r| r.monetary),
    ];

    for (panel, (title, desc, rows, metric)) in panels.iter().zip(panel_defs) {
        let max_value = rows.iter().map(metric).fold(f64::MIN, f64::max).max(1.0);

        let mut chart = ChartBuilder::on(panel)
            .caption(title, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(80)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..rows.len() as f64, 0f64..max_value * 1.1)?;

        chart
            .configure_mesh()
            .y_desc(desc)
            .axis_desc_style(("sans-serif", 14))
            .x_labels(rows.len())
            .x_label_formatter(&|x| {
                let i = x.floor() as usize;
                rows.get(i)
                    .map(|r| truncate_id(&r.customer_id))
                    .unwrap_or_default()
            })
            .draw()?;

        for (i, row) in rows.iter().enumerate() {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, metric(row))],
                BAR_COLORS[i % BAR_COLORS.len()].filled(),
            )))?;
        }
    }

    root.present()?;
    println!("RFM customers chart saved to: {}", output_path);

    Ok(())
}

/// Render all dashboard charts next to `base_output_path`.
#[allow(clippy::too_many_arguments)]
pub fn render_dashboard(
    daily: &[DailyOrdersRow],
    categories: &[CategoryRow],
    products: &[ProductRow],
    states: &[StateRow],
    by_recency: &[RfmRecord],
    by_frequency: &[RfmRecord],
    by_monetary: &[RfmRecord],
    base_output_path: &str,
    top: usize,
) -> crate::Result<()> {
    create_daily_orders_chart(daily, base_output_path)?;

    let category_labels: Vec<String> =
        categories.iter().take(top).map(|c| c.category.clone()).collect();
    let category_values: Vec<f64> =
        categories.iter().take(top).map(|c| c.total_revenue).collect();
    create_ranked_bar_chart(
        "Top Categories by Revenue",
        "Revenue",
        &category_labels,
        &category_values,
        BAR_COLORS[0],
        &base_output_path.replace(".png", "_categories.png"),
    )?;

    let product_labels: Vec<String> = products
        .iter()
        .take(top)
        .map(|p| truncate_id(&p.product_id))
        .collect();
    let product_values: Vec<f64> = products.iter().take(top).map(|p| p.revenue).collect();
    create_ranked_bar_chart(
        "Top Products by Revenue",
        "Revenue",
        &product_labels,
        &product_values,
        BAR_COLORS[1],
        &base_output_path.replace(".png", "_products.png"),
    )?;

    let mut ranked_states: Vec<&StateRow> = states.iter().collect();
    ranked_states.sort_by(|a, b| b.customer_count.cmp(&a.customer_count));
    let state_labels: Vec<String> = ranked_states.iter().map(|s| s.state.clone()).collect();
    let state_values: Vec<f64> = ranked_states
        .iter()
        .map(|s| s.customer_count as f64)
        .collect();
    create_ranked_bar_chart(
        "Number of Customers by State",
        "Number of Customers",
        &state_labels,
        &state_values,
        BAR_COLORS[2],
        &base_output_path.replace(".png", "_states.png"),
    )?;

    create_rfm_customers_chart(
        by_recency,
        by_frequency,
        by_monetary,
        &base_output_path.replace(".png", "_rfm.png"),
    )?;

    Ok(())
}

/// Shorten long hash-style IDs for axis labels.
fn truncate_id(id: &str) -> String {
    if id.chars().count() > 10 {
        let prefix: String = id.chars().take(10).collect();
        format!("{}…", prefix)
    } else {
        id.to_string()
    }
}
