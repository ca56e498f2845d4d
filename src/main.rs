//! ShopMetrics: e-commerce order analytics CLI
//!
//! This is the main entrypoint that orchestrates loading the two record
//! stores, applying the filter selection, recomputing the derived views,
//! and rendering the console report and charts.

use anyhow::{Context, Result};
use clap::Parser;
use shopmetrics::{
    aggregate, filter, rfm, viz, Args, CategoryFilter, FilterSelection,
};
use std::time::Instant;

/// How many customers each RFM ranking shows.
const RFM_TOP_N: usize = 5;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("ShopMetrics - E-Commerce Order Analytics");
        println!("========================================\n");
    }

    run_pipeline(&args)
}

/// Run the full load -> filter -> aggregate -> render pipeline once.
fn run_pipeline(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Load the record stores
    if args.verbose {
        println!("Step 1: Loading record stores");
        println!("  Orders file: {}", args.orders);
        println!("  RFM file: {}", args.rfm);
    }

    let load_start = Instant::now();
    let order_store = shopmetrics::load_orders(&args.orders)?;
    let rfm_store = shopmetrics::load_rfm(&args.rfm)?;
    let load_time = load_start.elapsed();

    println!(
        "✓ Data loaded: {} order lines, {} RFM customers",
        order_store.len(),
        rfm_store.len()
    );
    if args.verbose {
        println!("  Loading time: {:.2}s", load_time.as_secs_f64());
        println!("  Categories available: {}", order_store.categories().len());
    }

    // Step 2: Resolve the filter selection (invalid ranges are rejected
    // here; the pipeline below assumes a valid one)
    let span = order_store
        .date_span()
        .context("order store has no records")?;
    let selection = FilterSelection {
        range: args.parse_range(span)?,
        category: args.category_filter(),
    };

    if args.verbose {
        println!("\nStep 2: Applying filters");
        println!(
            "  Period: {} to {}",
            selection.range.start, selection.range.end
        );
        match &selection.category {
            CategoryFilter::All => println!("  Category: All categories"),
            CategoryFilter::Only(name) => println!("  Category: {}", name),
        }
    }

    let subset = filter::filter_orders(&order_store, selection.range, &selection.category);
    let rfm_subset = filter::filter_rfm(&rfm_store, &order_store, &selection.category);

    println!(
        "✓ Filter applied: {} order lines, {} RFM customers match",
        subset.len(),
        rfm_subset.len()
    );

    // Step 3: Recompute the derived views
    if args.verbose {
        println!("\nStep 3: Computing derived views");
    }

    let views_start = Instant::now();
    let daily = aggregate::daily_orders(&subset);
    let categories = aggregate::top_categories(&subset);
    let products = aggregate::top_products(&subset);
    let states = aggregate::customers_by_state(&subset);

    let summary = rfm::summarize(&rfm_subset);
    let by_recency = rfm::top_by_recency(&rfm_subset, RFM_TOP_N);
    let by_frequency = rfm::top_by_frequency(&rfm_subset, RFM_TOP_N);
    let by_monetary = rfm::top_by_monetary(&rfm_subset, RFM_TOP_N);
    let views_time = views_start.elapsed();

    if args.verbose {
        println!("  Computation time: {:.2}s", views_time.as_secs_f64());
    }

    // Step 4: Console report
    viz::print_dashboard_report(&daily, &categories, &products, &states, args.top);
    viz::print_rfm_report(summary.as_ref(), &by_recency, &by_frequency, &by_monetary);

    // Step 5: Charts
    if !args.no_charts {
        if args.verbose {
            println!("\nStep 4: Rendering charts");
            println!("  Output base path: {}", args.output);
        }
        viz::render_dashboard(
            &daily,
            &categories,
            &products,
            &states,
            &by_recency,
            &by_frequency,
            &by_monetary,
            &args.output,
            args.top,
        )?;
    }

    let total_time = start_time.elapsed();
    println!("\n=== Done ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}
