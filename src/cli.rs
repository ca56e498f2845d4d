//! Command-line interface definitions and argument parsing

use chrono::NaiveDate;
use clap::Parser;

use crate::filter::{CategoryFilter, DateRange};

/// E-commerce order analytics: daily orders, top categories/products,
/// customers by state, and RFM customer summaries over a filtered period
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the order-line CSV file
    #[arg(long, default_value = "final_table.csv")]
    pub orders: String,

    /// Path to the per-customer RFM CSV file
    #[arg(long, default_value = "rfm_table.csv")]
    pub rfm: String,

    /// Start of the reporting period (YYYY-MM-DD, inclusive).
    /// Defaults to the earliest purchase date in the order table.
    #[arg(long)]
    pub start_date: Option<String>,

    /// End of the reporting period (YYYY-MM-DD, inclusive).
    /// Defaults to the latest purchase date in the order table.
    #[arg(long)]
    pub end_date: Option<String>,

    /// Restrict views to one product category ("All" means no filter)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Number of rows to render in the ranked bar charts
    #[arg(short, long, default_value = "10")]
    pub top: usize,

    /// Base output path for the chart PNGs; sibling charts derive their
    /// names from it (e.g. dashboard_categories.png)
    #[arg(short, long, default_value = "dashboard.png")]
    pub output: String,

    /// Skip chart rendering and only print the console report
    #[arg(long)]
    pub no_charts: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve the reporting period against the order store's full span.
    /// Rejects an inverted range here, before the pipeline runs.
    pub fn parse_range(&self, default_span: (NaiveDate, NaiveDate)) -> crate::Result<DateRange> {
        let start = match &self.start_date {
            Some(raw) => parse_date(raw)?,
            None => default_span.0,
        };
        let end = match &self.end_date {
            Some(raw) => parse_date(raw)?,
            None => default_span.1,
        };
        DateRange::new(start, end)
    }

    /// The category selection; both an absent flag and the literal "All"
    /// mean no category filter.
    pub fn category_filter(&self) -> CategoryFilter {
        match self.category.as_deref() {
            None | Some("All") => CategoryFilter::All,
            Some(name) => CategoryFilter::Only(name.to_string()),
        }
    }
}

fn parse_date(raw: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date '{}', expected YYYY-MM-DD", raw))
}
