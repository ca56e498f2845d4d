//! Record stores and CSV loading for the order and RFM tables
//!
//! Both tables are loaded once at startup and treated as read-only for the
//! process lifetime. Malformed rows (unparseable timestamps, non-numeric or
//! negative prices) abort loading with row context instead of leaking into
//! the aggregation pipeline.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// One row of the order table: a single product line within an order.
///
/// `order_id` is not unique — an order with several products contributes one
/// record per line, and `price` is the line price, not the order total.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineRecord {
    pub order_id: String,
    pub product_id: String,
    pub customer_id: String,
    /// Two-letter state code of the purchasing customer.
    pub customer_state: String,
    /// Product category; empty in the source data for some products.
    #[serde(deserialize_with = "deserialize_category")]
    pub product_category_name_english: Option<String>,
    pub price: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub order_purchase_timestamp: NaiveDateTime,
}

/// One row of the precomputed per-customer RFM table.
#[derive(Debug, Clone, Deserialize)]
pub struct RfmRecord {
    pub customer_id: String,
    /// Days since the customer's last purchase; smaller is more recent.
    #[serde(rename = "Recency")]
    pub recency: u32,
    /// Count of distinct orders; always at least 1.
    #[serde(rename = "Frequency")]
    pub frequency: u32,
    /// Total spend across all orders.
    #[serde(rename = "Monetary")]
    pub monetary: f64,
}

/// Immutable in-memory table of order-line records, in source row order.
#[derive(Debug)]
pub struct OrderStore {
    records: Vec<OrderLineRecord>,
}

impl OrderStore {
    pub fn new(records: Vec<OrderLineRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OrderLineRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Min and max purchase dates present in the store, or `None` when the
    /// store is empty. Drives the default date-range selection.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().map(|r| r.order_purchase_timestamp.date());
        let first = dates.next()?;
        Some(dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
    }

    /// Distinct non-null category names in first-encounter order. Drives the
    /// category picker options.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for record in &self.records {
            if let Some(category) = &record.product_category_name_english {
                if seen.insert(category.as_str()) {
                    out.push(category.clone());
                }
            }
        }
        out
    }
}

/// Immutable in-memory table of RFM records, one per distinct customer.
#[derive(Debug)]
pub struct RfmStore {
    records: Vec<RfmRecord>,
}

impl RfmStore {
    pub fn new(records: Vec<RfmRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[RfmRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load the order-line table from a CSV file.
///
/// Expected columns: `order_id`, `product_id`, `customer_id`,
/// `customer_state`, `product_category_name_english`, `price`,
/// `order_purchase_timestamp`. Fails on the first malformed row.
pub fn load_orders<P: AsRef<Path>>(path: P) -> crate::Result<OrderStore> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open orders file '{}'", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    for (row_idx, result) in reader.deserialize().enumerate() {
        // +2: one for the header row, one for zero-based indexing
        let record: OrderLineRecord =
            result.with_context(|| format!("orders row {}: parse failed", row_idx + 2))?;
        if record.price < 0.0 {
            anyhow::bail!(
                "orders row {}: negative price {} for order '{}'",
                row_idx + 2,
                record.price,
                record.order_id
            );
        }
        records.push(record);
    }

    if records.is_empty() {
        anyhow::bail!("no order records found in '{}'", path.display());
    }

    Ok(OrderStore::new(records))
}

/// Load the per-customer RFM table from a CSV file.
///
/// Expected columns: `customer_id`, `Recency`, `Frequency`, `Monetary`.
/// Fails on the first malformed row or invariant violation.
pub fn load_rfm<P: AsRef<Path>>(path: P) -> crate::Result<RfmStore> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open RFM file '{}'", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    let mut seen_customers = HashSet::new();
    for (row_idx, result) in reader.deserialize().enumerate() {
        let record: RfmRecord =
            result.with_context(|| format!("RFM row {}: parse failed", row_idx + 2))?;
        if record.frequency == 0 {
            anyhow::bail!(
                "RFM row {}: zero frequency for customer '{}'",
                row_idx + 2,
                record.customer_id
            );
        }
        if record.monetary < 0.0 {
            anyhow::bail!(
                "RFM row {}: negative monetary {} for customer '{}'",
                row_idx + 2,
                record.monetary,
                record.customer_id
            );
        }
        if !seen_customers.insert(record.customer_id.clone()) {
            anyhow::bail!(
                "RFM row {}: duplicate customer '{}'",
                row_idx + 2,
                record.customer_id
            );
        }
        records.push(record);
    }

    Ok(RfmStore::new(records))
}

/// Parse a purchase timestamp, accepting the dataset's space-separated
/// format, the `T`-separated variant, and a bare date (midnight assumed).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim().trim_end_matches('Z');
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unparseable timestamp '{}'", raw)))
}

/// Empty or whitespace-only category cells become `None`.
fn deserialize_category<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
