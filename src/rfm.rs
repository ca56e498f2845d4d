//! RFM metric summarization and top-5 customer rankings
//!
//! Works over a filtered slice of the RFM store. An empty slice is a
//! first-class "no data" state: `summarize` returns `None` and the
//! presentation layer renders a placeholder instead of a spurious number.

use crate::data::RfmRecord;

/// Mean RFM metrics over a customer subset.
///
/// Recency is rounded to 1 decimal place and frequency to 2, matching how
/// the metrics are displayed; monetary is left unrounded for currency
/// formatting downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct RfmSummary {
    pub avg_recency: f64,
    pub avg_frequency: f64,
    pub avg_monetary: f64,
}

/// Mean Recency/Frequency/Monetary, or `None` on an empty subset.
pub fn summarize(subset: &[RfmRecord]) -> Option<RfmSummary> {
    if subset.is_empty() {
        return None;
    }
    let n = subset.len() as f64;
    let recency: f64 = subset.iter().map(|r| f64::from(r.recency)).sum::<f64>() / n;
    let frequency: f64 = subset.iter().map(|r| f64::from(r.frequency)).sum::<f64>() / n;
    let monetary: f64 = subset.iter().map(|r| r.monetary).sum::<f64>() / n;

    Some(RfmSummary {
        avg_recency: round_to(recency, 1),
        avg_frequency: round_to(frequency, 2),
        avg_monetary: monetary,
    })
}

/// The `n` most recent customers: ascending recency, ties in store order.
pub fn top_by_recency(subset: &[RfmRecord], n: usize) -> Vec<RfmRecord> {
    let mut rows = subset.to_vec();
    rows.sort_by(|a, b| a.recency.cmp(&b.recency));
    rows.truncate(n);
    rows
}

/// The `n` most frequent customers: descending frequency, ties in store order.
pub fn top_by_frequency(subset: &[RfmRecord], n: usize) -> Vec<RfmRecord> {
    let mut rows = subset.to_vec();
    rows.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    rows.truncate(n);
    rows
}

/// The `n` biggest spenders: descending monetary, ties in store order.
pub fn top_by_monetary(subset: &[RfmRecord], n: usize) -> Vec<RfmRecord> {
    let mut rows = subset.to_vec();
    rows.sort_by(|a, b| b.monetary.total_cmp(&a.monetary));
    rows.truncate(n);
    rows
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
