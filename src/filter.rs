//! Date-range and category filtering over the record stores
//!
//! The predicates here are the only place filtering semantics live; the
//! aggregation functions always receive an already-filtered subset. Two
//! rules are easy to get wrong and are kept as explicit, testable
//! functions: null-category records are excluded whenever a specific
//! category is selected (and included under "All"), and the RFM subset is
//! filtered indirectly, by customer membership in the category-filtered
//! order store rather than by date.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::data::{OrderLineRecord, OrderStore, RfmRecord, RfmStore};

/// Inclusive calendar-date range. Construction validates `start <= end`, so
/// an inverted range never reaches the filtering predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> crate::Result<Self> {
        if start > end {
            anyhow::bail!("invalid date range: start {} is after end {}", start, end);
        }
        Ok(Self { start, end })
    }

    /// Date-level containment: time of day is ignored, both bounds inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Category selection: everything, or an exact category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No category filter; records without a category are included too.
    All,
    /// Exact match on the category name; records without a category are
    /// excluded.
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(name) => category == Some(name.as_str()),
        }
    }
}

/// The transient filter selection. Owned by the presentation layer and
/// passed into the pipeline on every recomputation; the core holds no
/// filter state of its own.
#[derive(Debug, Clone)]
pub struct FilterSelection {
    pub range: DateRange,
    pub category: CategoryFilter,
}

/// Order-line records whose purchase date falls inside `range` and whose
/// category passes `category`, in original store order. May be empty; an
/// unknown category name simply matches nothing.
pub fn filter_orders(
    store: &OrderStore,
    range: DateRange,
    category: &CategoryFilter,
) -> Vec<OrderLineRecord> {
    store
        .records()
        .iter()
        .filter(|r| range.contains(r.order_purchase_timestamp.date()))
        .filter(|r| category.matches(r.product_category_name_english.as_deref()))
        .cloned()
        .collect()
}

/// RFM records matching the category selection, in RFM store order.
///
/// Membership is resolved against the full (not date-filtered) order store:
/// the RFM table is a summary-level aggregate, so a customer qualifies if
/// they ever bought from the selected category. Under `All`, the whole
/// store is returned.
pub fn filter_rfm(
    rfm_store: &RfmStore,
    order_store: &OrderStore,
    category: &CategoryFilter,
) -> Vec<RfmRecord> {
    match category {
        CategoryFilter::All => rfm_store.records().to_vec(),
        CategoryFilter::Only(_) => {
            let customers: HashSet<&str> = order_store
                .records()
                .iter()
                .filter(|r| category.matches(r.product_category_name_english.as_deref()))
                .map(|r| r.customer_id.as_str())
                .collect();
            rfm_store
                .records()
                .iter()
                .filter(|r| customers.contains(r.customer_id.as_str()))
                .cloned()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn record(
        order_id: &str,
        customer_id: &str,
        category: Option<&str>,
        timestamp: NaiveDateTime,
    ) -> OrderLineRecord {
        OrderLineRecord {
            order_id: order_id.to_string(),
            product_id: "p".to_string(),
            customer_id: customer_id.to_string(),
            customer_state: "SP".to_string(),
            product_category_name_english: category.map(String::from),
            price: 1.0,
            order_purchase_timestamp: timestamp,
        }
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(date(2024, 1, 2), date(2024, 1, 1)).is_err());
        assert!(DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_range_is_date_level_and_inclusive() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        let store = OrderStore::new(vec![
            record("A", "c1", Some("toys"), ts(2024, 1, 1, 0)),
            // late on the end date still matches
            record("B", "c2", Some("toys"), ts(2024, 1, 2, 23)),
            record("C", "c3", Some("toys"), ts(2024, 1, 3, 0)),
        ]);

        let subset = filter_orders(&store, range, &CategoryFilter::All);
        let ids: Vec<&str> = subset.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_null_category_excluded_only_under_specific_filter() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let store = OrderStore::new(vec![
            record("A", "c1", Some("toys"), ts(2024, 1, 1, 8)),
            record("B", "c2", None, ts(2024, 1, 2, 8)),
        ]);

        let all = filter_orders(&store, range, &CategoryFilter::All);
        assert_eq!(all.len(), 2);

        let toys = filter_orders(&store, range, &CategoryFilter::Only("toys".to_string()));
        assert_eq!(toys.len(), 1);
        assert_eq!(toys[0].order_id, "A");
    }

    #[test]
    fn test_unknown_category_yields_empty_subset() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let store = OrderStore::new(vec![record("A", "c1", Some("toys"), ts(2024, 1, 1, 8))]);

        let subset = filter_orders(&store, range, &CategoryFilter::Only("books".to_string()));
        assert!(subset.is_empty());
    }

    #[test]
    fn test_filter_preserves_store_order() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let store = OrderStore::new(vec![
            record("B", "c2", Some("toys"), ts(2024, 1, 5, 8)),
            record("A", "c1", Some("toys"), ts(2024, 1, 1, 8)),
        ]);

        let subset = filter_orders(&store, range, &CategoryFilter::All);
        let ids: Vec<&str> = subset.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"], "source order, not date order");
    }

    #[test]
    fn test_rfm_subset_joins_on_category_customers() {
        let order_store = OrderStore::new(vec![
            record("A", "c1", Some("toys"), ts(2024, 1, 1, 8)),
            record("B", "c2", Some("books"), ts(2024, 1, 2, 8)),
            record("C", "c3", None, ts(2024, 1, 3, 8)),
        ]);
        let rfm_store = RfmStore::new(vec![
            RfmRecord { customer_id: "c1".into(), recency: 5, frequency: 2, monetary: 30.0 },
            RfmRecord { customer_id: "c2".into(), recency: 9, frequency: 1, monetary: 10.0 },
            // present in RFM only; no referential integrity is enforced
            RfmRecord { customer_id: "c9".into(), recency: 1, frequency: 4, monetary: 99.0 },
        ]);

        let all = filter_rfm(&rfm_store, &order_store, &CategoryFilter::All);
        assert_eq!(all.len(), 3);

        let toys = filter_rfm(
            &rfm_store,
            &order_store,
            &CategoryFilter::Only("toys".to_string()),
        );
        assert_eq!(toys.len(), 1);
        assert_eq!(toys[0].customer_id, "c1");
    }
}
