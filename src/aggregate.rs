//! The four derived views over a filtered order-line subset
//!
//! Each function is a pure, independent transform: it allocates a fresh
//! result, never mutates its input, and defines an explicit empty-input
//! behavior. Ranking sorts are stable, so groups with equal revenue keep
//! their first-encounter order.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::data::OrderLineRecord;

/// One day of the daily-orders view.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyOrdersRow {
    pub date: NaiveDate,
    /// Distinct orders placed that day, not line count.
    pub order_count: usize,
    /// Summed line prices across all records that day.
    pub revenue: f64,
}

/// One category of the top-categories view.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub category: String,
    pub total_revenue: f64,
    /// Line-record count, not distinct products.
    pub total_quantity: usize,
}

/// One product of the top-products view.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub product_id: String,
    pub revenue: f64,
}

/// One state of the customers-by-state view.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRow {
    pub state: String,
    pub customer_count: usize,
}

/// Resample the subset at day granularity over its own min..max purchase
/// dates. Days inside that span with no matching records appear with zero
/// counts and revenue; an empty subset yields an empty view.
pub fn daily_orders(subset: &[OrderLineRecord]) -> Vec<DailyOrdersRow> {
    let mut span: Option<(NaiveDate, NaiveDate)> = None;
    let mut orders_per_day: HashMap<NaiveDate, HashSet<&str>> = HashMap::new();
    let mut revenue_per_day: HashMap<NaiveDate, f64> = HashMap::new();

    for record in subset {
        let day = record.order_purchase_timestamp.date();
        span = Some(match span {
            None => (day, day),
            Some((min, max)) => (min.min(day), max.max(day)),
        });
        orders_per_day
            .entry(day)
            .or_default()
            .insert(record.order_id.as_str());
        *revenue_per_day.entry(day).or_insert(0.0) += record.price;
    }

    let Some((first, last)) = span else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| DailyOrdersRow {
            date: day,
            order_count: orders_per_day.get(&day).map_or(0, HashSet::len),
            revenue: revenue_per_day.get(&day).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Group by category, summing revenue and counting line records, ordered by
/// revenue descending. Records without a category are not part of this
/// view; they still count toward every other view.
pub fn top_categories(subset: &[OrderLineRecord]) -> Vec<CategoryRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<CategoryRow> = Vec::new();

    for record in subset {
        let Some(category) = record.product_category_name_english.as_deref() else {
            continue;
        };
        match index.get(category) {
            Some(&i) => {
                rows[i].total_revenue += record.price;
                rows[i].total_quantity += 1;
            }
            None => {
                index.insert(category, rows.len());
                rows.push(CategoryRow {
                    category: category.to_string(),
                    total_revenue: record.price,
                    total_quantity: 1,
                });
            }
        }
    }

    rows.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
    rows
}

/// Group by product, summing line prices, ordered by revenue descending.
pub fn top_products(subset: &[OrderLineRecord]) -> Vec<ProductRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<ProductRow> = Vec::new();

    for record in subset {
        match index.get(record.product_id.as_str()) {
            Some(&i) => rows[i].revenue += record.price,
            None => {
                index.insert(record.product_id.as_str(), rows.len());
                rows.push(ProductRow {
                    product_id: record.product_id.clone(),
                    revenue: record.price,
                });
            }
        }
    }

    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    rows
}

/// Count distinct customers per state, in first-encounter state order.
/// Callers sort when they want a ranking.
pub fn customers_by_state(subset: &[OrderLineRecord]) -> Vec<StateRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut customers: HashMap<&str, HashSet<&str>> = HashMap::new();

    for record in subset {
        let state = record.customer_state.as_str();
        if !customers.contains_key(state) {
            order.push(state);
        }
        customers
            .entry(state)
            .or_default()
            .insert(record.customer_id.as_str());
    }

    order
        .into_iter()
        .map(|state| StateRow {
            state: state.to_string(),
            customer_count: customers[state].len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn record(
        order_id: &str,
        product_id: &str,
        customer_id: &str,
        state: &str,
        category: Option<&str>,
        price: f64,
        timestamp: NaiveDateTime,
    ) -> OrderLineRecord {
        OrderLineRecord {
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            customer_id: customer_id.to_string(),
            customer_state: state.to_string(),
            product_category_name_english: category.map(String::from),
            price,
            order_purchase_timestamp: timestamp,
        }
    }

    #[test]
    fn test_daily_orders_counts_distinct_orders() {
        // Two lines of order A plus order B on day 1, order C on day 2.
        let subset = vec![
            record("A", "p1", "c1", "SP", Some("toys"), 10.0, ts(2024, 1, 1)),
            record("A", "p2", "c1", "SP", Some("toys"), 20.0, ts(2024, 1, 1)),
            record("B", "p3", "c2", "RJ", None, 5.0, ts(2024, 1, 1)),
            record("C", "p1", "c3", "SP", Some("toys"), 30.0, ts(2024, 1, 2)),
        ];

        let daily = daily_orders(&subset);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(daily[0].order_count, 2);
        assert_eq!(daily[0].revenue, 35.0);
        assert_eq!(daily[1].order_count, 1);
        assert_eq!(daily[1].revenue, 30.0);
    }

    #[test]
    fn test_daily_orders_fills_gap_days_with_zeros() {
        let subset = vec![
            record("A", "p1", "c1", "SP", Some("toys"), 10.0, ts(2024, 1, 1)),
            record("B", "p2", "c2", "SP", Some("toys"), 20.0, ts(2024, 1, 4)),
        ];

        let daily = daily_orders(&subset);
        assert_eq!(daily.len(), 4);
        for row in &daily[1..3] {
            assert_eq!(row.order_count, 0);
            assert_eq!(row.revenue, 0.0);
        }
        // The axis comes from the subset's own span, not any wider range.
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(daily[3].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn test_daily_orders_empty_subset() {
        assert!(daily_orders(&[]).is_empty());
    }

    #[test]
    fn test_top_categories_ranks_by_revenue_and_drops_null() {
        let subset = vec![
            record("A", "p1", "c1", "SP", Some("toys"), 10.0, ts(2024, 1, 1)),
            record("B", "p2", "c2", "SP", Some("books"), 50.0, ts(2024, 1, 1)),
            record("C", "p3", "c3", "SP", Some("toys"), 15.0, ts(2024, 1, 2)),
            record("D", "p4", "c4", "SP", None, 99.0, ts(2024, 1, 2)),
        ];

        let categories = top_categories(&subset);
        assert_eq!(categories.len(), 2, "null category forms no group");
        assert_eq!(categories[0].category, "books");
        assert_eq!(categories[0].total_revenue, 50.0);
        assert_eq!(categories[0].total_quantity, 1);
        assert_eq!(categories[1].category, "toys");
        assert_eq!(categories[1].total_revenue, 25.0);
        assert_eq!(categories[1].total_quantity, 2);
    }

    #[test]
    fn test_top_categories_ties_keep_encounter_order() {
        let subset = vec![
            record("A", "p1", "c1", "SP", Some("first"), 10.0, ts(2024, 1, 1)),
            record("B", "p2", "c2", "SP", Some("second"), 10.0, ts(2024, 1, 1)),
        ];

        let categories = top_categories(&subset);
        assert_eq!(categories[0].category, "first");
        assert_eq!(categories[1].category, "second");
    }

    #[test]
    fn test_top_products_sums_line_prices() {
        let subset = vec![
            record("A", "p1", "c1", "SP", Some("toys"), 10.0, ts(2024, 1, 1)),
            record("B", "p1", "c2", "SP", Some("toys"), 15.0, ts(2024, 1, 2)),
            record("C", "p2", "c3", "SP", Some("toys"), 20.0, ts(2024, 1, 2)),
        ];

        let products = top_products(&subset);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product_id, "p1");
        assert_eq!(products[0].revenue, 25.0);
        assert_eq!(products[1].revenue, 20.0);
    }

    #[test]
    fn test_customers_by_state_counts_distinct_customers() {
        let subset = vec![
            record("A", "p1", "c1", "SP", Some("toys"), 10.0, ts(2024, 1, 1)),
            record("B", "p2", "c1", "SP", Some("toys"), 20.0, ts(2024, 1, 2)),
            record("C", "p3", "c2", "SP", Some("toys"), 5.0, ts(2024, 1, 2)),
            record("D", "p4", "c3", "RJ", Some("toys"), 5.0, ts(2024, 1, 3)),
        ];

        let states = customers_by_state(&subset);
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].state, "SP");
        assert_eq!(states[0].customer_count, 2);
        assert_eq!(states[1].state, "RJ");
        assert_eq!(states[1].customer_count, 1);

        let total: usize = states.iter().map(|s| s.customer_count).sum();
        assert_eq!(total, 3, "each customer appears in exactly one state");
    }

    #[test]
    fn test_empty_subset_yields_empty_views() {
        assert!(top_categories(&[]).is_empty());
        assert!(top_products(&[]).is_empty());
        assert!(customers_by_state(&[]).is_empty());
    }
}
