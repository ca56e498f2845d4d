//! ShopMetrics: order analytics for an e-commerce dataset
//!
//! This library turns an order-line table and a precomputed customer RFM
//! (Recency, Frequency, Monetary) table into summary views: daily order
//! counts and revenue, top product categories, top products, customers by
//! state, and RFM averages with top-5 customer rankings. All views are
//! recomputed from scratch for a given date-range and category selection.

pub mod aggregate;
pub mod cli;
pub mod data;
pub mod filter;
pub mod rfm;
pub mod viz;

// Re-export public items for easier access
pub use aggregate::{
    customers_by_state, daily_orders, top_categories, top_products, CategoryRow, DailyOrdersRow,
    ProductRow, StateRow,
};
pub use cli::Args;
pub use data::{load_orders, load_rfm, OrderLineRecord, OrderStore, RfmRecord, RfmStore};
pub use filter::{filter_orders, filter_rfm, CategoryFilter, DateRange, FilterSelection};
pub use rfm::{summarize, top_by_frequency, top_by_monetary, top_by_recency, RfmSummary};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
