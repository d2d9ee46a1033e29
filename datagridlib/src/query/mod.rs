//! Table state: configuration and sort interaction.
//!
//! This module holds the caller-owned state that drives re-rendering:
//!
//! - **TableConfig**: Display columns, grouping, sort and aggregation options
//! - **SortOrder**: Multi-column sort order mutated by header clicks
//!
//! ## Example
//!
//! ```rust,ignore
//! use datagridlib::query::{ClickModifier, SortOrder};
//!
//! let mut sort = SortOrder::new();
//! sort.click("age", ClickModifier::Plain);      // [age asc]
//! sort.click("region", ClickModifier::Extend);  // [age asc, region asc]
//! ```

pub mod config;
pub mod sort;

pub use config::TableConfig;
pub use sort::{ClickModifier, SortDirection, SortKey, SortOrder};
