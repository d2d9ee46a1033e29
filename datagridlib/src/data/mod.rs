//! Markup reading: tables, rows and embedded configuration.
//!
//! This module handles the second stage of the pipeline - reading rendered
//! output back into plain data. It provides:
//!
//! - **Markup**: Grid tables, their body rows, and each row's aggregation level
//! - **Embedded config**: Per-table configuration injected into the page
//!
//! ## Example
//!
//! ```rust,ignore
//! use datagridlib::data::{find_tables, parse_embedded_config};
//!
//! let tables = find_tables(&html);
//! let levels = tables[0].levels(); // e.g. [2, 1, 0, 0, 1, 0]
//! let config = parse_embedded_config(&html)?;
//! ```

pub mod embedded;
pub mod markup;

pub use embedded::{parse_embedded_config, EmbeddedTable, CONFIG_SCRIPT_CLASS};
pub use markup::{find_table, find_tables, parse_level, RowMarkup, TableMarkup, TABLE_CLASS};
