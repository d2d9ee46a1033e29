//! # datagridlib
//!
//! Client-side companion library for the `rendergrid` tabular-data renderer.
//!
//! ## Overview
//!
//! The renderer turns a data file and a set of command-line flags into a
//! grid (HTML, ASCII, ...). When grouping is requested, the HTML grid is a
//! flat list of rows where each aggregate (summary) row is tagged with its
//! grouping level. This library covers both sides of that exchange:
//!
//! - **Command**: Build renderer flags and run the renderer, capturing output
//! - **Data**: Read grid tables, row levels and embedded configuration from markup
//! - **Grid**: Recover the aggregate-row tree and expand/collapse groups
//! - **Query**: Per-table configuration and the header-click sort order
//! - **Session**: Per-page context, init hooks and single-flight reloads
//! - **Output**: Table-ready outline of the visible rows
//!
//! ## Example
//!
//! ```rust
//! use datagridlib::{Flags, Grid, GridStyle};
//!
//! let flags = Flags::new()
//!     .with("autocolumn", true)
//!     .with("sort", vec!["a", "b|desc"])
//!     .with("renderer", "x");
//! assert_eq!(
//!     flags.to_arg_string(),
//!     "--autocolumn --sort='a' --sort='b|desc' --renderer='x'"
//! );
//!
//! let html = "<table id='t' class='datagrid'><tbody>\
//!     <tr class='l-1'><td>Smith</td></tr>\
//!     <tr class='l-0'><td></td><td>Bob</td></tr>\
//!     </tbody></table>";
//! let table = datagridlib::find_table(html, "t");
//! let mut grid = Grid::from_table(table.as_ref(), &GridStyle::new());
//! grid.click(0);
//! assert_eq!(grid.visible_rows(), vec![0]);
//! ```

pub mod command;
pub mod data;
pub mod error;
pub mod grid;
pub mod output;
pub mod query;
pub mod session;

pub use command::{escape_value, FlagValue, Flags, RenderCommand};
pub use data::{find_table, find_tables, parse_embedded_config, parse_level, TableMarkup};
pub use error::DataGridError;
pub use grid::{Grid, GridStyle, Palette, Rgb, Row, RowStyle};
pub use output::{GridOutline, OutlineRow};
pub use query::{ClickModifier, SortDirection, SortKey, SortOrder, TableConfig};
pub use session::{
    GridContext, GridTable, ReloadOutcome, ReloadRequest, ReloadTransport, TableInitHook,
};

/// Result type for datagridlib operations
pub type Result<T> = std::result::Result<T, DataGridError>;
