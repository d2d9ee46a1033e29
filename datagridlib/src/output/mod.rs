//! Output formatting: present grids as outlines.
//!
//! This module handles the final stage of the pipeline - formatting a grid
//! for display. It provides:
//!
//! - **GridOutline**: Visible rows with nesting, labels and a footer
//! - **OutlineRow**: Individual row with fold state and cell text
//!
//! ## Example
//!
//! ```rust,ignore
//! use datagridlib::output::GridOutline;
//!
//! let outline = GridOutline::from_grid(&grid).title("sales");
//! // outline.rows: [OutlineRow { index: 0, label: "North", expanded: true, .. }, ...]
//! // outline.footer: "12 rows (0 hidden)"
//! ```

pub mod outline;

pub use outline::{GridOutline, OutlineRow};
