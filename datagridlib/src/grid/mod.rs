//! Aggregate row grouping: recover the row tree and fold it.
//!
//! This module handles the third stage of the pipeline - turning a flat,
//! level-tagged row sequence into groups that can be collapsed and
//! expanded. It provides:
//!
//! - **Grid**: Row arena with direct children, descendants and visibility
//! - **Style**: Indentation and background shade for aggregate rows
//!
//! ## Example
//!
//! ```rust
//! use datagridlib::grid::{Grid, GridStyle};
//!
//! // region (level 2) > mortgage (level 1) > detail rows (level 0)
//! let mut grid = Grid::from_levels(&[2, 1, 0, 0, 1, 0], &GridStyle::new());
//! assert_eq!(grid.row(0).unwrap().direct_children, vec![1, 4]);
//!
//! grid.click(1);
//! assert_eq!(grid.visible_rows(), vec![0, 1, 4, 5]);
//! ```

pub mod style;
pub mod tree;

pub use style::{GridStyle, Palette, Rgb, RowStyle};
pub use tree::{Grid, Row};
